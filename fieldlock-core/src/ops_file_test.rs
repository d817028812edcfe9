#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::ops_file::{format_ops, load_ops, parse_ops, save_ops, UNADDRESSABLE_INDEX};
    use crate::replay::execute;
    use crate::store::FieldStore;
    use crate::types::Operation;

    #[test]
    fn parses_all_commands() {
        let ops = parse_ops("read 0\nwrite 1 7\nstring\nsnapshot\n").unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Read { idx: 0 },
                Operation::Write { idx: 1, value: 7 },
                Operation::Snapshot,
                Operation::Snapshot,
            ]
        );
    }

    #[test]
    fn skips_blanks_comments_and_unknown_commands() {
        let input = "\n# header\n  read 2  \nflush 1 2 3\nwrite 0 -4\n\n";
        let ops = parse_ops(input).unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Read { idx: 2 },
                Operation::Write { idx: 0, value: -4 },
            ]
        );
    }

    #[test]
    fn missing_argument_reports_line() {
        let err = parse_ops("read 0\nwrite 3\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("value"), "{}", message);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn unaddressable_indices_replay_as_no_ops() {
        let ops = parse_ops("write -1 5\nwrite 0 3\nread -7\nwrite 99999999999999999999999 1\nstring\n")
            .unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Write { idx: UNADDRESSABLE_INDEX, value: 5 },
                Operation::Write { idx: 0, value: 3 },
                Operation::Read { idx: UNADDRESSABLE_INDEX },
                Operation::Write { idx: UNADDRESSABLE_INDEX, value: 1 },
                Operation::Snapshot,
            ]
        );

        let store = FieldStore::new(3);
        let stats = execute(&store, &ops).unwrap();
        assert_eq!(stats.total(), 5);
        assert_eq!(store.snapshot().unwrap(), [3, 0, 0]);
    }

    #[test]
    fn non_numeric_index_is_rejected() {
        assert!(matches!(
            parse_ops("string\nwrite x 1"),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_ops("read 1.5"),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn several_commands_on_one_line() {
        let ops = parse_ops("write 0 5 read 1\nread 2 string write 1 4\n").unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Write { idx: 0, value: 5 },
                Operation::Read { idx: 1 },
                Operation::Read { idx: 2 },
                Operation::Snapshot,
                Operation::Write { idx: 1, value: 4 },
            ]
        );
    }

    #[test]
    fn unknown_command_drops_rest_of_its_line_only() {
        let ops = parse_ops("read 0 bogus read 1\nread 2\n").unwrap();
        assert_eq!(
            ops,
            vec![Operation::Read { idx: 0 }, Operation::Read { idx: 2 }]
        );
    }

    #[test]
    fn truncated_trailing_command_reports_line() {
        assert!(matches!(
            parse_ops("read 0\nwrite 0 5 read"),
            Err(Error::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn snapshots_are_written_as_string() {
        let text = format_ops(&[
            Operation::Write { idx: 4, value: 10 },
            Operation::Snapshot,
            Operation::Read { idx: 4 },
        ]);
        assert_eq!(text, "write 4 10\nstring\nread 4\n");
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worker_t0.txt");
        let ops = vec![
            Operation::Write { idx: 0, value: 5 },
            Operation::Write { idx: 1, value: 7 },
            Operation::Read { idx: 0 },
            Operation::Snapshot,
        ];

        save_ops(&path, &ops).unwrap();
        assert_eq!(load_ops(&path).unwrap(), ops);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_ops(dir.path().join("absent.txt"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
