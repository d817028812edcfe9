#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::store::FieldStore;
    use crate::types::Operation;
    use crate::workload::{
        generate, generate_per_worker, MixAction, MixEntry, Workload, DEFAULT_MAX_VALUE,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn counts(ops: &[Operation]) -> (usize, usize, usize) {
        let reads = ops.iter().filter(|op| matches!(op, Operation::Read { .. })).count();
        let writes = ops.iter().filter(|op| matches!(op, Operation::Write { .. })).count();
        (reads, writes, ops.len() - reads - writes)
    }

    fn indices(ops: &[Operation]) -> impl Iterator<Item = usize> + '_ {
        ops.iter().filter_map(|op| match *op {
            Operation::Read { idx } | Operation::Write { idx, .. } => Some(idx),
            Operation::Snapshot => None,
        })
    }

    #[test]
    fn uniform_covers_all_kinds_and_fields() {
        let ops = generate(&Workload::uniform(), 4, 3_000, &mut rng()).unwrap();
        assert_eq!(ops.len(), 3_000);

        let (reads, writes, snapshots) = counts(&ops);
        for n in [reads, writes, snapshots] {
            assert!((800..1_200).contains(&n), "unbalanced mix: {:?}", (reads, writes, snapshots));
        }
        assert!(indices(&ops).all(|idx| idx < 4));
        for field in 0..4 {
            assert!(indices(&ops).any(|idx| idx == field));
        }
    }

    #[test]
    fn written_values_stay_in_range() {
        let ops = generate(&Workload::Uniform { max_value: 5 }, 2, 1_000, &mut rng()).unwrap();
        for op in ops {
            if let Operation::Write { value, .. } = op {
                assert!((1..=5).contains(&value));
            }
        }
    }

    #[test]
    fn skewed_concentrates_on_field_zero() {
        let ops = generate(&Workload::skewed(), 8, 10_000, &mut rng()).unwrap();
        assert!(ops.len() >= 10_000);

        let hot = indices(&ops).filter(|&idx| idx == 0).count();
        let total = indices(&ops).count();
        assert!(hot * 100 / total >= 80, "hot share {} of {}", hot, total);
        assert!(indices(&ops).all(|idx| idx < 8));
    }

    #[test]
    fn skewed_single_field_spills_past_the_store() {
        let ops = generate(&Workload::skewed(), 1, 2_000, &mut rng()).unwrap();
        assert!(indices(&ops).all(|idx| idx <= 1));
        let spilled: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, Operation::Read { idx: 1 } | Operation::Write { idx: 1, .. }))
            .collect();
        assert!(!spilled.is_empty());

        // Only field 0 exists, so the spilled operations leave it untouched
        let store = FieldStore::new(1);
        for op in spilled {
            if let Operation::Write { idx, value } = *op {
                store.write(idx, value).unwrap();
            }
        }
        assert_eq!(store.snapshot().unwrap(), [0]);
    }

    #[test]
    fn write_heavy_is_writes_and_snapshots() {
        let ops = generate(&Workload::write_heavy(), 3, 2_000, &mut rng()).unwrap();
        let (reads, writes, snapshots) = counts(&ops);
        assert_eq!(reads, 0);
        assert!(writes > snapshots * 5);
        assert!(indices(&ops).all(|idx| idx == 0));
    }

    #[test]
    fn weighted_follows_weights() {
        let workload = Workload::Weighted {
            read_weights: vec![0.0, 1.0, 0.0],
            write_weights: vec![0.0, 0.0, 1.0],
            snapshot_prob: 0.0,
            max_value: DEFAULT_MAX_VALUE,
        };
        let ops = generate(&workload, 3, 1_000, &mut rng()).unwrap();
        for op in &ops {
            match op {
                Operation::Read { idx } => assert_eq!(*idx, 1),
                Operation::Write { idx, .. } => assert_eq!(*idx, 2),
                Operation::Snapshot => panic!("snapshot_prob is zero"),
            }
        }
    }

    #[test]
    fn read_write_split_favours_hot_fields() {
        let ops = generate(&Workload::read_write_split(16), 16, 20_000, &mut rng()).unwrap();
        let field0_reads = ops
            .iter()
            .filter(|op| matches!(op, Operation::Read { idx: 0 }))
            .count();
        let field5_reads = ops
            .iter()
            .filter(|op| matches!(op, Operation::Read { idx: 5 }))
            .count();
        assert!(field0_reads > field5_reads * 4);

        let (_, _, snapshots) = counts(&ops);
        assert!((500..1_500).contains(&snapshots));
    }

    #[test]
    fn mix_only_emits_listed_actions() {
        let workload = Workload::Mix {
            actions: vec![
                MixEntry { action: MixAction::Read(2), weight: 1 },
                MixEntry { action: MixAction::Snapshot, weight: 1 },
                MixEntry { action: MixAction::Write(0), weight: 0 },
            ],
            max_value: 10,
        };
        let ops = generate(&workload, 3, 500, &mut rng()).unwrap();
        assert!(ops
            .iter()
            .all(|op| matches!(op, Operation::Read { idx: 2 } | Operation::Snapshot)));
    }

    #[test]
    fn variant6_matches_its_menu() {
        let ops = generate(&Workload::variant6(), 3, 10_000, &mut rng()).unwrap();
        let (reads, writes, snapshots) = counts(&ops);
        // 60 : 15 : 25
        assert!(reads > writes * 3);
        assert!(snapshots > writes);
        assert!(indices(&ops).all(|idx| idx < 3));
    }

    #[test]
    fn rejects_invalid_workloads() {
        assert!(matches!(
            Workload::uniform().validate(0),
            Err(Error::InvalidWorkload(_))
        ));
        assert!(matches!(
            Workload::Uniform { max_value: 0 }.validate(3),
            Err(Error::InvalidWorkload(_))
        ));
        assert!(matches!(
            Workload::read_write_split(4).validate(3),
            Err(Error::InvalidWorkload(_))
        ));

        let all_zero = Workload::Weighted {
            read_weights: vec![0.0, 0.0],
            write_weights: vec![1.0, 1.0],
            snapshot_prob: 0.1,
            max_value: 10,
        };
        assert!(all_zero.validate(2).is_err());

        let bad_prob = Workload::Weighted {
            read_weights: vec![1.0],
            write_weights: vec![1.0],
            snapshot_prob: 1.5,
            max_value: 10,
        };
        assert!(bad_prob.validate(1).is_err());

        let empty_mix = Workload::Mix { actions: vec![], max_value: 10 };
        assert!(empty_mix.validate(1).is_err());
    }

    #[test]
    fn per_worker_generation_is_deterministic() {
        let a = generate_per_worker(&Workload::uniform(), 3, 3_000, 3, 42).unwrap();
        let b = generate_per_worker(&Workload::uniform(), 3, 3_000, 3, 42).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|ops| ops.len() == 1_000));
        assert_ne!(a[0], a[1]);

        let c = generate_per_worker(&Workload::uniform(), 3, 3_000, 3, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn per_worker_requires_workers() {
        assert!(matches!(
            generate_per_worker(&Workload::uniform(), 3, 100, 0, 1),
            Err(Error::InvalidWorkload(_))
        ));
    }
}
