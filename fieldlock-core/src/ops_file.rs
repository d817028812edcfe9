//! Plain-text operation files, one operation per line:
//!
//! ```text
//! read <idx>
//! write <idx> <value>
//! string
//! ```
//!
//! `string` requests a snapshot (`snapshot` is accepted too). Blank lines and
//! `#` comments are ignored, unknown commands are skipped. Indices may be
//! any integer; ones no store can address are absorbed on replay.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Operation;

/// Index used for tokens that name no addressable field (negative or wider
/// than `usize`); every store absorbs it.
pub const UNADDRESSABLE_INDEX: usize = usize::MAX;

/// Parse the contents of an operation file.
///
/// Tokens on a line are read as a stream, so `write 0 5 read 1` yields two
/// operations. An unknown command discards the rest of its line.
pub fn parse_ops(input: &str) -> Result<Vec<Operation>> {
    let mut ops = Vec::new();

    for (n, raw) in input.lines().enumerate() {
        let line = n + 1;
        let text = raw.trim();
        if text.starts_with('#') {
            continue;
        }

        let mut tokens = text.split_whitespace();
        while let Some(cmd) = tokens.next() {
            let op = match cmd {
                "read" => Operation::Read {
                    idx: parse_index(tokens.next(), line)?,
                },
                "write" => Operation::Write {
                    idx: parse_index(tokens.next(), line)?,
                    value: parse_arg(tokens.next(), line, "value")?,
                },
                "string" | "snapshot" => Operation::Snapshot,
                other => {
                    tracing::debug!(line, command = other, "skipping unknown command");
                    break;
                }
            };
            ops.push(op);
        }
    }

    Ok(ops)
}

/// Any integer is a valid index; ones outside `usize` map to
/// [`UNADDRESSABLE_INDEX`].
fn parse_index(token: Option<&str>, line: usize) -> Result<usize> {
    let raw: i128 = parse_arg(token, line, "index")?;
    Ok(usize::try_from(raw).unwrap_or(UNADDRESSABLE_INDEX))
}

fn parse_arg<T: std::str::FromStr>(token: Option<&str>, line: usize, what: &str) -> Result<T> {
    let token = token.ok_or_else(|| Error::Parse {
        line,
        message: format!("missing {}", what),
    })?;
    token.parse().map_err(|_| Error::Parse {
        line,
        message: format!("invalid {} '{}'", what, token),
    })
}

/// Render operations in file form, one per line.
pub fn format_ops(ops: &[Operation]) -> String {
    let mut out = String::with_capacity(ops.len() * 12);
    for op in ops {
        out.push_str(&op.to_string());
        out.push('\n');
    }
    out
}

pub fn load_ops(path: impl AsRef<Path>) -> Result<Vec<Operation>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let ops = parse_ops(&text)?;
    tracing::debug!(path = %path.display(), ops = ops.len(), "loaded operation file");
    Ok(ops)
}

pub fn save_ops(path: impl AsRef<Path>, ops: &[Operation]) -> Result<()> {
    fs::write(path, format_ops(ops))?;
    Ok(())
}
