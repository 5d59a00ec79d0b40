use crate::error::{MergeError, Result};
use crate::markup::{is_begin_sentinel, is_end_sentinel};
use crate::model::Document;

/// Removes the auto-merged block, sentinels included.
///
/// A document without sentinels comes back unchanged. Sentinels that do not
/// form exactly one begin/end pair, in that order, are reported as
/// [`MergeError::Malformed`] rather than guessed at.
pub fn run(dest: &Document) -> Result<Document> {
    let lines = dest.lines();
    let begins: Vec<usize> = positions(lines, is_begin_sentinel);
    let ends: Vec<usize> = positions(lines, is_end_sentinel);

    let (begin, end) = match (begins.as_slice(), ends.as_slice()) {
        ([], []) => return Ok(dest.clone()),
        ([], _) => return Err(malformed("end sentinel without a begin sentinel")),
        (_, []) => return Err(malformed("begin sentinel without an end sentinel")),
        ([begin], [end]) => (*begin, *end),
        ([_], _) => return Err(malformed("more than one end sentinel")),
        (_, _) => return Err(malformed("more than one begin sentinel")),
    };

    if end < begin {
        return Err(malformed("end sentinel comes before the begin sentinel"));
    }

    let mut kept = Vec::with_capacity(lines.len() - (end - begin + 1));
    kept.extend_from_slice(&lines[..begin]);
    kept.extend_from_slice(&lines[end + 1..]);
    Ok(Document::from_lines(kept))
}

fn positions(lines: &[String], pred: fn(&str) -> bool) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| pred(line.as_str()))
        .map(|(i, _)| i)
        .collect()
}

fn malformed(reason: &str) -> MergeError {
    MergeError::Malformed(reason.to_string())
}
