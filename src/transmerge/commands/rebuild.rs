use crate::error::{MergeError, Result};
use crate::markup::{find_root, mask_lines, sentinel_line, tag_close, BEGIN_MARKER, END_MARKER};
use crate::model::{Document, EntryTable};

/// Writes a fresh auto-merged block right after the root opening tag.
///
/// `dest` is expected to be stripped already. The root tag may span lines;
/// the block goes after the line that closes it. When that line carries more
/// markup after the `>`, the line is split there so the block stays inside
/// the root element. Every other line is copied verbatim.
pub fn run(dest: &Document, table: &EntryTable, identifiers: &[String]) -> Result<Document> {
    let lines = dest.lines();
    let masked = mask_lines(lines);
    let eol = dest.line_ending();

    let Some((root_line, root)) = masked
        .iter()
        .enumerate()
        .find_map(|(i, line)| find_root(line).map(|tag| (i, tag)))
    else {
        return Err(MergeError::Malformed("no <resources> root element".into()));
    };

    let (close_line, close_at, self_closing) = match root.end {
        Some(end) => (root_line, end, root.self_closing),
        None => {
            let mut quote = root.pending_quote;
            let found = (root_line + 1..masked.len())
                .find_map(|i| tag_close(&masked[i], &mut quote).map(|(at, sc)| (i, at, sc)));
            found.ok_or_else(|| {
                MergeError::Malformed("<resources> opening tag is never closed".into())
            })?
        }
    };

    if self_closing {
        return Err(MergeError::Malformed(
            "<resources/> is empty, no room for the block".into(),
        ));
    }

    let mut out = Vec::with_capacity(lines.len() + identifiers.len() + 3);
    out.extend_from_slice(&lines[..close_line]);

    let opener = &lines[close_line];
    let rest = &opener[close_at..];
    let tail = if rest.trim().is_empty() {
        out.push(with_eol(opener, eol));
        None
    } else {
        out.push(format!("{}{}", &opener[..close_at], eol));
        Some(rest.to_string())
    };

    out.push(sentinel_line(BEGIN_MARKER, eol));
    for (_, text) in table.ordered(identifiers) {
        out.push(with_eol(text, eol));
    }
    out.push(sentinel_line(END_MARKER, eol));

    out.extend(tail);
    out.extend_from_slice(&lines[close_line + 1..]);
    Ok(Document::from_lines(out))
}

fn with_eol(text: &str, eol: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}{}", text, eol)
    }
}
