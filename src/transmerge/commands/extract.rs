use crate::config::MergeConfig;
use crate::markup::{find_close, find_named, mask_lines, opening_tags};
use crate::model::{Document, EntryTable};
use tracing::debug;

/// Entries captured from one source file.
#[derive(Debug, Default)]
pub struct Extraction {
    pub table: EntryTable,
    /// Identifiers whose opening tag was found but never closed
    pub unterminated: Vec<String>,
}

/// Captures every configured identifier found in `source`.
///
/// For each identifier the first live element carrying that `name` is taken,
/// from its opening `<` through the `>` of its closing tag. Markup sharing
/// those lines outside the element is left behind. The captured text is
/// prefixed with the leading whitespace of its first line and carries no
/// trailing line terminator. Text is kept verbatim apart from the renamed
/// identifier, whose `name` value gets the configured suffix.
pub fn run(source: &Document, config: &MergeConfig) -> Extraction {
    let lines = source.lines();
    let masked = mask_lines(lines);
    let mut extraction = Extraction::default();

    for id in &config.identifiers {
        let Some((first, tag)) = masked
            .iter()
            .enumerate()
            .find_map(|(i, line)| find_named(line, id).map(|tag| (i, tag)))
        else {
            continue;
        };

        let close = match tag.end {
            Some(end) if tag.self_closing => Some((first, end)),
            Some(end) => closing_tag(&masked, first, end, &tag.element),
            None => closing_tag(&masked, first, masked[first].len(), &tag.element),
        };

        let Some((last, close_at)) = close else {
            debug!(identifier = %id, line = first + 1, "entry never closed");
            extraction.unterminated.push(id.clone());
            continue;
        };

        let mut body = if first == last {
            lines[first][tag.start..close_at].to_string()
        } else {
            let mut body = lines[first][tag.start..].to_string();
            for line in &lines[first + 1..last] {
                body.push_str(line);
            }
            body.push_str(&lines[last][..close_at]);
            body
        };

        if let (Some(rule), Some(range)) = (config.rename_for(id), tag.name_value) {
            body.replace_range(range.start - tag.start..range.end - tag.start, &rule.renamed());
        }

        debug!(identifier = %id, lines = last - first + 1, "captured entry");
        extraction
            .table
            .insert(id.clone(), format!("{}{}", indentation(&lines[first]), body));
    }

    extraction
}

/// Line and offset just past the closing tag of an element whose content
/// starts at offset `from` of line `first`.
///
/// Elements of the same kind do not nest, so a new opening tag of that kind
/// before any closing tag means the entry was never closed.
fn closing_tag(masked: &[String], first: usize, from: usize, element: &str) -> Option<(usize, usize)> {
    for (i, line) in masked.iter().enumerate().skip(first) {
        let offset = if i == first { from } else { 0 };
        let text = &line[offset..];
        let reopened = opening_tags(text)
            .into_iter()
            .find(|tag| tag.element == element)
            .map(|tag| tag.start);

        if let Some(at) = find_close(&text[..reopened.unwrap_or(text.len())], element) {
            return Some((i, offset + at));
        }
        if reopened.is_some() {
            return None;
        }
    }
    None
}

fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
