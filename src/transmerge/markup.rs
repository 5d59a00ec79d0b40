//! # Markup Scanning
//!
//! Resource files are never parsed into a tree: the merge copies almost every
//! byte through untouched, so it works on lines. What this module provides is
//! the small amount of structure the line passes need:
//!
//! - opening tags, read as an element name plus a quoted attribute list, so a
//!   `name` attribute is found whatever its quote style or position
//! - closing tags matched by element name (`</string>`, `</plurals >`)
//! - comment masking, so markup inside `<!-- ... -->` is never mistaken for
//!   a live element
//! - the sentinel comments that delimit the auto-merged block
//!
//! All byte offsets returned here are valid for the original line, including
//! lines that went through [`mask_comments`].

use std::ops::Range;

pub const ROOT_ELEMENT: &str = "resources";
pub const BEGIN_MARKER: &str = "BEGIN: do not remove";
pub const END_MARKER: &str = "END: do not remove";

const SENTINEL_INDENT: &str = "    ";

/// Renders a sentinel comment line for `marker`, terminated with `eol`.
pub fn sentinel_line(marker: &str, eol: &str) -> String {
    format!("{SENTINEL_INDENT}<!-- {marker} :: auto-merged strings :: {marker} -->{eol}")
}

pub fn is_begin_sentinel(line: &str) -> bool {
    line.contains(BEGIN_MARKER)
}

pub fn is_end_sentinel(line: &str) -> bool {
    line.contains(END_MARKER)
}

/// An opening tag found on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningTag {
    pub element: String,
    /// Offset of the `<`.
    pub start: usize,
    /// Range of the `name` attribute value, quotes excluded.
    pub name_value: Option<Range<usize>>,
    /// Offset just past the closing `>`, when the tag ends on this line.
    pub end: Option<usize>,
    pub self_closing: bool,
    /// Quote character of an attribute value left open at the end of the line.
    pub pending_quote: Option<u8>,
}

impl OpeningTag {
    fn unterminated(element: String, start: usize, name_value: Option<Range<usize>>) -> Self {
        Self {
            element,
            start,
            name_value,
            end: None,
            self_closing: false,
            pending_quote: None,
        }
    }
}

/// Replaces comment text with spaces, byte for byte.
///
/// `in_comment` carries the state across lines so multi-line comments are
/// masked as a whole. Offsets into the result are offsets into `line`.
pub fn mask_comments(line: &str, in_comment: &mut bool) -> String {
    let bytes = line.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if *in_comment {
            if bytes[i..].starts_with(b"-->") {
                out.extend_from_slice(b"   ");
                i += 3;
                *in_comment = false;
            } else {
                out.push(b' ');
                i += 1;
            }
        } else if bytes[i..].starts_with(b"<!--") {
            out.extend_from_slice(b"    ");
            i += 4;
            *in_comment = true;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    // Comment boundaries are ASCII, so whole characters are replaced and the
    // buffer stays valid UTF-8.
    String::from_utf8_lossy(&out).into_owned()
}

/// Masks every line of a document, carrying comment state from line to line.
pub fn mask_lines(lines: &[String]) -> Vec<String> {
    let mut in_comment = false;
    lines
        .iter()
        .map(|line| mask_comments(line, &mut in_comment))
        .collect()
}

/// All opening tags that start on `line`, in order.
pub fn opening_tags(line: &str) -> Vec<OpeningTag> {
    let bytes = line.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while let Some(rel) = line[i..].find('<') {
        let start = i + rel;
        let name_start = start + 1;
        let name_end = scan_while(bytes, name_start, is_name_byte);
        if name_end == name_start || !bytes[name_start].is_ascii_alphabetic() {
            // `</x>`, `<!...>`, `<?...?>` or a stray `<`
            i = name_start;
            continue;
        }

        let element = line[name_start..name_end].to_string();
        let (tag, next) = parse_attributes(line, start, element, name_end);
        tags.push(tag);
        i = next;
    }

    tags
}

fn parse_attributes(line: &str, start: usize, element: String, from: usize) -> (OpeningTag, usize) {
    let bytes = line.as_bytes();
    let mut name_value = None;
    let mut i = from;

    loop {
        i = skip_whitespace(bytes, i);
        if i >= bytes.len() {
            return (OpeningTag::unterminated(element, start, name_value), i);
        }

        match bytes[i] {
            b'>' => {
                let tag = OpeningTag {
                    end: Some(i + 1),
                    ..OpeningTag::unterminated(element, start, name_value)
                };
                return (tag, i + 1);
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                let tag = OpeningTag {
                    end: Some(i + 2),
                    self_closing: true,
                    ..OpeningTag::unterminated(element, start, name_value)
                };
                return (tag, i + 2);
            }
            b'<' => return (OpeningTag::unterminated(element, start, name_value), i),
            _ => {}
        }

        let attr_start = i;
        let attr_end = scan_while(bytes, i, is_name_byte);
        if attr_end == attr_start {
            i += 1;
            continue;
        }

        i = skip_whitespace(bytes, attr_end);
        if bytes.get(i) != Some(&b'=') {
            continue;
        }

        i = skip_whitespace(bytes, i + 1);
        let quote = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => q,
            _ => continue,
        };

        let value_start = i + 1;
        match bytes[value_start..].iter().position(|&b| b == quote) {
            Some(len) => {
                if &line[attr_start..attr_end] == "name" && name_value.is_none() {
                    name_value = Some(value_start..value_start + len);
                }
                i = value_start + len + 1;
            }
            None => {
                let tag = OpeningTag {
                    pending_quote: Some(quote),
                    ..OpeningTag::unterminated(element, start, name_value)
                };
                return (tag, bytes.len());
            }
        }
    }
}

/// First opening tag on `line` whose `name` attribute equals `name`.
pub fn find_named(line: &str, name: &str) -> Option<OpeningTag> {
    opening_tags(line).into_iter().find(|tag| {
        tag.name_value
            .as_ref()
            .map(|range| &line[range.clone()] == name)
            .unwrap_or(false)
    })
}

/// First opening tag of the root element on `line`.
pub fn find_root(line: &str) -> Option<OpeningTag> {
    opening_tags(line)
        .into_iter()
        .find(|tag| tag.element == ROOT_ELEMENT)
}

/// Offset just past the first closing tag of `element` in `text`.
pub fn find_close(text: &str, element: &str) -> Option<usize> {
    let needle = format!("</{element}");
    let mut from = 0;

    while let Some(rel) = text[from..].find(&needle) {
        let after = from + rel + needle.len();
        let rest = &text[after..];
        let trimmed = rest.trim_start();
        if trimmed.starts_with('>') {
            return Some(after + (rest.len() - trimmed.len()) + 1);
        }
        from = after;
    }

    None
}

/// Finds the `>` ending a tag whose attributes continued onto this line.
///
/// `quote` is the attribute quote still open from the previous line, and is
/// updated for the next one. Returns the offset just past `>` and whether the
/// tag was self-closing.
pub fn tag_close(line: &str, quote: &mut Option<u8>) -> Option<(usize, bool)> {
    let bytes = line.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        match *quote {
            Some(q) if b == q => *quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => *quote = Some(b),
                b'>' => {
                    let self_closing = i > 0 && bytes[i - 1] == b'/';
                    return Some((i + 1, self_closing));
                }
                _ => {}
            },
        }
    }

    None
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')
}

fn scan_while(bytes: &[u8], from: usize, pred: fn(u8) -> bool) -> usize {
    let mut i = from;
    while i < bytes.len() && pred(bytes[i]) {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    scan_while(bytes, from, |b| b.is_ascii_whitespace())
}
