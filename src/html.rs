// File: ./src/html.rs
//! Tolerant scanner for exported schedule tables.
//!
//! Schedule exports are HTML fragments, not XML: unclosed `<td>`/`<tr>`,
//! `<br>` without a slash and named entities such as `&nbsp;` are common.
//! The scanner walks tags in order, closes cells and rows implicitly the way
//! a browser would, and yields the text of every data cell.
//!
//! Conventions:
//! - Rows inside `<thead>` are ignored.
//! - The first row of every `<tbody>` (or of the document when there is no
//!   `<tbody>`) is the header row and is skipped.
//! - A data cell is a `<td>` whose class list contains `cell` and which is not
//!   the first cell of its row.
use crate::error::{Result, ScheduleError};

pub const DATA_CELL_CLASS: &str = "cell";

#[derive(Debug)]
struct Tag<'a> {
    name: String,
    closing: bool,
    attrs: &'a str,
    start: usize,
    end: usize,
}

#[derive(Debug)]
struct OpenCell {
    is_td: bool,
    is_data: bool,
    content_start: usize,
}

/// Finds the next tag at or after `from`. Comments and doctypes come back as
/// tags named `!` so callers can skip over them.
fn next_tag(html: &str, mut from: usize) -> Option<Tag<'_>> {
    let bytes = html.as_bytes();
    loop {
        let start = from + html.get(from..)?.find('<')?;
        let rest = &html[start + 1..];

        if rest.starts_with('!') || rest.starts_with('?') {
            let end = if rest.starts_with("!--") {
                start + 1 + rest.find("-->")? + 3
            } else {
                start + 1 + rest.find('>')? + 1
            };
            return Some(Tag {
                name: "!".to_string(),
                closing: false,
                attrs: "",
                start,
                end,
            });
        }

        let closing = rest.starts_with('/');
        let name_start = start + 1 + usize::from(closing);
        let name_len = html[name_start..]
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();

        if name_len == 0 {
            // A stray `<` in text.
            from = start + 1;
            continue;
        }

        // Find the closing '>' while respecting quoted attribute values.
        let mut quote: Option<u8> = None;
        let mut end = None;
        for (i, &b) in bytes.iter().enumerate().skip(name_start + name_len) {
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'>' => {
                    end = Some(i + 1);
                    break;
                }
                None => {}
            }
        }
        let end = end?;

        return Some(Tag {
            name: html[name_start..name_start + name_len].to_ascii_lowercase(),
            closing,
            attrs: html[name_start + name_len..end - 1].trim_end_matches('/'),
            start,
            end,
        });
    }
}

/// Reads an attribute value from the raw attribute text of a tag.
fn attr_value<'a>(attrs: &'a str, key: &str) -> Option<&'a str> {
    let lower = attrs.to_ascii_lowercase();
    let mut search = 0;

    while let Some(pos) = lower[search..].find(key) {
        let idx = search + pos;
        search = idx + key.len();

        let preceded_ok = idx == 0 || lower.as_bytes()[idx - 1].is_ascii_whitespace();
        let after = lower[search..].trim_start();
        if !preceded_ok || !after.starts_with('=') {
            continue;
        }

        let value_offset = attrs.len() - after.len() + 1;
        let raw = attrs[value_offset..].trim_start();
        return match raw.chars().next() {
            Some(q @ ('"' | '\'')) => raw[1..].find(q).map(|e| &raw[1..1 + e]),
            Some(_) => Some(raw.split(|c: char| c.is_whitespace()).next().unwrap_or("")),
            None => None,
        };
    }
    None
}

fn has_class(attrs: &str, class: &str) -> bool {
    attr_value(attrs, "class")
        .map(|v| v.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Equivalent of `innerText` for a cell fragment: tags dropped, `<br>` as a
/// line break, entities decoded, whitespace collapsed and trimmed.
pub fn cell_text(fragment: &str) -> String {
    let mut raw = String::with_capacity(fragment.len());
    let mut pos = 0;

    while let Some(tag) = next_tag(fragment, pos) {
        raw.push_str(&fragment[pos..tag.start]);
        if tag.name == "br" || tag.name == "p" || tag.name == "div" {
            raw.push('\n');
        }
        pos = tag.end;
    }
    raw.push_str(&fragment[pos..]);

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw.as_str();
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let entity = after
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|c| (semi, c)));
        match entity {
            Some((semi, c)) => {
                decoded.push(c);
                rest = &after[semi + 1..];
            }
            _ => {
                decoded.push('&');
                rest = after;
            }
        }
    }
    decoded.push_str(rest);

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct RowBuilder {
    rows: Vec<Vec<String>>,
    current: Option<Vec<String>>,
    cell: Option<OpenCell>,
    cells_in_row: usize,
    in_thead: bool,
    rows_in_section: usize,
}

impl RowBuilder {
    fn close_cell(&mut self, html: &str, at: usize) {
        if let Some(cell) = self.cell.take()
            && let Some(row) = self.current.as_mut()
        {
            if cell.is_td && cell.is_data {
                row.push(cell_text(&html[cell.content_start..at]));
            }
        }
    }

    fn close_row(&mut self, html: &str, at: usize) {
        self.close_cell(html, at);
        if let Some(row) = self.current.take() {
            if self.in_thead {
                return;
            }
            self.rows_in_section += 1;
            if self.rows_in_section > 1 {
                self.rows.push(row);
            }
        }
    }
}

/// Returns the data-cell texts of every body row after the header row.
///
/// Fails with `MalformedDocument` only when the input contains no table rows
/// at all; rows with too few cells are returned as-is for the caller to judge.
pub fn table_rows(html: &str) -> Result<Vec<Vec<String>>> {
    if html.trim().is_empty() {
        return Err(ScheduleError::MalformedDocument("empty document".to_string()));
    }

    let mut b = RowBuilder::default();
    let mut saw_row = false;
    let mut pos = 0;

    while let Some(tag) = next_tag(html, pos) {
        pos = tag.end;
        match (tag.name.as_str(), tag.closing) {
            ("thead", false) => {
                b.close_row(html, tag.start);
                b.in_thead = true;
            }
            ("thead", true) => {
                b.close_row(html, tag.start);
                b.in_thead = false;
            }
            ("tbody" | "table", false) => {
                b.close_row(html, tag.start);
                b.in_thead = false;
                b.rows_in_section = 0;
            }
            ("tbody", true) | ("table", true) | ("tr", true) => b.close_row(html, tag.start),
            ("tr", false) => {
                b.close_row(html, tag.start);
                b.current = Some(Vec::new());
                b.cells_in_row = 0;
                saw_row = true;
            }
            ("td" | "th", false) => {
                b.close_cell(html, tag.start);
                if b.current.is_none() {
                    // Cell outside any <tr>: browsers open an implicit row.
                    b.current = Some(Vec::new());
                    b.cells_in_row = 0;
                    saw_row = true;
                }
                let is_first = b.cells_in_row == 0;
                b.cells_in_row += 1;
                b.cell = Some(OpenCell {
                    is_td: tag.name == "td",
                    is_data: !is_first && has_class(tag.attrs, DATA_CELL_CLASS),
                    content_start: tag.end,
                });
            }
            ("td" | "th", true) => b.close_cell(html, tag.start),
            _ => {}
        }
    }
    b.close_row(html, html.len());

    if !saw_row {
        return Err(ScheduleError::MalformedDocument("no table rows found".to_string()));
    }
    log::debug!("Scanned {} data rows", b.rows.len());
    Ok(b.rows)
}
