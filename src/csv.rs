// Delimited text rows: quote-aware writer and reader.
use std::io::{self, Write};
use std::mem::take;

/// Marker that lets spreadsheet tools detect UTF-8.
pub const BOM: &str = "\u{FEFF}";

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one row terminated by CRLF.
pub fn write_row<W: Write>(w: &mut W, row: &[String], sep: char) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, "{sep}")?;
        }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

/* ---------------- Parsing ---------------- */

/// Parse delimited text (quotes, doubled quotes, CRLF, leading BOM).
/// Blank lines are dropped.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            c if c == sep && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if row.len() == 1 && row[0].is_empty() {
                    row.clear();
                } else {
                    rows.push(take(&mut row));
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &row(&["Half-Life", "Portal, 2", "say \"hi\""]), ',').unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Half-Life,\"Portal, 2\",\"say \"\"hi\"\"\"\r\n"
        );
    }

    #[test]
    fn parses_quoted_fields_and_bom() {
        let text = "\u{FEFF}title,hours\r\n\"Portal, 2\",12.5\r\n\r\n\"a \"\"b\"\"\",0.0";
        assert_eq!(
            parse_rows(text, ','),
            vec![
                row(&["title", "hours"]),
                row(&["Portal, 2", "12.5"]),
                row(&["a \"b\"", "0.0"]),
            ]
        );
    }

    #[test]
    fn embedded_newlines_survive() {
        let mut buf = Vec::new();
        write_row(&mut buf, &row(&["two\nlines", "1.0"]), ',').unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(parse_rows(&text, ','), vec![row(&["two\nlines", "1.0"])]);
    }
}
