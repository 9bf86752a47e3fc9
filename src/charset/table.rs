//! Delimited table reader
//!
//! Comma-separated, `"`-quoted, `""` escapes. Quoted fields may span lines.
//! A quote only opens a quoted field at the start of a cell; text after the
//! closing quote is kept literally up to the next delimiter.

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Normalize line endings: `\r\n` and lone `\r` become `\n`
fn universal_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse table text into rows of cells
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    // A leading BOM is encoding metadata, not table content; keep it out of the set
    let text = universal_newlines(text.strip_prefix('\u{FEFF}').unwrap_or(text));
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut chars = text.chars().peekable();
    let mut at_field_start = true;
    let mut row_has_content = false;

    while let Some(c) = chars.next() {
        match c {
            QUOTE if at_field_start => {
                at_field_start = false;
                row_has_content = true;
                loop {
                    match chars.next() {
                        Some(QUOTE) => {
                            if chars.peek() == Some(&QUOTE) {
                                // Escaped quote
                                field.push(QUOTE);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        Some(c) => field.push(c),
                        // Unterminated quote: keep what was read
                        None => break,
                    }
                }
            }
            DELIMITER => {
                row.push(std::mem::take(&mut field));
                at_field_start = true;
                row_has_content = true;
            }
            '\n' => {
                if row_has_content {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                } else {
                    // Blank line
                    rows.push(Vec::new());
                }
                at_field_start = true;
                row_has_content = false;
            }
            c => {
                field.push(c);
                at_field_start = false;
                row_has_content = true;
            }
        }
    }

    if row_has_content {
        row.push(field);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_rows() {
        let rows = parse_rows("id,名前\n1,勇者\n");
        assert_eq!(rows, vec![row(&["id", "名前"]), row(&["1", "勇者"])]);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let rows = parse_rows("a,b\nc,d");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn test_quoted_field_with_delimiter_and_escape() {
        let rows = parse_rows("\"你好，世界, \"\"引号\"\"\",x\n");
        assert_eq!(rows, vec![row(&["你好，世界, \"引号\"", "x"])]);
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let rows = parse_rows("\"第一行\r\n第二行\",end\r\n");
        assert_eq!(rows, vec![row(&["第一行\n第二行", "end"])]);
    }

    #[test]
    fn test_text_after_closing_quote_is_kept() {
        let rows = parse_rows("\"ab\"c,d\n");
        assert_eq!(rows, vec![row(&["abc", "d"])]);
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        let rows = parse_rows("a\"b,c\n");
        assert_eq!(rows, vec![row(&["a\"b", "c"])]);
    }

    #[test]
    fn test_empty_cells_and_blank_lines() {
        let rows = parse_rows(",,\n\nx\n");
        assert_eq!(rows, vec![row(&["", "", ""]), Vec::new(), row(&["x"])]);
    }

    #[test]
    fn test_bom_and_lone_cr() {
        let rows = parse_rows("\u{FEFF}a,b\rc\r");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c"])]);
    }

    #[test]
    fn test_unterminated_quote() {
        let rows = parse_rows("\"open,field");
        assert_eq!(rows, vec![row(&["open,field"])]);
    }
}
