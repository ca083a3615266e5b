//! Character-level scanner for quoted, comma-delimited text.

const BOM: char = '\u{feff}';

/// Split raw delimited text into rows of fields.
///
/// The scanner tracks a single quoted/unquoted flag:
/// - `""` inside a quoted field emits one literal quote
/// - `"` otherwise toggles quoting and is not emitted
/// - `,` outside quotes starts the next field
/// - `\n`, `\r` or `\r\n` outside quotes starts the next row
///
/// A field only exists once a character is read for it, so a delimiter at the
/// very end of the input adds no field. Delimiters and line terminators inside
/// quotes are kept literally. An unterminated quote simply runs to the end of
/// the input. Parsing never fails.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row = 0;
    let mut col = 0;
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let field = cell(&mut rows, row, col);

        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => col += 1,
            '\r' | '\n' if !quoted => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row += 1;
                col = 0;
            }
            _ => field.push(c),
        }
    }

    rows
}

/// Get the field at `(row, col)`, creating the row and field on first use.
fn cell(rows: &mut Vec<Vec<String>>, row: usize, col: usize) -> &mut String {
    while rows.len() <= row {
        rows.push(Vec::new());
    }
    let fields = &mut rows[row];
    while fields.len() <= col {
        fields.push(String::new());
    }
    &mut fields[col]
}
