//! Quote-aware CSV tokenizer.
//!
//! Purely lexical: no header handling, no trimming. Rules:
//!  - `,` separates fields, `\n` outside quotes ends a row, `\r` is dropped
//!  - `"` toggles quote mode; `""` inside quotes is a literal `"`
//!  - a row consisting of one empty field (blank line, trailing newline) is dropped
//!  - an unterminated quote at end of input is accepted as-is

/// Splits `text` into rows of fields.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\n' => {
                row.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            '\r' => {}
            _ => field.push(ch),
        }
    }

    row.push(field);
    push_row(&mut rows, row);
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.len() > 1 || row.first().is_some_and(|f| !f.is_empty()) {
        rows.push(row);
    }
}
