/// Splits one CSV line into trimmed cells.
///
/// A `"` toggles the inside-quotes state and is dropped; a `,` only splits
/// while outside quotes. There is no escape sequence for a literal quote.
pub fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    cells.push(current.trim().to_string());
    cells
}

/// Removes every double quote and surrounding whitespace from a cell.
pub fn clean_value(cell: &str) -> String {
    cell.replace('"', "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_inside_quotes_do_not_split() {
        assert_eq!(
            split_line(r#"BG-1,"Riyad Bank, Main Branch", 500 "#),
            vec!["BG-1", "Riyad Bank, Main Branch", "500"]
        );
    }

    #[test]
    fn empty_line_is_one_empty_cell() {
        assert_eq!(split_line(""), vec![String::new()]);
    }

    #[test]
    fn trailing_comma_yields_empty_cell() {
        assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn unbalanced_quote_swallows_the_rest_of_the_line() {
        assert_eq!(split_line(r#"a,"b,c"#), vec!["a", "b,c"]);
    }

    #[test]
    fn carriage_return_is_trimmed() {
        assert_eq!(split_line("a,b\r"), vec!["a", "b"]);
    }

    #[test]
    fn clean_value_strips_inner_quotes() {
        assert_eq!(clean_value(r#"  "say "hi"" "#), "say hi");
    }
}
