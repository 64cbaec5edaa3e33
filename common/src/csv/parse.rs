use super::tokenizer::{clean_value, split_line};
use super::BOM;
use crate::model::GuaranteeStatus;
use serde::Serialize;

/// A data line decoded by position, before validation.
///
/// Blank text cells are `None`. `value` is `None` only when the cell was
/// blank; text without a leading number decodes to `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDraft {
    pub guarantee_number: Option<String>,
    pub guarantee_type: Option<String>,
    pub value: Option<f64>,
    pub currency: String,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub status: GuaranteeStatus,
    pub bank_name: Option<String>,
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Decodes every data line whose width matches the header.
///
/// Lines with a different cell count are dropped without being reported.
/// The result depends only on `text`, so the call can be repeated freely.
pub fn parse_guarantees(text: &str, home_currency: &str) -> Vec<RowDraft> {
    let text = strip_bom(text).trim();
    let mut lines = text.split('\n');

    let width = match lines.next() {
        Some(header) => header.split(',').count(),
        None => return Vec::new(),
    };

    lines
        .map(split_line)
        .filter(|cells| cells.len() == width)
        .map(|cells| decode_row(&cells, home_currency))
        .collect()
}

fn decode_row(cells: &[String], home_currency: &str) -> RowDraft {
    let text = |idx: usize| {
        cells
            .get(idx)
            .map(|c| clean_value(c))
            .filter(|c| !c.is_empty())
    };

    RowDraft {
        guarantee_number: text(0),
        guarantee_type: text(1),
        value: text(2).map(|v| parse_amount(&v)),
        currency: text(3).unwrap_or_else(|| home_currency.to_string()),
        issue_date: text(4),
        expiry_date: text(5),
        status: classify_status(&text(6).unwrap_or_default()),
        bank_name: text(7),
    }
}

/// Reads the longest numeric prefix of `cell`, so `1000 SAR` is 1000 and
/// `1,500` is 1. No prefix at all gives 0.
fn parse_amount(cell: &str) -> f64 {
    let cell = cell.trim();
    let end = numeric_prefix_len(cell.as_bytes());
    cell[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Length of the leading `[+-]digits[.digits][e[+-]digits]` run. Zero when
/// there is no mantissa digit.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

/// Maps free text onto a status.
///
/// Text mentioning "active" (in Arabic or English) is active, text
/// mentioning "expired" is expired, everything else is pending.
pub fn classify_status(text: &str) -> GuaranteeStatus {
    let text = text.to_lowercase();
    if text.contains("نشط") || text.contains("active") {
        GuaranteeStatus::Active
    } else if text.contains("منتهي") || text.contains("expired") {
        GuaranteeStatus::Expired
    } else {
        GuaranteeStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "guarantee_number,guarantee_type,value,currency,issue_date,expiry_date,status,bank_name";

    #[test]
    fn mismatched_width_lines_are_dropped() {
        let text = format!(
            "{HEADER}\nBG-1,performance,10,SAR,2025-01-01,2025-12-31,active,Alinma\nBG-2,performance,10\nBG-3,final,\"1,5\",USD,,,,Riyad,extra"
        );
        let rows = parse_guarantees(&text, "SAR");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].guarantee_number.as_deref(), Some("BG-1"));
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse_guarantees(HEADER, "SAR").is_empty());
        assert!(parse_guarantees("", "SAR").is_empty());
    }

    #[test]
    fn blank_cells_become_defaults() {
        let text = format!("{HEADER}\nBG-9,,,,,,,");
        let row = &parse_guarantees(&text, "EUR")[0];
        assert_eq!(row.guarantee_type, None);
        assert_eq!(row.value, None);
        assert_eq!(row.currency, "EUR");
        assert_eq!(row.status, GuaranteeStatus::Pending);
        assert_eq!(row.bank_name, None);
    }

    #[test]
    fn non_numeric_value_decodes_to_zero() {
        let text = format!("{HEADER}\nBG-1,performance,abc,SAR,,,,Alinma");
        assert_eq!(parse_guarantees(&text, "SAR")[0].value, Some(0.0));

        let text = format!("{HEADER}\nBG-1,performance,inf,SAR,,,,Alinma");
        assert_eq!(parse_guarantees(&text, "SAR")[0].value, Some(0.0));
    }

    #[test]
    fn crlf_and_bom_are_tolerated() {
        let text = format!("\u{feff}{HEADER}\r\n\"BG-1\",\"ضمان أداء\",250.5,SAR,2025-01-01,2025-06-01,نشط,\"Al Rajhi\"\r\n");
        let rows = parse_guarantees(&text, "SAR");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, Some(250.5));
        assert_eq!(rows[0].bank_name.as_deref(), Some("Al Rajhi"));
        assert_eq!(rows[0].status, GuaranteeStatus::Active);
    }

    #[test]
    fn classifier_matches_both_languages() {
        assert_eq!(classify_status("نشط"), GuaranteeStatus::Active);
        assert_eq!(classify_status("ACTIVE"), GuaranteeStatus::Active);
        assert_eq!(classify_status("منتهي الصلاحية"), GuaranteeStatus::Expired);
        assert_eq!(classify_status("Expired"), GuaranteeStatus::Expired);
        assert_eq!(classify_status("قيد المراجعة"), GuaranteeStatus::Pending);
        assert_eq!(classify_status(""), GuaranteeStatus::Pending);
    }

    #[test]
    fn amount_keeps_its_numeric_prefix() {
        let amount = |cell: &str| {
            let text = format!("{HEADER}\nBG-1,performance,{cell},SAR,,,,Alinma");
            parse_guarantees(&text, "SAR")[0].value
        };
        assert_eq!(amount("1000 SAR"), Some(1000.0));
        assert_eq!(amount("12.5abc"), Some(12.5));
        assert_eq!(amount("\"1,500\""), Some(1.0));
        assert_eq!(amount("2.5e3 riyal"), Some(2500.0));
        assert_eq!(amount("7e"), Some(7.0));
        assert_eq!(amount("-40"), Some(-40.0));
        assert_eq!(amount("SAR 1000"), Some(0.0));
        assert_eq!(amount("."), Some(0.0));
    }

    #[test]
    fn classifier_matches_substrings() {
        assert_eq!(classify_status("status: active"), GuaranteeStatus::Active);
        assert_eq!(classify_status("inactive"), GuaranteeStatus::Active);
        assert_eq!(classify_status("ضمان نشط حاليا"), GuaranteeStatus::Active);
        assert_eq!(classify_status("has expired"), GuaranteeStatus::Expired);
    }
}
