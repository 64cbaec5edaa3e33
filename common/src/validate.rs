//! Acceptance check for rows decoded from an import file.
//!
//! A [`RowDraft`] is checked exactly once, here, and comes out as a tagged
//! [`ParsedRow`]: either a [`NewGuarantee`] ready for the store with every
//! default filled in, or the list of defects that kept it out.
//!
//! Rows entered through the single-record form skip this path; the form
//! already requires every field.

use crate::csv::RowDraft;
use crate::model::GuaranteeType;
use crate::requests::NewGuarantee;
use chrono::{Days, NaiveDate};
use std::fmt;
use thiserror::Error;

/// Days between the default issue date and the default expiry date.
pub const DEFAULT_TERM_DAYS: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    GuaranteeNumber,
    GuaranteeType,
    Value,
    IssueDate,
    ExpiryDate,
    BankName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::GuaranteeNumber => "guarantee_number",
            Field::GuaranteeType => "guarantee_type",
            Field::Value => "value",
            Field::IssueDate => "issue_date",
            Field::ExpiryDate => "expiry_date",
            Field::BankName => "bank_name",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowDefect {
    #[error("missing {0}")]
    Missing(Field),

    #[error("unknown guarantee type '{0}'")]
    UnknownType(String),

    #[error("invalid {field} '{text}'")]
    InvalidDate { field: Field, text: String },

    #[error("negative value {0}")]
    NegativeValue(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRow {
    Complete(NewGuarantee),
    Incomplete(Vec<RowDefect>),
}

impl ParsedRow {
    pub fn into_complete(self) -> Option<NewGuarantee> {
        match self {
            ParsedRow::Complete(guarantee) => Some(guarantee),
            ParsedRow::Incomplete(_) => None,
        }
    }
}

/// Checks a draft and fills its defaults.
///
/// `today` is the calendar date of the import; it becomes the issue date
/// when none is given, and the expiry date defaults to a year later.
/// `issue_date <= expiry_date` is not checked.
pub fn validate_row(draft: RowDraft, today: NaiveDate, home_currency: &str) -> ParsedRow {
    let mut defects = Vec::new();

    if draft.guarantee_number.is_none() {
        defects.push(RowDefect::Missing(Field::GuaranteeNumber));
    }
    let guarantee_type = match draft.guarantee_type.as_deref() {
        None => {
            defects.push(RowDefect::Missing(Field::GuaranteeType));
            None
        }
        Some(label) => {
            let resolved = GuaranteeType::from_label(label);
            if resolved.is_none() {
                defects.push(RowDefect::UnknownType(label.to_string()));
            }
            resolved
        }
    };
    match draft.value {
        None => defects.push(RowDefect::Missing(Field::Value)),
        Some(v) if v < 0.0 => defects.push(RowDefect::NegativeValue(v)),
        Some(_) => {}
    }
    if draft.bank_name.is_none() {
        defects.push(RowDefect::Missing(Field::BankName));
    }

    let issue_date = parse_date(Field::IssueDate, draft.issue_date.as_deref(), &mut defects)
        .unwrap_or(today);
    let expiry_date = parse_date(Field::ExpiryDate, draft.expiry_date.as_deref(), &mut defects)
        .unwrap_or_else(|| default_expiry(today));

    match (draft.guarantee_number, guarantee_type, draft.value, draft.bank_name) {
        (Some(guarantee_number), Some(guarantee_type), Some(value), Some(bank_name))
            if defects.is_empty() =>
        {
            let currency = if draft.currency.trim().is_empty() {
                home_currency.to_string()
            } else {
                draft.currency
            };
            ParsedRow::Complete(NewGuarantee {
                guarantee_number,
                guarantee_type,
                value,
                currency: Some(currency),
                issue_date,
                expiry_date,
                status: Some(draft.status),
                bank_name,
            })
        }
        _ => ParsedRow::Incomplete(defects),
    }
}

fn parse_date(field: Field, text: Option<&str>, defects: &mut Vec<RowDefect>) -> Option<NaiveDate> {
    let text = text?;
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            defects.push(RowDefect::InvalidDate {
                field,
                text: text.to_string(),
            });
            None
        }
    }
}

fn default_expiry(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(DEFAULT_TERM_DAYS))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GuaranteeStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn draft() -> RowDraft {
        RowDraft {
            guarantee_number: Some("BG-1".into()),
            guarantee_type: Some("ضمان أداء".into()),
            value: Some(1000.0),
            currency: "USD".into(),
            issue_date: Some("2025-01-01".into()),
            expiry_date: Some("2025-12-31".into()),
            status: GuaranteeStatus::Active,
            bank_name: Some("Alinma".into()),
        }
    }

    #[test]
    fn complete_row_keeps_its_values() {
        let row = validate_row(draft(), today(), "SAR").into_complete().unwrap();
        assert_eq!(row.guarantee_type, GuaranteeType::Performance);
        assert_eq!(row.currency.as_deref(), Some("USD"));
        assert_eq!(row.status, Some(GuaranteeStatus::Active));
        assert_eq!(row.issue_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn missing_dates_default_to_today_and_a_year_later() {
        let mut d = draft();
        d.issue_date = None;
        d.expiry_date = None;
        let row = validate_row(d, today(), "SAR").into_complete().unwrap();
        assert_eq!(row.issue_date, today());
        assert_eq!(row.expiry_date, NaiveDate::from_ymd_opt(2027, 10, 19).unwrap());
    }

    #[test]
    fn blank_currency_falls_back_to_home() {
        let mut d = draft();
        d.currency = String::new();
        let row = validate_row(d, today(), "SAR").into_complete().unwrap();
        assert_eq!(row.currency.as_deref(), Some("SAR"));
    }

    #[test]
    fn missing_required_fields_are_listed() {
        let mut d = draft();
        d.bank_name = None;
        d.value = None;
        assert_eq!(
            validate_row(d, today(), "SAR"),
            ParsedRow::Incomplete(vec![
                RowDefect::Missing(Field::Value),
                RowDefect::Missing(Field::BankName),
            ])
        );
    }

    #[test]
    fn zero_value_is_accepted() {
        let mut d = draft();
        d.value = Some(0.0);
        assert!(validate_row(d, today(), "SAR").into_complete().is_some());
    }

    #[test]
    fn unknown_type_and_bad_date_are_defects() {
        let mut d = draft();
        d.guarantee_type = Some("bid bond".into());
        d.expiry_date = Some("31/12/2025".into());
        match validate_row(d, today(), "SAR") {
            ParsedRow::Incomplete(defects) => {
                assert_eq!(defects.len(), 2);
                assert_eq!(defects[0].to_string(), "unknown guarantee type 'bid bond'");
                assert_eq!(defects[1].to_string(), "invalid expiry_date '31/12/2025'");
            }
            other => panic!("expected incomplete row, got {:?}", other),
        }
    }

    #[test]
    fn expiry_before_issue_is_not_rejected() {
        let mut d = draft();
        d.issue_date = Some("2026-01-01".into());
        d.expiry_date = Some("2025-01-01".into());
        assert!(validate_row(d, today(), "SAR").into_complete().is_some());
    }
}
