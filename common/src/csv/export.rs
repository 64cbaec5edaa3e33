use super::BOM;
use crate::model::{GuaranteeRecord, GuaranteeStatus, GuaranteeType};

/// Header of an import file (and of the template), in column order.
pub const TEMPLATE_HEADERS: [&str; 8] = [
    "رقم الضمان",
    "نوع الضمان",
    "القيمة",
    "العملة",
    "تاريخ الإصدار",
    "تاريخ الانتهاء",
    "الحالة",
    "البنك",
];

/// Header of an export: the import columns plus the creation date.
pub const EXPORT_HEADERS: [&str; 9] = [
    "رقم الضمان",
    "نوع الضمان",
    "القيمة",
    "العملة",
    "تاريخ الإصدار",
    "تاريخ الانتهاء",
    "الحالة",
    "البنك",
    "تاريخ الإنشاء",
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Renders records as CSV text, or `None` when there is nothing to export.
///
/// Text cells are wrapped in quotes as-is; a quote inside a cell is not
/// escaped.
pub fn export_guarantees(records: &[GuaranteeRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));
    lines.extend(records.iter().map(export_line));

    Some(format!("{}{}", BOM, lines.join("\n")))
}

fn export_line(record: &GuaranteeRecord) -> String {
    [
        quoted(&record.guarantee_number),
        quoted(record.guarantee_type.label()),
        record.value.to_string(),
        quoted(&record.currency),
        record.issue_date.format(DATE_FORMAT).to_string(),
        record.expiry_date.format(DATE_FORMAT).to_string(),
        quoted(record.status.label()),
        quoted(&record.bank_name),
        record.created_at.format(DISPLAY_DATE_FORMAT).to_string(),
    ]
    .join(",")
}

fn quoted(cell: &str) -> String {
    format!("\"{}\"", cell)
}

/// A two-line file users can fill in: the header and one example row.
pub fn template_csv() -> String {
    let sample = [
        "BG-2025-001",
        GuaranteeType::Performance.label(),
        "1000000",
        "SAR",
        "2025-01-01",
        "2025-12-31",
        GuaranteeStatus::Active.label(),
        "البنك الأهلي",
    ];
    format!("{}{}\n{}", BOM, TEMPLATE_HEADERS.join(","), sample.join(","))
}
