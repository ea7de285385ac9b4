//! Statement exports: render a filtered ledger slice as a spreadsheet,
//! PDF, or CSV document for download.
//!
//! Rendering is a pure read: it holds no locks while serializing, has no
//! side effect on the stores, and an empty ledger slice degrades to an
//! empty document rather than an error.

mod csv;
mod endpoint;
mod pdf;
mod spreadsheet;

pub use endpoint::export_expenses_endpoint;

use crate::{
    Error,
    expense::{Expense, StatementFilter},
};

/// The document formats a statement can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// An XLSX workbook with one worksheet.
    Spreadsheet,
    /// A paginated, formatted PDF statement.
    Pdf,
    /// Plain-text CSV.
    Csv,
}

impl ExportFormat {
    /// Parse the `format` query parameter.
    ///
    /// An absent parameter means the spreadsheet; an unrecognized string
    /// falls through to CSV. Both fallbacks are fixed policy, not errors.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::to_lowercase).as_deref() {
            None | Some("xlsx") | Some("excel") => Self::Spreadsheet,
            Some("pdf") => Self::Pdf,
            _ => Self::Csv,
        }
    }
}

/// A rendered statement document ready for download.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The suggested download filename.
    pub filename: String,
    /// The MIME type to serve the document under.
    pub content_type: &'static str,
    /// The document bytes.
    pub bytes: Vec<u8>,
}

/// Render `expenses` (already filtered and ordered newest first) as
/// `format`.
///
/// # Errors
/// Returns [Error::ExportRenderError] if the underlying serializer fails.
/// An empty `expenses` slice is not an error.
pub fn render_document(
    expenses: &[Expense],
    filter: &StatementFilter,
    format: ExportFormat,
) -> Result<Document, Error> {
    match format {
        ExportFormat::Spreadsheet => Ok(Document {
            filename: ranged_filename(filter, "xlsx"),
            content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            bytes: spreadsheet::render(expenses)?,
        }),
        ExportFormat::Pdf => Ok(Document {
            filename: ranged_filename(filter, "pdf"),
            content_type: "application/pdf",
            bytes: pdf::render(expenses, filter)?,
        }),
        ExportFormat::Csv => Ok(Document {
            filename: "expenses.csv".to_owned(),
            content_type: "text/csv",
            bytes: csv::render(expenses)?,
        }),
    }
}

/// Build `expenses[_from-<date>][_to-<date>].<extension>` so a downloaded
/// statement names the date range it covers.
fn ranged_filename(filter: &StatementFilter, extension: &str) -> String {
    let mut parts = vec!["expenses".to_owned()];

    if let Some(from) = filter.from {
        parts.push(format!("from-{from}"));
    }

    if let Some(to) = filter.to {
        parts.push(format!("to-{to}"));
    }

    format!("{}.{extension}", parts.join("_"))
}

#[cfg(test)]
mod format_tests {
    use super::ExportFormat;

    #[test]
    fn absent_format_means_spreadsheet() {
        assert_eq!(ExportFormat::from_query(None), ExportFormat::Spreadsheet);
    }

    #[test]
    fn known_formats_parse() {
        assert_eq!(
            ExportFormat::from_query(Some("xlsx")),
            ExportFormat::Spreadsheet
        );
        assert_eq!(
            ExportFormat::from_query(Some("Excel")),
            ExportFormat::Spreadsheet
        );
        assert_eq!(ExportFormat::from_query(Some("PDF")), ExportFormat::Pdf);
        assert_eq!(ExportFormat::from_query(Some("csv")), ExportFormat::Csv);
    }

    #[test]
    fn unrecognized_format_falls_back_to_csv() {
        assert_eq!(ExportFormat::from_query(Some("docx")), ExportFormat::Csv);
    }
}
