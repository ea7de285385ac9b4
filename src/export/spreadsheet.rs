//! The XLSX statement renderer.

use rust_xlsxwriter::Workbook;

use crate::{Error, expense::Expense};

const HEADERS: [&str; 4] = ["Date", "Description", "Category", "Amount"];
const COLUMN_WIDTHS: [f64; 4] = [15.0, 40.0, 20.0, 15.0];

/// Render `expenses` as an XLSX workbook with a single "Expenses"
/// worksheet.
///
/// Dates are written as ISO calendar-date strings and amounts as plain
/// numbers, one data row per expense below the header row.
pub(super) fn render(expenses: &[Expense]) -> Result<Vec<u8>, Error> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Expenses").map_err(render_error)?;

    for (column, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(column as u16, *width)
            .map_err(render_error)?;
    }

    for (column, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, column as u16, *header)
            .map_err(render_error)?;
    }

    for (index, expense) in expenses.iter().enumerate() {
        let row = (index + 1) as u32;

        worksheet
            .write_string(row, 0, expense.date.to_string())
            .map_err(render_error)?;
        worksheet
            .write_string(row, 1, &expense.description)
            .map_err(render_error)?;
        worksheet
            .write_string(row, 2, &expense.category)
            .map_err(render_error)?;
        worksheet
            .write_number(row, 3, expense.amount)
            .map_err(render_error)?;
    }

    workbook.save_to_buffer().map_err(render_error)
}

fn render_error(error: rust_xlsxwriter::XlsxError) -> Error {
    Error::ExportRenderError(error.to_string())
}
