//! The CSV statement renderer.

use csv::WriterBuilder;

use crate::{Error, expense::Expense};

/// Render `expenses` as CSV with a `date,description,category,amount`
/// header line.
///
/// Fields containing quotes, commas, or newlines are double-quoted with
/// embedded quotes doubled per RFC 4180; dates and amounts are written
/// raw with no currency formatting.
pub(super) fn render(expenses: &[Expense]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(["date", "description", "category", "amount"])
        .map_err(render_error)?;

    for expense in expenses {
        writer
            .write_record([
                expense.date.to_string(),
                expense.description.clone(),
                expense.category.clone(),
                expense.amount.to_string(),
            ])
            .map_err(render_error)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportRenderError(error.to_string()))
}

fn render_error(error: csv::Error) -> Error {
    Error::ExportRenderError(error.to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::expense::Expense;

    use super::render;

    fn expense(description: &str, amount: f64) -> Expense {
        Expense {
            id: 1,
            user: "u@x.com".to_owned(),
            amount,
            category: "Food".to_owned(),
            description: description.to_owned(),
            date: date!(2024 - 01 - 15),
        }
    }

    fn render_to_string(expenses: &[Expense]) -> String {
        String::from_utf8(render(expenses).unwrap()).unwrap()
    }

    #[test]
    fn empty_ledger_renders_header_only() {
        let got = render_to_string(&[]);

        assert_eq!(got, "date,description,category,amount\n");
    }

    #[test]
    fn renders_one_line_per_expense() {
        let got = render_to_string(&[expense("Groceries", 45.2), expense("Lunch", 12.5)]);

        let lines: Vec<&str> = got.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-01-15,Groceries,Food,45.2");
        assert_eq!(lines[2], "2024-01-15,Lunch,Food,12.5");
    }

    #[test]
    fn doubles_embedded_quotes() {
        let got = render_to_string(&[expense("He said \"hi\"", 5.0)]);

        assert!(
            got.contains("\"He said \"\"hi\"\"\""),
            "got: {got}"
        );
    }

    #[test]
    fn quotes_fields_containing_commas() {
        let got = render_to_string(&[expense("bread, milk, eggs", 5.0)]);

        assert!(got.contains("\"bread, milk, eggs\""), "got: {got}");
    }
}
