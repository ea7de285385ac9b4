//! The PDF statement renderer.
//!
//! The layout is a manual cursor over a US Letter page: a centered title,
//! an optional date-range subtitle, a four-column header with an underline
//! rule, then one row per expense flowing down the page. When the cursor
//! passes the bottom content boundary a fresh page is started and the
//! cursor resets to the top margin.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::{
    Error,
    expense::{Expense, StatementFilter},
    money::format_currency,
};

// US Letter geometry in millimetres.
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 12.7;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const ROW_STEP: f32 = 5.6;

// Column x positions; the amount column is anchored at its right edge.
const COL_DATE: f32 = MARGIN;
const COL_DESCRIPTION: f32 = 42.3;
const COL_CATEGORY: f32 = 127.0;
const COL_AMOUNT_RIGHT: f32 = PAGE_WIDTH - MARGIN;

const DESCRIPTION_MAX_CHARS: usize = 46;
const CATEGORY_MAX_CHARS: usize = 24;

// Helvetica metrics are not available here, so text width is estimated at
// half an em per glyph. Good enough for centering a title and right-aligning
// an amount column.
const MM_PER_PT: f32 = 0.352_778;
const GLYPH_WIDTH_EM: f32 = 0.5;

/// Render `expenses` as a paginated PDF statement.
pub(super) fn render(expenses: &[Expense], filter: &StatementFilter) -> Result<Vec<u8>, Error> {
    let (document, first_page, first_layer) = PdfDocument::new(
        "Expense Statement",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "statement",
    );

    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;

    let mut layer = document.get_page(first_page).get_layer(first_layer);

    let mut cursor = PAGE_HEIGHT - MARGIN - ROW_STEP;
    layer.use_text(
        "Expense Statement",
        TITLE_SIZE,
        Mm(centered_x("Expense Statement", TITLE_SIZE)),
        Mm(cursor),
        &bold,
    );

    if let Some(subtitle) = range_subtitle(filter) {
        cursor -= 7.0;
        layer.use_text(
            subtitle.clone(),
            BODY_SIZE,
            Mm(centered_x(&subtitle, BODY_SIZE)),
            Mm(cursor),
            &regular,
        );
    }

    cursor -= 10.0;
    write_header_row(&layer, cursor, &bold);
    cursor -= ROW_STEP + 1.0;

    for expense in expenses {
        if cursor < MARGIN {
            let (page, layer_index) =
                document.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "statement");
            layer = document.get_page(page).get_layer(layer_index);
            cursor = PAGE_HEIGHT - MARGIN;
        }

        write_expense_row(&layer, cursor, expense, &regular);
        cursor -= ROW_STEP;
    }

    document.save_to_bytes().map_err(render_error)
}

fn render_error(error: printpdf::Error) -> Error {
    Error::ExportRenderError(error.to_string())
}

/// The "From … To …" subtitle, or `None` when no bound was applied.
fn range_subtitle(filter: &StatementFilter) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(from) = filter.from {
        parts.push(format!("From {from}"));
    }

    if let Some(to) = filter.to {
        parts.push(format!("To {to}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("  "))
    }
}

fn write_header_row(layer: &PdfLayerReference, y: f32, font: &IndirectFontRef) {
    layer.use_text("Date", BODY_SIZE, Mm(COL_DATE), Mm(y), font);
    layer.use_text("Description", BODY_SIZE, Mm(COL_DESCRIPTION), Mm(y), font);
    layer.use_text("Category", BODY_SIZE, Mm(COL_CATEGORY), Mm(y), font);
    layer.use_text(
        "Amount",
        BODY_SIZE,
        Mm(right_aligned_x("Amount", BODY_SIZE)),
        Mm(y),
        font,
    );

    let rule_y = y - 1.5;
    let underline = Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(rule_y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(rule_y)), false),
        ],
        is_closed: false,
    };
    layer.add_line(underline);
}

fn write_expense_row(
    layer: &PdfLayerReference,
    y: f32,
    expense: &Expense,
    font: &IndirectFontRef,
) {
    let amount = format_currency(expense.amount);

    layer.use_text(expense.date.to_string(), BODY_SIZE, Mm(COL_DATE), Mm(y), font);
    layer.use_text(
        clip(&expense.description, DESCRIPTION_MAX_CHARS),
        BODY_SIZE,
        Mm(COL_DESCRIPTION),
        Mm(y),
        font,
    );
    layer.use_text(
        clip(&expense.category, CATEGORY_MAX_CHARS),
        BODY_SIZE,
        Mm(COL_CATEGORY),
        Mm(y),
        font,
    );
    layer.use_text(
        amount.clone(),
        BODY_SIZE,
        Mm(right_aligned_x(&amount, BODY_SIZE)),
        Mm(y),
        font,
    );
}

fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_WIDTH_EM * MM_PER_PT
}

fn centered_x(text: &str, font_size: f32) -> f32 {
    (PAGE_WIDTH - text_width_mm(text, font_size)) / 2.0
}

fn right_aligned_x(text: &str, font_size: f32) -> f32 {
    COL_AMOUNT_RIGHT - text_width_mm(text, font_size)
}

/// Truncate `text` to `max_chars`, marking the cut with an ellipsis.
fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let mut clipped: String = text.chars().take(max_chars - 1).collect();
    clipped.push('…');
    clipped
}
