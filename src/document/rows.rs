//! Labeled field rows of the application form.

use super::canvas::{Canvas, Rgb, TextStyle};
use super::metrics::Font;

/// Height of a single-line field row.
pub const ROW_HEIGHT: f64 = 24.0;
/// Height of an address block.
pub const ADDRESS_HEIGHT: f64 = 30.0;

const LEFT: f64 = 50.0;
const FULL_WIDTH: f64 = 495.0;
const LABEL_CELL_WIDTH: f64 = 105.0;
const SECOND_COLUMN: f64 = 300.0;
const VALUE_INSET: f64 = 110.0;
const ADDRESS_VALUE_WIDTH: f64 = 380.0;

const LABEL_FILL: Rgb = Rgb(0xf2, 0xf2, 0xf2);
const BORDER: Rgb = Rgb(0xcc, 0xcc, 0xcc);
const BORDER_WIDTH: f64 = 0.4;

/// Placeholder for a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// The value as drawn: the text itself, or `N/A` when absent or blank.
#[must_use]
pub fn value_or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

fn label_style() -> TextStyle {
    TextStyle::new(Font::Bold, 8.0, Rgb::NAVY)
}

fn value_style() -> TextStyle {
    TextStyle::new(Font::Regular, 9.0, Rgb::BLACK)
}

fn cell(canvas: &mut Canvas, x: f64, y: f64, label: &str, value: Option<&str>) {
    canvas.fill_rect(x, y, LABEL_CELL_WIDTH, ROW_HEIGHT, LABEL_FILL);
    canvas.text(&label.to_uppercase(), x + 5.0, y + 8.0, &label_style());
    canvas.text(value_or_na(value), x + VALUE_INSET, y + 8.0, &value_style());
}

/// One label spanning the whole row.
pub fn field_row(canvas: &mut Canvas, y: f64, label: &str, value: Option<&str>) {
    canvas.fill_rect(LEFT, y, LABEL_CELL_WIDTH, ROW_HEIGHT, LABEL_FILL);
    canvas.stroke_rect(LEFT, y, FULL_WIDTH, ROW_HEIGHT, BORDER, BORDER_WIDTH);
    canvas.text(&label.to_uppercase(), LEFT + 5.0, y + 8.0, &label_style());
    canvas.text(value_or_na(value), LEFT + VALUE_INSET, y + 8.0, &value_style());
}

/// Two label/value pairs side by side.
pub fn split_row(
    canvas: &mut Canvas,
    y: f64,
    left: (&str, Option<&str>),
    right: (&str, Option<&str>),
) {
    canvas.stroke_rect(LEFT, y, FULL_WIDTH, ROW_HEIGHT, BORDER, BORDER_WIDTH);
    cell(canvas, LEFT, y, left.0, left.1);
    cell(canvas, SECOND_COLUMN, y, right.0, right.1);
}

/// Taller row for a wrapped multi-line address.
pub fn address_block(canvas: &mut Canvas, y: f64, label: &str, value: Option<&str>) {
    canvas.fill_rect(LEFT, y, LABEL_CELL_WIDTH, ADDRESS_HEIGHT, LABEL_FILL);
    canvas.stroke_rect(LEFT, y, FULL_WIDTH, ADDRESS_HEIGHT, BORDER, BORDER_WIDTH);
    canvas.text(label, LEFT + 5.0, y + 11.0, &TextStyle::new(Font::Bold, 6.0, Rgb::NAVY));
    canvas.text(
        value_or_na(value),
        LEFT + VALUE_INSET,
        y + 6.0,
        &value_style().width(ADDRESS_VALUE_WIDTH),
    );
}
