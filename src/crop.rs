//! Crop the root canvas to the measured artwork.

use tracing::debug;

use crate::ast::Document;
use crate::bbox::{BoundingBox, bounding_box};

/// Rewrite the root `viewBox` (and a numeric `width`/`height`) to the
/// bounding box of the document's geometry.
///
/// Returns the box that was applied. The document is left alone when the root
/// is not `<svg>`, nothing measurable was found, or the box has no area.
pub fn crop_to_content(doc: &mut Document) -> Option<BoundingBox> {
    let root = &mut doc.root;
    if !root.is("svg") {
        return None;
    }

    let Some(bbox) = bounding_box(root) else {
        debug!("no measurable geometry, canvas unchanged");
        return None;
    };
    let (width, height) = (bbox.width(), bbox.height());
    if width <= 0.0 || height <= 0.0 {
        debug!(?bbox, "degenerate bounding box, canvas unchanged");
        return None;
    }

    root.set_attr(
        "viewBox",
        format!(
            "{} {} {} {}",
            format_number(bbox.min_x),
            format_number(bbox.min_y),
            format_number(width),
            format_number(height)
        ),
    );
    if root.get_attr("width").is_some_and(is_numeric_length) {
        root.set_attr("width", format_number(width));
    }
    if root.get_attr("height").is_some_and(is_numeric_length) {
        root.set_attr("height", format_number(height));
    }

    debug!(?bbox, "cropped canvas");
    Some(bbox)
}

/// A plain number or a `px` length. Percentages and other units are kept.
fn is_numeric_length(value: &str) -> bool {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Shortest representation that reads back to the same value, with
/// integers written without a fraction.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".into();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let mut buf = ryu::Buffer::new();
    buf.format(n).to_string()
}
