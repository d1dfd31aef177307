//! Bounding box of the measurable geometry in a document.

use tracing::trace;

use crate::ast::Element;
use crate::path::{measure_path, parse_leading_number};

/// An axis-aligned box in user units. `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A box that only ever grows. Starts absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bounds(Option<BoundingBox>);

impl Bounds {
    pub fn include_point(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.0 = Some(match self.0 {
            Some(b) => BoundingBox {
                min_x: b.min_x.min(x),
                min_y: b.min_y.min(y),
                max_x: b.max_x.max(x),
                max_y: b.max_y.max(y),
            },
            None => BoundingBox {
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
            },
        });
    }

    pub fn include_rect(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        if [x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            self.include_point(x1, y1);
            self.include_point(x2, y2);
        }
    }

    pub fn get(&self) -> Option<BoundingBox> {
        self.0
    }
}

/// Compute the bounding box of every measurable element under `root`,
/// `root` included. `None` if nothing measurable was found.
pub fn bounding_box(root: &Element) -> Option<BoundingBox> {
    fn visit(elem: &Element, bounds: &mut Bounds) {
        measure_element(elem, bounds);
        for child in elem.child_elements() {
            visit(child, bounds);
        }
    }

    let mut bounds = Bounds::default();
    visit(root, &mut bounds);
    bounds.get()
}

/// Fold one element's own geometry into `bounds`.
pub fn measure_element(elem: &Element, bounds: &mut Bounds) {
    // Missing attributes read as 0; present but unreadable ones skip the shape.
    let num = |name: &str| -> Option<f64> {
        match elem.get_attr(name) {
            Some(v) => parse_leading_number(v),
            None => Some(0.0),
        }
    };

    match elem.name.local.as_str() {
        "rect" => {
            if let (Some(x), Some(y), Some(w), Some(h)) =
                (num("x"), num("y"), num("width"), num("height"))
                && w > 0.0
                && h > 0.0
            {
                bounds.include_rect(x, y, x + w, y + h);
            }
        }
        "circle" => {
            if let (Some(cx), Some(cy), Some(r)) = (num("cx"), num("cy"), num("r"))
                && r > 0.0
            {
                bounds.include_rect(cx - r, cy - r, cx + r, cy + r);
            }
        }
        "ellipse" => {
            if let (Some(cx), Some(cy), Some(rx), Some(ry)) =
                (num("cx"), num("cy"), num("rx"), num("ry"))
                && rx > 0.0
                && ry > 0.0
            {
                bounds.include_rect(cx - rx, cy - ry, cx + rx, cy + ry);
            }
        }
        "line" => {
            if let (Some(x1), Some(y1), Some(x2), Some(y2)) =
                (num("x1"), num("y1"), num("x2"), num("y2"))
            {
                bounds.include_rect(x1, y1, x2, y2);
            }
        }
        "polygon" | "polyline" => {
            if let Some(points) = elem.get_attr("points") {
                measure_points(points, bounds);
            }
        }
        "path" => {
            if let Some(d) = elem.get_attr("d") {
                measure_path(d, bounds);
            }
        }
        _ => return,
    }

    trace!(element = %elem.name.full_name(), bounds = ?bounds.get(), "measured");
}

/// `points` as whitespace separated `x,y` pairs. Malformed pairs are skipped.
fn measure_points(points: &str, bounds: &mut Bounds) {
    for pair in points.split_whitespace() {
        let Some((x, y)) = pair.split_once(',') else {
            continue;
        };
        if let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) {
            bounds.include_point(x, y);
        }
    }
}
