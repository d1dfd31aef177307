//! Replace hard-coded paint colors with `currentColor`.

use crate::Options;
use crate::ast::*;
use crate::color::classify;
use crate::css::{Declaration, rewrite_declarations, rewrite_stylesheet};

/// The token every matched color is replaced with.
pub const CURRENT_COLOR: &str = "currentColor";

/// Paint properties that get recolored, both as attributes and declarations.
const PAINT_PROPERTIES: [&str; 2] = ["fill", "stroke"];

/// Counts of what a recolor pass rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecolorStats {
    /// `fill` / `stroke` attributes
    pub attributes: usize,
    /// Declarations inside `style` attributes
    pub style_attributes: usize,
    /// Declarations inside `<style>` elements
    pub style_blocks: usize,
}

impl RecolorStats {
    pub fn total(&self) -> usize {
        self.attributes + self.style_attributes + self.style_blocks
    }
}

/// Rewrite every color-bearing location of the document.
pub fn recolor(doc: &mut Document, options: &Options) -> RecolorStats {
    let mut stats = RecolorStats::default();
    doc.for_each_element_mut(|elem| recolor_element(elem, options, &mut stats));
    stats
}

fn recolor_element(elem: &mut Element, options: &Options, stats: &mut RecolorStats) {
    for attr in &mut elem.attributes {
        if attr.name.prefix.is_some() {
            continue;
        }
        let name = attr.name.local.as_str();

        if PAINT_PROPERTIES.contains(&name) {
            if classify(&attr.value).is_color() {
                attr.value = CURRENT_COLOR.to_string();
                stats.attributes += 1;
            }
        } else if name == "style" && options.style_attributes {
            let (style, n) = rewrite_declarations(&attr.value, replace_paint);
            if n > 0 {
                attr.value = style;
                stats.style_attributes += n;
            }
        }
    }

    if options.style_blocks && elem.is("style") {
        for child in &mut elem.children {
            if let Node::Text(css) | Node::CData(css) = child {
                let (sheet, n) = rewrite_stylesheet(css, replace_paint);
                if n > 0 {
                    *css = sheet;
                    stats.style_blocks += n;
                }
            }
        }
    }
}

fn replace_paint(decl: &Declaration<'_>) -> Option<String> {
    let paint = PAINT_PROPERTIES.iter().any(|p| decl.is(p));
    (paint && classify(decl.value).is_color()).then(|| CURRENT_COLOR.to_string())
}
