//! svgtint - make SVG icons themeable
//!
//! svgtint replaces hard-coded paint colors with `currentColor` so an icon
//! picks up the color of the surrounding text, and can crop the canvas to
//! the artwork.
//!
//! ```
//! let svg = r##"<svg><rect x="10" y="10" width="30" height="20" fill="#ff0000"/></svg>"##;
//! let out = svgtint::convert(svg, true).unwrap();
//! assert!(out.contains(r#"viewBox="10 10 30 20""#));
//! assert!(out.contains(r#"fill="currentColor""#));
//! ```

mod ast;
mod batch;
mod bbox;
mod color;
mod crop;
mod css;
mod envelope;
mod error;
mod parse;
mod path;
mod recolor;
mod serialize;

use tracing::debug;

pub use ast::*;
pub use batch::*;
pub use bbox::*;
pub use color::*;
pub use crop::*;
pub use css::*;
pub use envelope::*;
pub use error::*;
pub use parse::*;
pub use path::{PathCommand, Segment, measure_path, tokenize_path};
pub use recolor::*;
pub use serialize::*;

/// Convert an SVG string (or an SVG base64 data URL) with default settings,
/// optionally cropping the canvas to the artwork.
pub fn convert(markup: &str, crop: bool) -> Result<String, TintError> {
    convert_with_options(
        markup,
        &Options {
            crop,
            ..Options::default()
        },
    )
}

/// Convert an SVG string (or an SVG base64 data URL) with custom options.
///
/// A data URL comes back as a data URL with the same header.
pub fn convert_with_options(markup: &str, options: &Options) -> Result<String, TintError> {
    convert_with_report(markup, options).map(|conversion| conversion.output)
}

/// The result of a conversion together with what was changed.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Converted markup, re-wrapped if the input was a data URL
    pub output: String,
    pub recolored: RecolorStats,
    /// The box the canvas was cropped to, if it was
    pub cropped: Option<BoundingBox>,
}

/// Like [`convert_with_options`], also reporting what was rewritten.
pub fn convert_with_report(markup: &str, options: &Options) -> Result<Conversion, TintError> {
    match Envelope::detect(markup) {
        Some(envelope) => {
            debug!(header = envelope.header(), "decoding data URL");
            let decoded = envelope.decode()?;
            let mut conversion = convert_document(&decoded, options)?;
            conversion.output = envelope.wrap(&conversion.output);
            Ok(conversion)
        }
        None => convert_document(markup, options),
    }
}

fn convert_document(svg: &str, options: &Options) -> Result<Conversion, TintError> {
    let mut doc = parse_svg(svg)?;

    let recolored = recolor(&mut doc, options);
    let cropped = if options.crop {
        crop_to_content(&mut doc)
    } else {
        None
    };
    debug!(recolored = recolored.total(), ?cropped, "converted document");

    Ok(Conversion {
        output: serialize(&doc)?,
        recolored,
        cropped,
    })
}

/// Conversion options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Crop the root viewBox to the measured geometry
    pub crop: bool,
    /// Rewrite `fill`/`stroke` declarations in `style` attributes
    pub style_attributes: bool,
    /// Rewrite `fill`/`stroke` declarations in `<style>` elements
    pub style_blocks: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            crop: false,
            style_attributes: true,
            style_blocks: true,
        }
    }
}
