//! `data:image/svg+xml;base64,...` envelopes.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::error::TintError;

/// A base64 data URL wrapping SVG markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<'a> {
    /// Everything up to and including the comma, as written
    header: &'a str,
    /// The encoded payload
    payload: &'a str,
}

impl<'a> Envelope<'a> {
    /// Recognize an SVG data URL. Returns `None` for anything else, which is
    /// then treated as plain markup.
    pub fn detect(input: &'a str) -> Option<Self> {
        let input = input.trim();
        let comma = input.find(',')?;
        let header = &input[..=comma];

        let mut params = header[..comma].split(';');
        let media_type = params.next()?;
        let is_svg = media_type
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
            && media_type[5..].trim().eq_ignore_ascii_case("image/svg+xml");
        if !is_svg {
            return None;
        }

        // base64 must be the last parameter
        let mut params: Vec<&str> = params.collect();
        let last = params.pop()?;
        if !last.trim().eq_ignore_ascii_case("base64") || params.iter().any(|p| !p.contains('=')) {
            return None;
        }

        Some(Self {
            header,
            payload: &input[comma + 1..],
        })
    }

    pub fn header(&self) -> &'a str {
        self.header
    }

    /// Decode the payload into markup text.
    pub fn decode(&self) -> Result<String, TintError> {
        let compact: String = self
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = BASE64_STANDARD.decode(compact)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Encode `markup` behind this envelope's original header.
    pub fn wrap(&self, markup: &str) -> String {
        let mut out = String::from(self.header);
        BASE64_STANDARD.encode_string(markup.as_bytes(), &mut out);
        out
    }
}
