use thiserror::Error;

#[derive(Debug, Error)]
pub enum TintError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidEnvelope(#[from] base64::DecodeError),

    #[error("Base64 payload is not UTF-8: {0}")]
    EnvelopeUtf8(#[from] std::string::FromUtf8Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] std::fmt::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TintError {
    /// The input could not be turned into a document tree.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            TintError::XmlParse(_)
                | TintError::InvalidSvg(_)
                | TintError::InvalidEnvelope(_)
                | TintError::EnvelopeUtf8(_)
        )
    }

    /// The tree could not be rendered back to text.
    pub fn is_serialize(&self) -> bool {
        matches!(self, TintError::Serialize(_))
    }
}
