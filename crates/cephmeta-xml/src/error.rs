//! Decoding errors for ACL documents.

use quick_xml::events::attributes::AttrError;

/// Why an ACL document could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The body is not well-formed XML.
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// A start tag carries a malformed attribute.
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    /// The body holds no root element at all.
    #[error("empty document, expected <{0}>")]
    MissingRoot(&'static str),

    /// The root element is not the expected one (an `<Error>` body, say).
    #[error("expected root <{expected}>, found <{found}>")]
    WrongRoot {
        /// Element name the caller asked for.
        expected: &'static str,
        /// Element name the body starts with.
        found: String,
    },

    /// The body ended inside an open element.
    #[error("document truncated inside <{0}>")]
    Truncated(&'static str),

    /// Element text or a name could not be decoded.
    #[error("undecodable text: {0}")]
    Text(String),
}
