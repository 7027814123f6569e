//! S3 XML deserialization: parsing S3-compatible XML into Rust types.
//!
//! This module provides the [`S3Deserialize`] trait and implementations for the
//! access control policy types. Element names are compared by local name, so
//! both namespaced (`xmlns="http://s3.amazonaws.com/doc/2006-03-01/"`) and bare
//! documents are accepted.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use cephmeta_model::types::{
    AccessControlPolicy, Grant, Grantee, GranteeType, Owner, Permission,
};

use crate::error::XmlError;

/// Trait for deserializing S3 types from XML.
///
/// Implementors parse XML elements from the reader and populate the struct fields.
/// The root element has already been consumed by the caller; the implementation
/// reads child elements until the matching end tag.
pub trait S3Deserialize: Sized {
    /// Element name this type is read from when it is a document root.
    const ELEMENT: &'static str;

    /// Deserialize an instance from the given XML reader.
    ///
    /// The reader is positioned just after the opening tag of this element.
    /// The implementation should read all child content and return when
    /// the matching end tag is consumed.
    ///
    /// # Errors
    ///
    /// Returns `XmlError` if the XML is malformed or required fields are missing.
    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError>;
}

/// Deserialize S3-compatible XML into a typed value.
///
/// Finds the root element, checks it is `T::ELEMENT` and delegates to the type's
/// `S3Deserialize` implementation.
///
/// # Errors
///
/// Returns `XmlError` if the XML is malformed, the root element is not the
/// expected one, or deserialization fails.
pub fn from_xml<T: S3Deserialize>(xml: &[u8]) -> Result<T, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    // Skip the XML declaration and find the root element.
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let root = local_name(&e)?;
                if root != T::ELEMENT {
                    return Err(XmlError::WrongRoot {
                        expected: T::ELEMENT,
                        found: root,
                    });
                }
                return T::deserialize_xml(&mut reader);
            }
            Event::Eof => {
                return Err(XmlError::MissingRoot(T::ELEMENT));
            }
            // Skip declaration, comments, processing instructions, whitespace.
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions for reading common XML patterns
// ---------------------------------------------------------------------------

/// Local (prefix-free) name of an element as a string.
fn local_name(e: &BytesStart<'_>) -> Result<String, XmlError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(ToOwned::to_owned)
        .map_err(|e| XmlError::Text(e.to_string()))
}

/// Read the text content of the current element and consume its end tag.
///
/// Expects the reader to be positioned right after a `Start` event. Reads
/// the text content and consumes through the matching `End` event.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::GeneralRef(r) => {
                let resolved = r
                    .resolve_char_ref()
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                if let Some(ch) = resolved {
                    text.push(ch);
                } else {
                    let name = r
                        .decode()
                        .map_err(|err| XmlError::Text(err.to_string()))?;
                    let entity = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| XmlError::Text(format!("unknown entity &{name};")))?;
                    text.push_str(entity);
                }
            }
            Event::End(_) => {
                return Ok(text);
            }
            Event::Eof => {
                return Err(XmlError::Truncated("text"));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::Truncated("element"));
            }
            _ => {}
        }
    }
}

/// Read the `xsi:type` attribute of a `<Grantee>` start tag, if any.
fn grantee_type_attr(e: &BytesStart<'_>) -> Result<Option<GranteeType>, XmlError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"type" {
            let value = std::str::from_utf8(&attr.value)
                .map_err(|e| XmlError::Text(e.to_string()))?;
            return Ok(Some(GranteeType::from(value)));
        }
    }
    Ok(None)
}

/// Deserialize a list of items where each item is wrapped in the given element name.
fn deserialize_list<T: S3Deserialize>(
    reader: &mut Reader<&[u8]>,
    item_tag: &str,
) -> Result<Vec<T>, XmlError> {
    let mut items = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if local_name(&e)? == item_tag {
                    items.push(T::deserialize_xml(reader)?);
                } else {
                    skip_element(reader)?;
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::Truncated("list"));
            }
            _ => {}
        }
    }

    Ok(items)
}

// ---------------------------------------------------------------------------
// S3Deserialize implementations
// ---------------------------------------------------------------------------

impl S3Deserialize for Owner {
    const ELEMENT: &'static str = "Owner";

    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut id = None;
        let mut display_name = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match local_name(&e)?.as_str() {
                    "ID" => id = Some(read_text_content(reader)?),
                    "DisplayName" => display_name = Some(read_text_content(reader)?),
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(XmlError::Truncated(Self::ELEMENT));
                }
                _ => {}
            }
        }

        Ok(Owner { id, display_name })
    }
}

impl S3Deserialize for Grantee {
    const ELEMENT: &'static str = "Grantee";

    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut grantee = Grantee::default();

        // The xsi:type attribute lives on the already consumed start tag and is
        // filled in by the Grant parser; a <Type> child is accepted as well.
        loop {
            match reader.read_event()? {
                Event::Start(e) => match local_name(&e)?.as_str() {
                    "DisplayName" => grantee.display_name = Some(read_text_content(reader)?),
                    "EmailAddress" => grantee.email_address = Some(read_text_content(reader)?),
                    "ID" => grantee.id = Some(read_text_content(reader)?),
                    "URI" => grantee.uri = Some(read_text_content(reader)?),
                    "Type" => {
                        let text = read_text_content(reader)?;
                        grantee.grantee_type = Some(GranteeType::from(text.as_str()));
                    }
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(XmlError::Truncated(Self::ELEMENT));
                }
                _ => {}
            }
        }

        Ok(grantee)
    }
}

impl S3Deserialize for Grant {
    const ELEMENT: &'static str = "Grant";

    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut grantee = None;
        let mut permission = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match local_name(&e)?.as_str() {
                    "Grantee" => {
                        let attr_type = grantee_type_attr(&e)?;
                        let mut parsed = Grantee::deserialize_xml(reader)?;
                        if parsed.grantee_type.is_none() {
                            parsed.grantee_type = attr_type;
                        }
                        grantee = Some(parsed);
                    }
                    "Permission" => {
                        let text = read_text_content(reader)?;
                        permission = Some(Permission::from(text.as_str()));
                    }
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(XmlError::Truncated(Self::ELEMENT));
                }
                _ => {}
            }
        }

        Ok(Grant {
            grantee,
            permission,
        })
    }
}

impl S3Deserialize for AccessControlPolicy {
    const ELEMENT: &'static str = "AccessControlPolicy";

    fn deserialize_xml(reader: &mut Reader<&[u8]>) -> Result<Self, XmlError> {
        let mut owner = None;
        let mut grants = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => match local_name(&e)?.as_str() {
                    "Owner" => owner = Some(Owner::deserialize_xml(reader)?),
                    "AccessControlList" => {
                        grants = deserialize_list(reader, "Grant")?;
                    }
                    _ => skip_element(reader)?,
                },
                Event::End(_) => break,
                Event::Eof => {
                    return Err(XmlError::Truncated(Self::ELEMENT));
                }
                _ => {}
            }
        }

        tracing::trace!(grants = grants.len(), "parsed AccessControlPolicy");
        Ok(AccessControlPolicy { owner, grants })
    }
}
