use crate::utils::error::{JailError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Display;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(rename = "$value", default = "Vec::new")]
    items: Vec<T>,
}

/// Root element whose children are all named `item`.
struct EnvelopeRef<'a, T> {
    item: &'static str,
    items: &'a [T],
}

impl<T: Serialize> Serialize for EnvelopeRef<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Envelope", 1)?;
        state.serialize_field(self.item, self.items)?;
        state.end()
    }
}

fn xml_error(error: impl Display) -> JailError {
    JailError::Xml {
        message: error.to_string(),
    }
}

fn root_name(text: &str) -> Result<String> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => return Err(xml_error("document has no root element")),
            Ok(_) => continue,
            Err(e) => return Err(xml_error(e)),
        }
    }
}

/// Decodes the children of `root` into records, preserving order. Each child
/// element is one record regardless of its tag name.
pub fn decode_records<T: DeserializeOwned>(text: &str, root: &str) -> Result<Vec<T>> {
    let found = root_name(text)?;
    if found != root {
        return Err(JailError::UnexpectedRoot {
            expected: root.to_string(),
            found,
        });
    }

    let envelope: Envelope<T> = quick_xml::de::from_str(text).map_err(xml_error)?;
    Ok(envelope.items)
}

/// Encodes records under `root`, one `item` element per record.
pub fn encode_records<T: Serialize>(
    records: &[T],
    root: &str,
    item: &'static str,
) -> Result<String> {
    let mut body = String::new();
    let mut serializer =
        quick_xml::se::Serializer::with_root(&mut body, Some(root)).map_err(xml_error)?;
    serializer.indent(' ', 2);
    EnvelopeRef {
        item,
        items: records,
    }
        .serialize(serializer)
        .map_err(xml_error)?;
    Ok(format!("{}\n{}", XML_DECLARATION, body))
}
