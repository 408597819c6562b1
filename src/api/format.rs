use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::str::FromStr;
use thiserror::Error;

use crate::error::ApiError;

const XML_SINGLE_ROOT: &str = "student";
const XML_SEQUENCE_ROOT: &str = "students";
const XML_SEQUENCE_ITEM: &str = "item";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Body encoding chosen by the `format` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Xml,
}

/// What to do with a `format` value that is neither `json` nor `xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatPolicy {
    /// Answer 406 Not Acceptable.
    Strict,
    /// Fall back to JSON.
    Lenient,
}

impl FromStr for FormatPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(FormatPolicy::Strict),
            "lenient" => Ok(FormatPolicy::Lenient),
            other => Err(format!("unknown format policy '{}'", other)),
        }
    }
}

impl ResponseFormat {
    /// Resolve the requested format token. Absent or blank means JSON.
    pub fn negotiate(requested: Option<&str>, policy: FormatPolicy) -> Result<Self, ApiError> {
        let token = match requested.map(str::trim) {
            None | Some("") => return Ok(ResponseFormat::Json),
            Some(token) => token.to_ascii_lowercase(),
        };

        match token.as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            _ => match policy {
                FormatPolicy::Lenient => Ok(ResponseFormat::Json),
                FormatPolicy::Strict => Err(ApiError::not_acceptable("Unsupported format")),
            },
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/json",
            ResponseFormat::Xml => "application/xml",
        }
    }
}

/// Render `data` in the requested format with the given status.
pub fn format_response<T: Serialize>(
    status: StatusCode,
    data: &T,
    format: ResponseFormat,
) -> Result<Response, ApiError> {
    let value = serde_json::to_value(data).map_err(FormatError::from)?;

    match format {
        ResponseFormat::Json => Ok((status, Json(value)).into_response()),
        ResponseFormat::Xml => {
            let body = to_xml(&value)?;
            Ok((status, [(header::CONTENT_TYPE, format.content_type())], body).into_response())
        }
    }
}

/// Encode a record (object) or a sequence of records (array) as XML.
///
/// Objects become `<student>` with one child element per key; arrays become
/// `<students>` holding one `<item>` per entry. No type attributes are emitted.
pub fn to_xml(value: &Value) -> Result<String, FormatError> {
    let root = match value {
        Value::Array(_) => XML_SEQUENCE_ROOT,
        _ => XML_SINGLE_ROOT,
    };

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root, value)?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), FormatError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                write_element(writer, XML_SEQUENCE_ITEM, item)?;
            }
        }
        Value::Null => {}
        Value::String(s) => {
            let text = xml_safe_text(s);
            writer.write_event(Event::Text(BytesText::new(&text)))?;
        }
        other => {
            let text = other.to_string();
            writer.write_event(Event::Text(BytesText::new(&text)))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Drops characters XML 1.0 cannot carry, even as references: C0 controls
/// other than tab, LF and CR, and the U+FFFE/U+FFFF noncharacters.
fn xml_safe_text(s: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    }

    if s.chars().all(allowed) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.chars().filter(|&c| allowed(c)).collect())
    }
}
