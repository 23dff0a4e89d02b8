//! Byte-exact `multipart/form-data` body construction.

use std::borrow::Cow;

use bytes::{Bytes, BytesMut};

use super::{FieldSet, Payload, TRACING_TARGET, boundary};
use crate::Result;

/// Form field name of the file part.
pub const FILE_FIELD_NAME: &str = "file";

const CRLF: &[u8] = b"\r\n";

/// An encoded `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    body: Bytes,
    boundary: String,
}

impl EncodedBody {
    /// Returns the encoded body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the boundary token that delimits the parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Returns the `Content-Type` header value matching this body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Returns the body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns `true` if the body is empty; an encoded body never is.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Consumes the body and returns its bytes.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }
}

/// Encodes a file payload and optional fields as `multipart/form-data`.
///
/// The file part always comes first, followed by `fields` in iteration
/// order. The boundary is freshly generated for each call and is guaranteed
/// not to occur in any of the encoded content.
pub fn encode(payload: &Payload, fields: Option<&FieldSet>) -> EncodedBody {
    let empty = FieldSet::new();
    let fields = fields.unwrap_or(&empty);
    let boundary = boundary::generate(payload, fields);
    assemble(payload, fields, boundary)
}

/// Encodes with a caller-chosen boundary.
///
/// # Errors
///
/// Returns an `InvalidInput` error if the boundary is empty, longer than 70
/// characters, uses a character outside `A-Za-z0-9'+_-.`, or occurs inside
/// the content.
pub fn encode_with_boundary(
    payload: &Payload,
    fields: Option<&FieldSet>,
    boundary: impl Into<String>,
) -> Result<EncodedBody> {
    let empty = FieldSet::new();
    let fields = fields.unwrap_or(&empty);
    let boundary = boundary.into();
    boundary::validate(&boundary, payload, fields)?;
    Ok(assemble(payload, fields, boundary))
}

fn assemble(payload: &Payload, fields: &FieldSet, boundary: String) -> EncodedBody {
    let delimiter = format!("--{boundary}\r\n");
    let mut buf = BytesMut::with_capacity(estimate_len(payload, fields, delimiter.len()));

    buf.extend_from_slice(delimiter.as_bytes());
    buf.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{FILE_FIELD_NAME}\"; filename=\"{}\"\r\n",
            escape_quoted(&payload.filename)
        )
        .as_bytes(),
    );
    if let Some(content_type) = &payload.content_type {
        buf.extend_from_slice(
            format!("Content-Type: {}\r\n", header_value(content_type)).as_bytes(),
        );
    }
    buf.extend_from_slice(CRLF);
    buf.extend_from_slice(&payload.bytes);
    buf.extend_from_slice(CRLF);

    for (name, value) in fields.iter() {
        buf.extend_from_slice(delimiter.as_bytes());
        buf.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape_quoted(name)
            )
            .as_bytes(),
        );
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(CRLF);
    }

    buf.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    tracing::trace!(
        target: TRACING_TARGET,
        filename = %payload.filename,
        fields = fields.len(),
        body_len = buf.len(),
        "Encoded multipart body"
    );

    EncodedBody {
        body: buf.freeze(),
        boundary,
    }
}

fn estimate_len(payload: &Payload, fields: &FieldSet, delimiter_len: usize) -> usize {
    let headers = 128 + payload.filename.len();
    let fields_len: usize = fields
        .iter()
        .map(|(name, value)| delimiter_len + 48 + name.len() + value.len())
        .sum();

    delimiter_len * 2 + headers + payload.bytes.len() + fields_len
}

/// Drops line breaks so a header value stays on its own line.
pub(super) fn header_value(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
    } else {
        Cow::Borrowed(value)
    }
}

/// Escapes a quoted header parameter the way browsers encode form data.
pub(super) fn escape_quoted(value: &str) -> Cow<'_, str> {
    if !value.contains(['"', '\r', '\n']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
