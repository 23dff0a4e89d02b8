//! Request transforms for the two document import operations.

use bytes::Bytes;
use strum::{AsRefStr, Display, EnumString};

use super::metadata::Metadata;
use super::rules::{self, UploadPath};
use crate::inbox::InboxLocator;
use crate::multipart::{EncodedBody, Payload, encode};
use crate::{Result, TRACING_TARGET_UPLOAD};

/// Document operations offered by the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum DocumentOperation {
    /// Import a binary file into an inbox.
    ImportFile,
    /// Import inline text or HTML into an inbox.
    ImportTextHtml,
}

/// Binary data handed over by a previous workflow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFile {
    /// File contents.
    pub data: Bytes,
    /// File name recorded with the binary, if any.
    pub file_name: Option<String>,
    /// MIME type recorded with the binary, if any.
    pub mime_type: Option<String>,
}

impl BinaryFile {
    /// Creates a binary without a name or MIME type.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
            mime_type: None,
        }
    }

    /// Sets the recorded file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the recorded MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Parameters of the `importFile` operation.
#[derive(Debug, Clone)]
pub struct ImportFile {
    /// Target inbox.
    pub inbox: InboxLocator,
    /// The document to upload.
    pub file: BinaryFile,
    /// Overrides the binary's own file name.
    pub filename: Option<String>,
    /// Metadata echoed back in the parsed result.
    pub metadata: Metadata,
}

impl ImportFile {
    /// Creates the operation with no filename override and no metadata.
    pub fn new(inbox: impl Into<InboxLocator>, file: BinaryFile) -> Self {
        Self {
            inbox: inbox.into(),
            file,
            filename: None,
            metadata: Metadata::default(),
        }
    }

    /// Overrides the uploaded filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attaches metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds the upload request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no inbox is selected.
    pub fn into_request(self) -> Result<UploadRequest> {
        let inbox_id = self.inbox.require_id()?.to_owned();
        let filename =
            rules::resolve_binary_filename(self.filename.as_deref(), self.file.file_name.as_deref());
        let content_type = rules::resolve_content_type(
            &filename,
            UploadPath::Binary {
                mime_type: self.file.mime_type.as_deref(),
            },
        );

        let payload = Payload::new(self.file.data, filename).with_optional_content_type(content_type);
        let fields = self.metadata.to_payload_field();
        let body = encode(&payload, fields.as_ref());

        tracing::debug!(
            target: TRACING_TARGET_UPLOAD,
            operation = %DocumentOperation::ImportFile,
            inbox_id = %inbox_id,
            filename = %payload.filename,
            content_type = ?payload.content_type,
            body_len = body.len(),
            "Prepared upload request"
        );

        Ok(UploadRequest { inbox_id, body })
    }
}

/// Parameters of the `importTextHtml` operation.
#[derive(Debug, Clone)]
pub struct ImportTextHtml {
    /// Target inbox.
    pub inbox: InboxLocator,
    /// HTML or plain text to parse.
    pub content: String,
    /// Uploaded filename; defaults to `document.html`.
    pub filename: Option<String>,
    /// Metadata echoed back in the parsed result.
    pub metadata: Metadata,
}

impl ImportTextHtml {
    /// Creates the operation with no filename and no metadata.
    pub fn new(inbox: impl Into<InboxLocator>, content: impl Into<String>) -> Self {
        Self {
            inbox: inbox.into(),
            content: content.into(),
            filename: None,
            metadata: Metadata::default(),
        }
    }

    /// Sets the uploaded filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attaches metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds the upload request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no inbox is selected.
    pub fn into_request(self) -> Result<UploadRequest> {
        let inbox_id = self.inbox.require_id()?.to_owned();
        let filename = rules::resolve_html_filename(self.filename.as_deref());
        let content_type = rules::resolve_content_type(&filename, UploadPath::TextHtml);

        let payload = Payload::new(self.content.into_bytes(), filename)
            .with_optional_content_type(content_type);
        let fields = self.metadata.to_flat_fields();
        let body = encode(&payload, fields.as_ref());

        tracing::debug!(
            target: TRACING_TARGET_UPLOAD,
            operation = %DocumentOperation::ImportTextHtml,
            inbox_id = %inbox_id,
            filename = %payload.filename,
            content_type = ?payload.content_type,
            body_len = body.len(),
            "Prepared upload request"
        );

        Ok(UploadRequest { inbox_id, body })
    }
}

/// A fully prepared upload, ready for any HTTP transport.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Target inbox id (never empty).
    pub inbox_id: String,
    /// The encoded multipart body.
    pub body: EncodedBody,
}

impl UploadRequest {
    /// Path segments of the upload endpoint below the API base URL.
    pub fn path_segments(&self) -> [&str; 4] {
        ["inboxes", &self.inbox_id, "upload", "n8n"]
    }

    /// Returns the `Content-Type` header value for the body.
    pub fn content_type(&self) -> String {
        self.body.content_type()
    }
}
