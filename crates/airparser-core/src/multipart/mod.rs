//! `multipart/form-data` encoding for document uploads.
//!
//! The encoder is a pure function from a [`Payload`] and an optional
//! [`FieldSet`] to an [`EncodedBody`]. It does not depend on any HTTP client:
//! the caller sends [`EncodedBody::body`] with the header value returned by
//! [`EncodedBody::content_type`].
//!
//! # Example
//!
//! ```rust
//! use airparser_core::multipart::{FieldSet, Payload, encode};
//!
//! let payload = Payload::new(&b"%PDF-1.7"[..], "invoice.pdf").with_content_type("application/pdf");
//! let fields = FieldSet::new().with_field("orderId", "12345");
//!
//! let encoded = encode(&payload, Some(&fields));
//! assert!(encoded.content_type().ends_with(encoded.boundary()));
//! ```

mod boundary;
mod encoder;
mod payload;

pub use boundary::{BOUNDARY_PREFIX, BOUNDARY_RANDOM_LEN, MAX_BOUNDARY_LEN};
pub use encoder::{EncodedBody, FILE_FIELD_NAME, encode, encode_with_boundary};
pub use payload::{FieldSet, Payload};

/// Tracing target for multipart encoding.
pub const TRACING_TARGET: &str = "airparser_core::multipart";
