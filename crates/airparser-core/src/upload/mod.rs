//! Document upload preparation.
//!
//! Each import operation is an explicit transform from resolved parameters
//! to an [`UploadRequest`]: the filename and content type are decided by the
//! rules in [`rules`], metadata becomes form fields, and the result is
//! encoded with [`crate::multipart::encode`].

mod metadata;
mod request;

pub mod rules;

pub use metadata::{Metadata, PAYLOAD_FIELD_NAME};
pub use request::{BinaryFile, DocumentOperation, ImportFile, ImportTextHtml, UploadRequest};
pub use rules::UploadPath;
