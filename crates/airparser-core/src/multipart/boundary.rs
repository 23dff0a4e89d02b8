//! Boundary token generation and validation.

use jiff::Timestamp;
use rand::Rng;
use rand::distr::Alphanumeric;

use super::encoder::{escape_quoted, header_value};
use super::{FieldSet, Payload};
use crate::{Error, Result};

/// Fixed prefix of generated boundaries.
pub const BOUNDARY_PREFIX: &str = "----airparser-";

/// Number of random alphanumeric characters in a generated boundary.
pub const BOUNDARY_RANDOM_LEN: usize = 24;

/// Maximum boundary length allowed by RFC 2046.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Generates a boundary that does not occur anywhere in the given content.
///
/// The token is `----airparser-<unix millis>-<random>`. Candidates that
/// collide with the content are discarded.
pub(crate) fn generate(payload: &Payload, fields: &FieldSet) -> String {
    loop {
        let candidate = candidate();
        if !collides(&candidate, payload, fields) {
            return candidate;
        }

        tracing::trace!(
            target: super::TRACING_TARGET,
            "Discarding colliding multipart boundary"
        );
    }
}

/// Checks a caller-supplied boundary.
pub(crate) fn validate(boundary: &str, payload: &Payload, fields: &FieldSet) -> Result<()> {
    if boundary.is_empty() {
        return Err(Error::invalid_input().with_message("multipart boundary is empty"));
    }

    if boundary.len() > MAX_BOUNDARY_LEN {
        return Err(Error::invalid_input()
            .with_message(format!(
                "multipart boundary exceeds {MAX_BOUNDARY_LEN} characters"
            ))
            .with_context(boundary.to_owned()));
    }

    if let Some(c) = boundary.chars().find(|c| !is_boundary_char(*c)) {
        return Err(Error::invalid_input()
            .with_message(format!("multipart boundary contains {c:?}"))
            .with_context(boundary.to_owned()));
    }

    if collides(boundary, payload, fields) {
        return Err(Error::invalid_input()
            .with_message("multipart boundary occurs inside the encoded content")
            .with_context(boundary.to_owned()));
    }

    Ok(())
}

/// RFC 2046 boundary characters that also need no quoting in `Content-Type`.
fn is_boundary_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '\'' | '+' | '_' | '-' | '.')
}

fn candidate() -> String {
    let millis = Timestamp::now().as_millisecond();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_RANDOM_LEN)
        .map(char::from)
        .collect();

    format!("{BOUNDARY_PREFIX}{millis}-{suffix}")
}

/// Returns `true` if `boundary` appears in any byte sequence written into the body.
fn collides(boundary: &str, payload: &Payload, fields: &FieldSet) -> bool {
    let needle = boundary.as_bytes();
    let found = |haystack: &[u8]| contains(haystack, needle);

    found(payload.bytes.as_ref())
        || found(escape_quoted(&payload.filename).as_bytes())
        || payload
            .content_type
            .as_deref()
            .is_some_and(|content_type| found(header_value(content_type).as_bytes()))
        || fields
            .iter()
            .any(|(name, value)| found(escape_quoted(name).as_bytes()) || found(value.as_bytes()))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_boundary_shape() {
        let payload = Payload::new(&b"data"[..], "a.bin");
        let boundary = generate(&payload, &FieldSet::new());

        assert!(boundary.starts_with(BOUNDARY_PREFIX));
        assert!(boundary.len() <= MAX_BOUNDARY_LEN);

        let suffix = boundary.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), BOUNDARY_RANDOM_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_boundaries_differ() {
        let payload = Payload::new(&b"data"[..], "a.bin");
        let first = generate(&payload, &FieldSet::new());
        let second = generate(&payload, &FieldSet::new());
        assert_ne!(first, second);
    }

    #[test]
    fn validate_rejects_collisions() {
        let payload = Payload::new(&b"xx--sep--xx"[..], "a.bin");
        let error = validate("--sep--", &payload, &FieldSet::new()).unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::InvalidInput);

        let fields = FieldSet::new().with_field("note", "contains sep here");
        assert!(validate("sep", &Payload::new(&b""[..], "a"), &fields).is_err());
    }

    #[test]
    fn validate_rejects_bad_tokens() {
        let payload = Payload::new(&b"data"[..], "a.bin");
        assert!(validate("", &payload, &FieldSet::new()).is_err());
        assert!(validate(&"x".repeat(71), &payload, &FieldSet::new()).is_err());
        assert!(validate("a\r\nb", &payload, &FieldSet::new()).is_err());
        assert!(validate("clean-boundary", &payload, &FieldSet::new()).is_ok());
        assert!(validate("a'b+c_d.e", &payload, &FieldSet::new()).is_ok());
    }

    #[test]
    fn collision_sees_content_type_as_written() {
        let payload = Payload::new(&b"data"[..], "a.bin").with_content_type("text/pl\r\nain");
        assert!(validate("plain", &payload, &FieldSet::new()).is_err());
    }

    #[test]
    fn validate_rejects_characters_needing_quotes() {
        let payload = Payload::new(&b"data"[..], "a.bin");
        for boundary in ["a b;c", "a\"b", "trailing ", "a=b", "a/b", "caf\u{e9}"] {
            let error = validate(boundary, &payload, &FieldSet::new()).unwrap_err();
            assert_eq!(error.kind, crate::ErrorKind::InvalidInput, "{boundary:?}");
        }
    }

    #[test]
    fn accepted_boundary_parses_back_from_content_type() {
        let payload = Payload::new(&b"data"[..], "a.bin");
        let boundary = "a'b+c_d.e-1";
        validate(boundary, &payload, &FieldSet::new()).unwrap();

        let header = format!("multipart/form-data; boundary={boundary}");
        assert_eq!(multer::parse_boundary(&header).unwrap(), boundary);
    }

    #[test]
    fn contains_edge_cases() {
        assert!(!contains(b"", b"abc"));
        assert!(!contains(b"ab", b"abc"));
        assert!(contains(b"abc", b"abc"));
        assert!(contains(b"zzabczz", b"abc"));
    }
}
