//! Filename and content-type resolution for uploads.

/// Filename used by the text/HTML path when the caller supplies none.
pub const DEFAULT_HTML_FILENAME: &str = "document.html";

/// Filename used by the binary path when neither the caller nor the binary has one.
pub const DEFAULT_FILENAME: &str = "document";

/// Content type assigned to text/HTML uploads that are not plain text.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Extensions left for the service to detect on the text/HTML path.
pub const KNOWN_TEXT_EXTENSIONS: &[&str] = &["txt", "eml"];

/// Which upload operation a file part belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPath<'a> {
    /// Inline HTML or text content.
    TextHtml,
    /// A binary file carrying its own declared MIME type.
    Binary {
        /// MIME type declared by the binary's metadata.
        mime_type: Option<&'a str>,
    },
}

/// Resolves the filename for the text/HTML path.
pub fn resolve_html_filename(custom: Option<&str>) -> String {
    non_empty(custom).unwrap_or(DEFAULT_HTML_FILENAME).to_owned()
}

/// Resolves the filename for the binary path.
///
/// Precedence: caller filename, then the binary's own filename, then
/// [`DEFAULT_FILENAME`]. Empty strings count as absent.
pub fn resolve_binary_filename(custom: Option<&str>, binary_name: Option<&str>) -> String {
    non_empty(custom)
        .or_else(|| non_empty(binary_name))
        .unwrap_or(DEFAULT_FILENAME)
        .to_owned()
}

/// Resolves the file part's content type; `None` means the header is omitted.
pub fn resolve_content_type(filename: &str, path: UploadPath<'_>) -> Option<String> {
    match path {
        UploadPath::TextHtml => {
            let known = file_extension(filename).is_some_and(|extension| {
                KNOWN_TEXT_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(extension))
            });

            (!known).then(|| HTML_CONTENT_TYPE.to_owned())
        }
        UploadPath::Binary { mime_type } => mime_type.map(str::to_owned),
    }
}

/// Returns the text after the last `.` when it is a non-empty run of word characters.
pub fn file_extension(filename: &str) -> Option<&str> {
    let (_, extension) = filename.rsplit_once('.')?;
    let is_word = !extension.is_empty()
        && extension
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');

    is_word.then_some(extension)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_path_filename_defaults() {
        assert_eq!(resolve_html_filename(None), "document.html");
        assert_eq!(resolve_html_filename(Some("")), "document.html");
        assert_eq!(resolve_html_filename(Some("mail.eml")), "mail.eml");
    }

    #[test]
    fn binary_path_filename_precedence() {
        assert_eq!(resolve_binary_filename(Some("custom.pdf"), Some("orig.pdf")), "custom.pdf");
        assert_eq!(resolve_binary_filename(None, Some("orig.pdf")), "orig.pdf");
        assert_eq!(resolve_binary_filename(Some(""), Some("")), "document");
        assert_eq!(resolve_binary_filename(None, None), "document");
    }

    #[test]
    fn html_path_content_type() {
        assert_eq!(resolve_content_type("report.txt", UploadPath::TextHtml), None);
        assert_eq!(resolve_content_type("REPORT.EML", UploadPath::TextHtml), None);
        assert_eq!(
            resolve_content_type("report.pdf", UploadPath::TextHtml).as_deref(),
            Some("text/html")
        );
        assert_eq!(
            resolve_content_type("README", UploadPath::TextHtml).as_deref(),
            Some("text/html")
        );

        let filename = resolve_html_filename(None);
        assert_eq!(filename, "document.html");
        assert_eq!(
            resolve_content_type(&filename, UploadPath::TextHtml).as_deref(),
            Some("text/html")
        );
    }

    #[test]
    fn binary_path_uses_declared_mime_type() {
        let path = UploadPath::Binary {
            mime_type: Some("application/pdf"),
        };
        assert_eq!(resolve_content_type("notes.txt", path).as_deref(), Some("application/pdf"));
        assert_eq!(
            resolve_content_type("notes.txt", UploadPath::Binary { mime_type: None }),
            None
        );
    }

    #[test]
    fn extension_parsing() {
        assert_eq!(file_extension("a.tar.gz"), Some("gz"));
        assert_eq!(file_extension(".txt"), Some("txt"));
        assert_eq!(file_extension("trailing."), None);
        assert_eq!(file_extension("odd.t-xt"), None);
        assert_eq!(file_extension("none"), None);
    }
}
