//! `import-html`: uploads inline HTML or plain text.

use std::io::Write;
use std::path::PathBuf;

use airparser_core::AirparserService;
use airparser_core::upload::{ImportTextHtml, Metadata};
use anyhow::Context;
use clap::Args;

use super::write_json_line;
use crate::TRACING_TARGET_COMMAND;

/// Arguments of `import-html`.
#[derive(Debug, Clone, Args)]
pub struct ImportHtmlArgs {
    /// Inbox id to upload to.
    #[arg(long, env = "AIRPARSER_INBOX")]
    pub inbox: String,

    /// HTML or text content to parse.
    #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
    pub content: Option<String>,

    /// Read the content from this UTF-8 file instead.
    #[arg(long)]
    pub content_file: Option<PathBuf>,

    /// Uploaded filename (default: document.html).
    #[arg(long)]
    pub filename: Option<String>,

    /// JSON object whose entries are sent as separate form fields.
    #[arg(long)]
    pub metadata: Option<String>,
}

/// Uploads the content and prints the service response.
pub async fn run(
    service: &AirparserService,
    args: ImportHtmlArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let content = match (args.content, &args.content_file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either --content or --content-file is required"),
    };

    let mut operation = ImportTextHtml::new(args.inbox, content);
    if let Some(filename) = args.filename {
        operation = operation.with_filename(filename);
    }
    if let Some(metadata) = args.metadata.as_deref() {
        operation =
            operation.with_metadata(Metadata::parse(metadata).context("invalid --metadata")?);
    }

    let request = operation.into_request()?;
    let response = service
        .upload(&request)
        .await
        .context("document upload failed")?;

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        inbox_id = %request.inbox_id,
        "Content uploaded"
    );

    write_json_line(out, &response)
}

#[cfg(test)]
mod tests {
    use airparser_core::mock::MockProvider;
    use clap::Parser;

    use super::*;
    use crate::command::test_utils::mock_service;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        args: ImportHtmlArgs,
    }

    fn args(content: &str) -> ImportHtmlArgs {
        ImportHtmlArgs {
            inbox: "inbox-1".to_owned(),
            content: Some(content.to_owned()),
            content_file: None,
            filename: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn uploads_html_with_flat_metadata() -> anyhow::Result<()> {
        let (provider, service) = mock_service(MockProvider::new());
        let mut args = args("<p>Order 12345</p>");
        args.metadata = Some(r#"{"orderId":"12345","priority":2}"#.to_owned());

        run(&service, args, &mut Vec::new()).await?;

        let body = String::from_utf8_lossy(provider.uploads()[0].body.body()).into_owned();
        assert!(body.contains(r#"filename="document.html""#));
        assert!(body.contains("Content-Type: text/html\r\n"));
        assert!(body.contains("<p>Order 12345</p>"));
        assert!(body.contains("name=\"orderId\"\r\n\r\n12345\r\n"));
        assert!(body.contains("name=\"priority\"\r\n\r\n2\r\n"));
        Ok(())
    }

    #[tokio::test]
    async fn text_extension_leaves_type_to_service() -> anyhow::Result<()> {
        let (provider, service) = mock_service(MockProvider::new());
        let mut args = args("plain words");
        args.filename = Some("notes.txt".to_owned());

        run(&service, args, &mut Vec::new()).await?;

        let body = String::from_utf8_lossy(provider.uploads()[0].body.body()).into_owned();
        assert!(body.contains(r#"filename="notes.txt""#));
        assert!(!body.contains("Content-Type: "));
        Ok(())
    }

    #[tokio::test]
    async fn reads_content_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mail.eml");
        std::fs::write(&path, "Subject: hi\r\n\r\nbody")?;

        let (provider, service) = mock_service(MockProvider::new());
        let args = ImportHtmlArgs {
            content: None,
            content_file: Some(path),
            ..args("")
        };

        run(&service, args, &mut Vec::new()).await?;

        let body = String::from_utf8_lossy(provider.uploads()[0].body.body()).into_owned();
        assert!(body.contains("Subject: hi"));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_empty_inbox() {
        let (provider, service) = mock_service(MockProvider::new());
        let args = ImportHtmlArgs {
            inbox: "  ".to_owned(),
            ..args("<p/>")
        };

        assert!(run(&service, args, &mut Vec::new()).await.is_err());
        assert!(provider.uploads().is_empty());
    }

    #[test]
    fn content_sources_are_exclusive() {
        assert!(
            Harness::try_parse_from(["t", "--inbox", "i", "--content", "a", "--content-file", "b"])
                .is_err()
        );
        assert!(Harness::try_parse_from(["t", "--inbox", "i"]).is_err());
        assert!(Harness::try_parse_from(["t", "--inbox", "i", "--content-file", "b"]).is_ok());
    }
}
