//! `import-file`: uploads a binary document.

use std::io::Write;
use std::path::PathBuf;

use airparser_core::AirparserService;
use airparser_core::upload::{BinaryFile, ImportFile, Metadata};
use anyhow::Context;
use clap::Args;

use super::write_json_line;
use crate::TRACING_TARGET_COMMAND;

/// Arguments of `import-file`.
#[derive(Debug, Clone, Args)]
pub struct ImportFileArgs {
    /// Inbox id to upload to.
    #[arg(long, env = "AIRPARSER_INBOX")]
    pub inbox: String,

    /// Path of the document to upload.
    pub path: PathBuf,

    /// Filename sent to Airparser instead of the file's own name.
    #[arg(long)]
    pub filename: Option<String>,

    /// MIME type of the document; omitted from the upload when unset.
    #[arg(long)]
    pub mime_type: Option<String>,

    /// JSON object echoed back with the parsed result.
    #[arg(long)]
    pub metadata: Option<String>,
}

/// Reads the file, uploads it and prints the service response.
pub async fn run(
    service: &AirparserService,
    args: ImportFileArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let data = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("failed to read {}", args.path.display()))?;

    let mut file = BinaryFile::new(data);
    if let Some(name) = args.path.file_name() {
        file = file.with_file_name(name.to_string_lossy());
    }
    if let Some(mime_type) = args.mime_type {
        file = file.with_mime_type(mime_type);
    }

    let mut operation = ImportFile::new(args.inbox, file);
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
        path = %args.path.display(),
        "Document uploaded"
    );

    write_json_line(out, &response)
}

#[cfg(test)]
mod tests {
    use airparser_core::mock::MockProvider;
    use serde_json::json;

    use super::*;
    use crate::command::test_utils::{json_lines, mock_service};

    fn args(path: PathBuf) -> ImportFileArgs {
        ImportFileArgs {
            inbox: "inbox-1".to_owned(),
            path,
            filename: None,
            mime_type: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn uploads_file_with_its_name() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("invoice.pdf");
        std::fs::write(&path, b"%PDF-1.7")?;

        let (provider, service) = mock_service(MockProvider::new());
        let mut out = Vec::new();

        let mut args = args(path);
        args.mime_type = Some("application/pdf".to_owned());
        args.metadata = Some(r#"{"orderId":"12345"}"#.to_owned());
        run(&service, args, &mut out).await?;

        assert_eq!(
            json_lines(&out),
            vec![json!({"inbox_id": "inbox-1", "status": "queued"})]
        );

        let uploads = provider.uploads();
        assert_eq!(uploads.len(), 1);
        let body = String::from_utf8_lossy(uploads[0].body.body()).into_owned();
        assert!(body.contains(r#"name="file"; filename="invoice.pdf""#));
        assert!(body.contains("Content-Type: application/pdf\r\n"));
        assert!(body.contains("%PDF-1.7"));
        assert!(body.contains(r#"name="payload""#));
        assert!(body.contains(r#"{"orderId":"12345"}"#));
        Ok(())
    }

    #[tokio::test]
    async fn custom_filename_wins() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scan.bin");
        std::fs::write(&path, [0u8, 1, 2])?;

        let (provider, service) = mock_service(MockProvider::new());
        let mut args = args(path);
        args.filename = Some("receipt.png".to_owned());
        run(&service, args, &mut Vec::new()).await?;

        let body = String::from_utf8_lossy(provider.uploads()[0].body.body()).into_owned();
        assert!(body.contains(r#"filename="receipt.png""#));
        assert!(!body.contains("Content-Type: "));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_non_object_metadata() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"x")?;

        let (provider, service) = mock_service(MockProvider::new());
        let mut args = args(path);
        args.metadata = Some("[1, 2]".to_owned());

        assert!(run(&service, args, &mut Vec::new()).await.is_err());
        assert!(provider.uploads().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let (_, service) = mock_service(MockProvider::new());
        let err = run(&service, args(PathBuf::from("/nonexistent/a.pdf")), &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
