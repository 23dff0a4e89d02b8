//! `whoami`: runs the credential test.

use std::io::Write;

use airparser_core::AirparserService;
use anyhow::Context;

use super::write_json_line;
use crate::TRACING_TARGET_COMMAND;

/// Prints the account returned by `GET /users/me`.
pub async fn run(service: &AirparserService, out: &mut impl Write) -> anyhow::Result<()> {
    let account = service
        .verify_credentials()
        .await
        .context("credential test failed")?;

    tracing::info!(target: TRACING_TARGET_COMMAND, "API key accepted");
    write_json_line(out, &account)
}

#[cfg(test)]
mod tests {
    use airparser_core::mock::MockProvider;
    use serde_json::json;

    use super::*;
    use crate::command::test_utils::{json_lines, mock_service};

    #[tokio::test]
    async fn prints_account() -> anyhow::Result<()> {
        let (_, service) = mock_service(MockProvider::new());
        let mut out = Vec::new();

        run(&service, &mut out).await?;
        assert_eq!(json_lines(&out), vec![json!({"email": "mock@airparser.test"})]);
        Ok(())
    }

    #[tokio::test]
    async fn reports_rejected_key() {
        let (_, service) = mock_service(MockProvider::new().failing());
        let mut out = Vec::new();

        let err = run(&service, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("credential test failed"));
        assert!(out.is_empty());
    }
}
