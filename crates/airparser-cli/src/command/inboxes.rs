//! `inboxes`: lists inboxes for the inbox parameter.

use std::io::Write;

use airparser_core::AirparserService;
use anyhow::Context;

use super::write_json_line;
use crate::TRACING_TARGET_COMMAND;

/// Prints one JSON line per inbox.
pub async fn run(service: &AirparserService, out: &mut impl Write) -> anyhow::Result<()> {
    let inboxes = service
        .list_inboxes()
        .await
        .context("failed to list inboxes")?;

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        count = inboxes.len(),
        "Listed inboxes"
    );

    for inbox in &inboxes {
        write_json_line(out, inbox)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use airparser_core::inbox::Inbox;
    use airparser_core::mock::MockProvider;
    use serde_json::json;

    use super::*;
    use crate::command::test_utils::{json_lines, mock_service};

    #[tokio::test]
    async fn prints_inboxes_as_lines() -> anyhow::Result<()> {
        let inboxes = vec![
            Inbox {
                id: "i1".to_owned(),
                name: "Invoices".to_owned(),
            },
            Inbox {
                id: "i2".to_owned(),
                name: "Receipts".to_owned(),
            },
        ];
        let (_, service) = mock_service(MockProvider::new().with_inboxes(inboxes));
        let mut out = Vec::new();

        run(&service, &mut out).await?;
        assert_eq!(
            json_lines(&out),
            vec![
                json!({"_id": "i1", "name": "Invoices"}),
                json!({"_id": "i2", "name": "Receipts"}),
            ]
        );
        Ok(())
    }
}
