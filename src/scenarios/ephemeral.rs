//! The ephemeral scenario.
//!
//! Near-twin of the messaging scenario: same setup and teardown, but the
//! body exercises slash-command ephemeral messages and their attachment
//! actions (the giphy flow), which the SDK renders very differently from
//! regular messages and therefore needs separate fixtures for.

use serde_json::json;

use crate::error::Result;
use crate::models::EventType;

use super::ScenarioContext;

pub(super) async fn run(ctx: &mut ScenarioContext) -> Result<()> {
    let token = ctx.token.clone();
    let channel_type = ctx.channel_type.clone();
    let channel_id = ctx.channel_id.clone();

    // A command message comes back as an ephemeral message with attachment
    // actions instead of appearing on the event stream.
    let command_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(message_id = %command_id, "sending giphy command");
    let ephemeral = ctx
        .api
        .send_message(
            &token,
            &channel_type,
            &channel_id,
            &json!({ "id": command_id, "text": "/giphy hello" }),
        )
        .await?;
    ctx.record("http_ephemeral_message", &ephemeral).await?;

    // Shuffle keeps the message ephemeral, returning a fresh candidate.
    tracing::info!(message_id = %command_id, "shuffling giphy result");
    let shuffled = ctx
        .api
        .send_action(
            &token,
            &command_id,
            &channel_id,
            &json!({ "image_action": "shuffle" }),
        )
        .await?;
    ctx.record("http_message_action_shuffle", &shuffled).await?;

    // Sending promotes it to a regular message, which does hit the stream.
    tracing::info!(message_id = %command_id, "sending giphy result");
    let sent = ctx
        .api
        .send_action(
            &token,
            &command_id,
            &channel_id,
            &json!({ "image_action": "send" }),
        )
        .await?;
    ctx.record("http_message_action", &sent).await?;
    ctx.record_event("ws_message_new", EventType::MessageNew)
        .await?;

    // A second command, cancelled instead of sent.
    let cancelled_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(message_id = %cancelled_id, "sending giphy command to cancel");
    let ephemeral = ctx
        .api
        .send_message(
            &token,
            &channel_type,
            &channel_id,
            &json!({ "id": cancelled_id, "text": "/giphy bye" }),
        )
        .await?;
    ctx.record("http_ephemeral_message_cancelled", &ephemeral)
        .await?;

    tracing::info!(message_id = %cancelled_id, "cancelling giphy command");
    let cancelled = ctx
        .api
        .send_action(
            &token,
            &cancelled_id,
            &channel_id,
            &json!({ "image_action": "cancel" }),
        )
        .await?;
    ctx.record("http_message_action_cancel", &cancelled).await?;

    Ok(())
}
