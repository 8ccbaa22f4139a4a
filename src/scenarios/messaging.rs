//! The messaging scenario.
//!
//! Drives the full message lifecycle on the fixture channel and records the
//! REST response and the matching websocket event for each step.

use serde_json::json;

use crate::error::Result;
use crate::models::EventType;

use super::ScenarioContext;

pub(super) async fn run(ctx: &mut ScenarioContext) -> Result<()> {
    let token = ctx.token.clone();
    let channel_type = ctx.channel_type.clone();
    let channel_id = ctx.channel_id.clone();

    // Channel list, as the SDK's channel list screen queries it.
    tracing::info!("listing channels");
    let connection_id = ctx.socket.connection_id().to_string();
    let channels = ctx
        .api
        .list_channels(
            &token,
            &connection_id,
            &json!({ "cid": { "$eq": ctx.cid } }),
        )
        .await?;
    ctx.record("http_channels", &channels).await?;

    // Message lifecycle.
    let message_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(message_id = %message_id, "sending message");
    let message = ctx
        .api
        .send_message(
            &token,
            &channel_type,
            &channel_id,
            &json!({ "id": message_id, "text": "Hello from the fixture run" }),
        )
        .await?;
    ctx.record("http_message", &message).await?;
    ctx.record_event("ws_message_new", EventType::MessageNew)
        .await?;

    tracing::info!(message_id = %message_id, "updating message");
    let updated = ctx
        .api
        .update_message(
            &token,
            &message_id,
            &json!({ "id": message_id, "text": "Hello from the fixture run (edited)" }),
        )
        .await?;
    ctx.record("http_message_updated", &updated).await?;
    ctx.record_event("ws_message_updated", EventType::MessageUpdated)
        .await?;

    // Thread reply and the thread query. Replies with show_in_channel=false
    // don't surface on the channel event stream, so only the responses are
    // recorded here.
    let reply_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(parent_id = %message_id, "sending thread reply");
    let reply = ctx
        .api
        .send_message(
            &token,
            &channel_type,
            &channel_id,
            &json!({
                "id": reply_id,
                "text": "A threaded reply",
                "parent_id": message_id,
                "show_in_channel": false,
            }),
        )
        .await?;
    ctx.record("http_reply", &reply).await?;

    let replies = ctx.api.get_replies(&token, &message_id, 20).await?;
    ctx.record("http_replies", &replies).await?;

    // Reactions.
    tracing::info!(message_id = %message_id, "adding reaction");
    let reaction = ctx.api.send_reaction(&token, &message_id, "love").await?;
    ctx.record("http_reaction", &reaction).await?;
    ctx.record_event("ws_reaction_new", EventType::ReactionNew)
        .await?;

    tracing::info!(message_id = %message_id, "removing reaction");
    let removed = ctx.api.delete_reaction(&token, &message_id, "love").await?;
    ctx.record("http_reaction_deleted", &removed).await?;
    ctx.record_event("ws_reaction_deleted", EventType::ReactionDeleted)
        .await?;

    // Typing indicator.
    tracing::info!("sending typing event");
    let typing = ctx
        .api
        .send_event(&token, &channel_type, &channel_id, "typing.start")
        .await?;
    ctx.record("http_event", &typing).await?;
    ctx.record_event("ws_typing_start", EventType::TypingStart)
        .await?;

    // Read state.
    tracing::info!("marking channel read");
    let read = ctx.api.mark_read(&token, &channel_type, &channel_id).await?;
    ctx.record("http_read", &read).await?;

    // Membership churn.
    let guest = ctx.users[2].id.clone();
    tracing::info!(user = %guest, "adding member");
    let added = ctx
        .api
        .add_members(&token, &channel_type, &channel_id, &[guest.clone()])
        .await?;
    ctx.record("http_members_added", &added).await?;
    ctx.record_event("ws_member_added", EventType::MemberAdded)
        .await?;

    tracing::info!(user = %guest, "removing member");
    let removed = ctx
        .api
        .remove_members(&token, &channel_type, &channel_id, &[guest])
        .await?;
    ctx.record("http_members_removed", &removed).await?;
    ctx.record_event("ws_member_removed", EventType::MemberRemoved)
        .await?;

    // Channel data update.
    tracing::info!("updating channel data");
    let channel_updated = ctx
        .api
        .update_channel(
            &token,
            &channel_type,
            &channel_id,
            &json!({ "name": "Fixture Channel" }),
        )
        .await?;
    ctx.record("http_channel_updated", &channel_updated).await?;
    ctx.record_event("ws_channel_updated", EventType::ChannelUpdated)
        .await?;

    // Message deletion last, so every earlier step had a live message.
    tracing::info!(message_id = %message_id, "deleting message");
    let deleted = ctx.api.delete_message(&token, &message_id).await?;
    ctx.record("http_message_deleted", &deleted).await?;
    ctx.record_event("ws_message_deleted", EventType::MessageDeleted)
        .await?;

    Ok(())
}
