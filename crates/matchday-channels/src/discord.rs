//! Discord channel sink — message sending and in-place edits via the Bot REST API.

use async_trait::async_trait;
use serde::Deserialize;

use matchday_core::config::DiscordConfig;
use matchday_core::error::{MatchdayError, Result};
use matchday_core::traits::NotificationSink;
use matchday_core::types::{EditOutcome, Notification};

/// Discord REST sink using a bot token.
pub struct DiscordSink {
    config: DiscordConfig,
    client: reqwest::Client,
}

impl DiscordSink {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.config.bot_token)
    }

    /// Build the JSON payload for a message create/edit.
    /// The configured supporters role is mentioned with an explicit
    /// allowed-mentions allowlist only when the notification asks for it;
    /// edits never re-ping.
    fn build_payload(&self, message: &Notification, mention: bool) -> serde_json::Value {
        let mut content = message.content.clone().unwrap_or_default();
        let mut allowed_roles: Vec<String> = Vec::new();

        if mention && let Some(role_id) = self.config.mention_role_id {
            let ping = format!("<@&{role_id}>");
            if content.is_empty() {
                content = ping;
            } else {
                content = format!("{ping}\n{content}");
            }
            allowed_roles.push(role_id.to_string());
        }

        let mut payload = serde_json::json!({
            "content": content,
            "allowed_mentions": { "parse": [], "roles": allowed_roles },
        });

        if let Some(embed) = &message.embed {
            let fields: Vec<serde_json::Value> = embed
                .fields
                .iter()
                .map(|(name, value)| serde_json::json!({"name": name, "value": value}))
                .collect();
            payload["embeds"] = serde_json::json!([{
                "title": embed.title,
                "description": embed.description,
                "fields": fields,
                "color": embed.color,
            }]);
        }

        payload
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn send_message(&self, channel: &str, message: &Notification) -> Result<String> {
        let url = self.api_url(&format!("/channels/{channel}/messages"));
        let payload = self.build_payload(message, message.mention);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&payload)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| MatchdayError::Sink(format!("Discord send failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MatchdayError::Sink(format!(
                "Discord API error {status} on send: {body}"
            )));
        }

        let created: MessageCreated = response
            .json()
            .await
            .map_err(|e| MatchdayError::Sink(format!("Invalid Discord send response: {e}")))?;
        tracing::debug!("📨 Sent message {} to channel {}", created.id, channel);
        Ok(created.id)
    }

    async fn edit_message(
        &self,
        channel: &str,
        message_ref: &str,
        message: &Notification,
    ) -> Result<EditOutcome> {
        let url = self.api_url(&format!("/channels/{channel}/messages/{message_ref}"));
        let payload = self.build_payload(message, false);

        let response = self
            .client
            .patch(&url)
            .header("Authorization", self.auth_header())
            .json(&payload)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| MatchdayError::Sink(format!("Discord edit failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(EditOutcome::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MatchdayError::Sink(format!(
                "Discord API error {status} on edit: {body}"
            )));
        }
        Ok(EditOutcome::Edited)
    }
}

#[derive(Debug, Deserialize)]
struct MessageCreated {
    id: String,
}
