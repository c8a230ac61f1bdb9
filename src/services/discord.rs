// src/services/discord.rs

//! Discord channel sink.
//!
//! Posts announcements through the bot REST API. Discord rejects messages
//! over 2000 characters, so long announcements go out in several parts,
//! split between lines.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::services::ChannelSink;

/// Discord's per-message character limit.
pub const MESSAGE_LIMIT: usize = 2000;

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Discord bot client bound to one channel.
pub struct DiscordClient {
    client: Client,
    api_base: String,
    channel_id: u64,
    token: String,
}

impl DiscordClient {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        channel_id: u64,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            channel_id,
            token: token.into(),
        }
    }

    /// Create a client for the configured channel.
    pub fn from_config(config: &Config, client: Client, token: impl Into<String>) -> Self {
        Self::new(
            client,
            config.discord.api_base.clone(),
            config.discord.channel_id,
            token,
        )
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/channels/{}/messages",
            self.api_base.trim_end_matches('/'),
            self.channel_id
        )
    }

    async fn post(&self, content: &str) -> Result<()> {
        let response = self
            .client
            .post(self.messages_url())
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(&CreateMessage { content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notify(format!(
                "channel {}: {} {}",
                self.channel_id,
                status,
                body.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelSink for DiscordClient {
    async fn send(&self, text: &str) -> Result<()> {
        let parts = split_message(text, MESSAGE_LIMIT);
        let total = parts.len();
        for (i, part) in parts.iter().enumerate() {
            self.post(part).await?;
            log::debug!("Sent part {}/{} ({} chars)", i + 1, total, part.chars().count());
        }
        Ok(())
    }
}

/// Split `text` into chunks of at most `limit` characters.
///
/// Breaks fall between lines; a single line longer than `limit` is cut
/// at character boundaries.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed <= limit {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len += needed;
            continue;
        }

        if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            let chars: Vec<char> = line.chars().collect();
            let mut chunks = chars.chunks(limit).peekable();
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    parts.push(piece);
                } else {
                    current_len = chunk.len();
                    current = piece;
                }
            }
        }
    }

    if !current.is_empty() || parts.is_empty() {
        parts.push(current);
    }
    parts
}
