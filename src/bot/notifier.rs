//! Posts expiry notices to the channel a wager was opened in.

use async_trait::async_trait;
use serenity::all::{ChannelId, CreateMessage, Http};
use std::sync::Arc;

use crate::{
    bot::render,
    error::AppError,
    service::game::expiry::{ExpiryNotice, ExpiryNotifier},
};

pub struct DiscordExpiryNotifier {
    http: Arc<Http>,
}

impl DiscordExpiryNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ExpiryNotifier for DiscordExpiryNotifier {
    async fn notify(&self, notice: &ExpiryNotice) -> Result<(), AppError> {
        let message = CreateMessage::new().content(render::expiry_text(notice));

        ChannelId::new(notice.channel_id)
            .send_message(&self.http, message)
            .await?;

        Ok(())
    }
}
