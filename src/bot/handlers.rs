use crate::bot::reply::send_reply;
use crate::bot::responder::LinkResponder;
use anyhow::Result;
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};
use tracing::info;

/// Welcome text sent on `/start`
pub const WELCOME_TEXT: &str = "👋 <b>Welcome to the YouTube Info Bot!</b>\n\n\
     Send me any video link (YouTube, Instagram, TikTok, etc.)\n\
     and I'll fetch the title, author and thumbnail, and give you a redirect link.\n\n\
     <i>(Note: This bot doesn't download anything, it only shows public info)</i>";

/// Usage text sent on `/help`
pub const HELP_TEXT: &str = "Just send a YouTube or any video URL to get its information 🔍";

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// Show usage instructions
    #[command(description = "How to use the bot.")]
    Help,
}

/// Display name of the sender: username, then first name, then `Unknown`.
fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if let Some(ref username) = user.username {
            return username.clone();
        }
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
    }
    "Unknown".to_string()
}

/// True for slash-command text, recognized or not.
///
/// Unknown commands are ignored instead of being treated as a link message.
#[must_use]
pub fn is_command_text(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

/// Start handler
///
/// # Errors
///
/// Returns an error if the welcome message cannot be sent.
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    let user_id = get_user_id_safe(&msg);
    let user_name = get_user_name(&msg);
    info!("User {user_id} ({user_name}) initiated /start command.");

    bot.send_message(msg.chat.id, WELCOME_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Help handler
///
/// # Errors
///
/// Returns an error if the usage message cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    info!("User {} requested /help.", get_user_id_safe(&msg));
    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}

/// Handler for plain text messages: look up the first link and reply.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn handle_text(bot: Bot, msg: Message, responder: LinkResponder) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let user_id = get_user_id_safe(&msg);
    info!("Handling text message from user {user_id}.");

    let reply = responder.respond(text).await;
    send_reply(&bot, msg.chat.id, &reply).await
}
