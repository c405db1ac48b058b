//! Reply shapes and their rendering.
//!
//! [`build_reply`] decides what to send; [`send_reply`] turns the decision into
//! Telegram API calls. Keeping them apart lets the decision be tested without a bot.

use crate::metadata::VideoInfo;
use anyhow::Result;
use reqwest::Url;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode};
use tracing::{debug, warn};

/// Reply when the message has no usable link
pub const INVALID_LINK_TEXT: &str = "❗ Please send a valid video link.";
/// Reply when the metadata lookup produced nothing
pub const FETCH_FAILED_TEXT: &str = "⚠️ Unable to fetch info from that link. Try another one!";
/// Label of the inline button pointing back at the original link
pub const OPEN_BUTTON_TEXT: &str = "🔗 Open on YouTube";

/// A planned outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text, no markup
    Text {
        /// Message text
        text: String,
    },
    /// HTML caption with a single link button
    Link {
        /// HTML caption
        caption: String,
        /// Button target
        url: Url,
    },
    /// Photo by URL with an HTML caption and a single link button
    Photo {
        /// Photo URL, fetched by Telegram
        photo: Url,
        /// HTML caption
        caption: String,
        /// Button target
        url: Url,
    },
}

impl Reply {
    /// Fixed reply for input without a link.
    #[must_use]
    pub fn invalid_link() -> Self {
        Self::Text {
            text: INVALID_LINK_TEXT.to_string(),
        }
    }

    /// Fixed reply for a failed lookup.
    #[must_use]
    pub fn fetch_failed() -> Self {
        Self::Text {
            text: FETCH_FAILED_TEXT.to_string(),
        }
    }
}

/// Caption shown under the photo or as the message text.
///
/// # Examples
///
/// ```
/// use link_info_bot::bot::reply::format_caption;
/// use link_info_bot::metadata::VideoInfo;
///
/// let info = VideoInfo {
///     title: "Demo".into(),
///     author: "Alice".into(),
///     thumbnail_url: String::new(),
/// };
/// assert_eq!(format_caption(&info), "🎬 <b>Demo</b>\n👤 Alice");
/// ```
#[must_use]
pub fn format_caption(info: &VideoInfo) -> String {
    format!(
        "🎬 <b>{}</b>\n👤 {}",
        html_escape::encode_text(&info.title),
        html_escape::encode_text(&info.author)
    )
}

/// Maps a lookup result for `url` to the reply to send.
///
/// `url` is the link as written in the message. The button needs a valid URL,
/// so a link that does not parse is answered like a failed lookup.
#[must_use]
pub fn build_reply(url: &str, info: Option<&VideoInfo>) -> Reply {
    let Some(info) = info else {
        return Reply::fetch_failed();
    };
    let url = match Url::parse(url) {
        Ok(url) => url,
        Err(e) => {
            debug!(url, error = %e, "Link has no valid button target");
            return Reply::fetch_failed();
        }
    };

    let caption = format_caption(info);
    let thumbnail = if info.has_thumbnail() {
        match Url::parse(info.thumbnail_url.trim()) {
            Ok(photo) => Some(photo),
            Err(e) => {
                debug!(thumbnail = %info.thumbnail_url, error = %e, "Ignoring unparseable thumbnail URL");
                None
            }
        }
    } else {
        None
    };

    match thumbnail {
        Some(photo) => Reply::Photo {
            photo,
            caption,
            url,
        },
        None => Reply::Link { caption, url },
    }
}

/// Inline keyboard with one button opening `url`
#[must_use]
pub fn open_link_keyboard(url: &Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
        OPEN_BUTTON_TEXT,
        url.clone(),
    )]])
}

/// Sends `reply` to `chat_id`.
///
/// If Telegram rejects a photo (for example it cannot download the thumbnail),
/// the caption and button are sent once more as a text message.
///
/// # Errors
///
/// Returns an error if the Telegram API call fails.
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<()> {
    match reply {
        Reply::Text { text } => {
            bot.send_message(chat_id, text.as_str()).await?;
        }
        Reply::Link { caption, url } => send_link(bot, chat_id, caption, url).await?,
        Reply::Photo {
            photo,
            caption,
            url,
        } => {
            let sent = bot
                .send_photo(chat_id, InputFile::url(photo.clone()))
                .caption(caption.as_str())
                .parse_mode(ParseMode::Html)
                .reply_markup(open_link_keyboard(url))
                .await;

            if let Err(e) = sent {
                warn!(photo = %photo, error = %e, "Photo reply rejected, sending text instead");
                send_link(bot, chat_id, caption, url).await?;
            }
        }
    }
    Ok(())
}

async fn send_link(bot: &Bot, chat_id: ChatId, caption: &str, url: &Url) -> Result<()> {
    bot.send_message(chat_id, caption)
        .parse_mode(ParseMode::Html)
        .reply_markup(open_link_keyboard(url))
        .await?;
    Ok(())
}
