//! Link responder: message text in, planned [`Reply`] out.

use crate::bot::reply::{build_reply, Reply};
use crate::links::extract_first_url;
use crate::metadata::{lookup, MetadataProvider};
use std::sync::Arc;
use tracing::info;

/// Turns incoming message text into a reply.
///
/// Holds only read-only shared state, so one instance serves every chat.
#[derive(Clone)]
pub struct LinkResponder {
    metadata: Arc<dyn MetadataProvider>,
}

impl LinkResponder {
    /// Create a responder backed by `metadata`.
    #[must_use]
    pub fn new(metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { metadata }
    }

    /// Plans the reply for `text`.
    ///
    /// Input without an http(s) link is answered without touching the
    /// metadata provider. Otherwise exactly one lookup is made with the link
    /// as written.
    pub async fn respond(&self, text: &str) -> Reply {
        let Some(url) = extract_first_url(text.trim()) else {
            return Reply::invalid_link();
        };

        info!(url, "Looking up link metadata");
        let video = lookup(self.metadata.as_ref(), url).await;
        build_reply(url, video.as_ref())
    }
}
