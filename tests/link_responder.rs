use async_trait::async_trait;
use link_info_bot::bot::reply::{Reply, FETCH_FAILED_TEXT, INVALID_LINK_TEXT};
use link_info_bot::bot::LinkResponder;
use link_info_bot::metadata::{MetadataError, MetadataProvider, OEmbedClient, VideoInfo};
use mockito::Matcher;
use reqwest::Url;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Provider that counts calls and never answers successfully.
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl MetadataProvider for CountingProvider {
    async fn fetch(&self, _url: &str) -> Result<VideoInfo, MetadataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MetadataError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

fn oembed_responder(server: &mockito::Server, timeout: Duration) -> LinkResponder {
    let endpoint = Url::parse(&format!("{}/oembed", server.url())).expect("valid url");
    LinkResponder::new(Arc::new(OEmbedClient::new(endpoint, timeout)))
}

#[tokio::test]
async fn test_text_without_link_makes_no_call() {
    let provider = Arc::new(CountingProvider::default());
    let responder = LinkResponder::new(provider.clone());

    let reply = responder.respond("what about youtube.com/watch?v=abc").await;

    assert_eq!(
        reply,
        Reply::Text {
            text: INVALID_LINK_TEXT.to_string()
        }
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_lookup_is_called_once() {
    let provider = Arc::new(CountingProvider::default());
    let responder = LinkResponder::new(provider.clone());

    let reply = responder.respond("https://youtu.be/abc123").await;

    assert_eq!(
        reply,
        Reply::Text {
            text: FETCH_FAILED_TEXT.to_string()
        }
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unparseable_link_is_looked_up_once() {
    let provider = Arc::new(CountingProvider::default());
    let responder = LinkResponder::new(provider.clone());

    let reply = responder.respond("look https://[broken").await;

    assert_eq!(
        reply,
        Reply::Text {
            text: FETCH_FAILED_TEXT.to_string()
        }
    );
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_end_to_end_photo_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/oembed")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("url".into(), "https://youtu.be/abc123".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"title":"Demo","author_name":"Alice","thumbnail_url":"https://img/x.jpg"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let responder = oembed_responder(&server, Duration::from_secs(5));
    let reply = responder
        .respond("check this out https://youtu.be/abc123 nice")
        .await;

    assert_eq!(
        reply,
        Reply::Photo {
            photo: Url::parse("https://img/x.jpg").expect("valid url"),
            caption: "🎬 <b>Demo</b>\n👤 Alice".to_string(),
            url: Url::parse("https://youtu.be/abc123").expect("valid url"),
        }
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_end_to_end_link_reply_without_thumbnail() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/oembed")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"title":"Only Title"}"#)
        .create_async()
        .await;

    let responder = oembed_responder(&server, Duration::from_secs(5));
    let reply = responder.respond("https://vimeo.com/1234").await;

    assert_eq!(
        reply,
        Reply::Link {
            caption: "🎬 <b>Only Title</b>\n👤 ".to_string(),
            url: Url::parse("https://vimeo.com/1234").expect("valid url"),
        }
    );
}

#[tokio::test]
async fn test_end_to_end_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/oembed")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let responder = oembed_responder(&server, Duration::from_secs(5));
    let reply = responder.respond("https://youtu.be/abc123").await;

    assert_eq!(
        reply,
        Reply::Text {
            text: FETCH_FAILED_TEXT.to_string()
        }
    );
}
