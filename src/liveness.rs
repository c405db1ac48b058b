//! Liveness endpoint for hosting platforms.
//!
//! `GET /` answers with a fixed string while the process is up. It does not
//! look at the bot at all.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Body returned by `GET /`
pub const LIVENESS_BODY: &str = "✅ Bot is running successfully!";

async fn home() -> &'static str {
    LIVENESS_BODY
}

/// Router serving the liveness route
pub fn router() -> Router {
    Router::new().route("/", get(home))
}

/// Binds the liveness listener on all interfaces.
///
/// # Errors
///
/// Returns an error if the port cannot be bound.
pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    info!("Liveness endpoint listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serves the liveness router until the task is dropped or the socket fails.
///
/// # Errors
///
/// Returns an error if accepting connections fails.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_server() -> (SocketAddr, tokio::task::JoinHandle<std::io::Result<()>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(serve(listener));
        (addr, handle)
    }

    #[tokio::test]
    async fn test_root_returns_fixed_body() {
        let (addr, handle) = spawn_server().await;

        let response = reqwest::get(format!("http://{addr}/"))
            .await
            .expect("request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.expect("body"), LIVENESS_BODY);

        handle.abort();
    }

    #[tokio::test]
    async fn test_repeated_requests_are_stable() {
        let (addr, handle) = spawn_server().await;
        let client = reqwest::Client::new();

        for _ in 0..3 {
            let body = client
                .get(format!("http://{addr}/"))
                .send()
                .await
                .expect("request")
                .text()
                .await
                .expect("body");
            assert_eq!(body, LIVENESS_BODY);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_other_paths_and_methods() {
        let (addr, handle) = spawn_server().await;
        let client = reqwest::Client::new();

        let missing = client
            .get(format!("http://{addr}/status"))
            .send()
            .await
            .expect("request");
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        let post = client
            .post(format!("http://{addr}/"))
            .send()
            .await
            .expect("request");
        assert_eq!(post.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

        handle.abort();
    }
}
