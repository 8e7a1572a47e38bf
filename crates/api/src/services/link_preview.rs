//! Outbound link preview fetching.
//!
//! [`HttpLinkPreviewer`] downloads the page with [`reqwest`] and hands the
//! body to [`stride_core::link_preview::extract_preview`]. Tests substitute
//! their own [`LinkPreviewer`].

use std::time::Duration;

use async_trait::async_trait;
use stride_core::link_preview::{extract_preview, LinkPreview};

/// Pages larger than this are cut off before extraction.
const MAX_BODY_BYTES: usize = 512 * 1024;

const USER_AGENT: &str = concat!("stride-link-preview/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// Network, DNS, TLS or timeout failure.
    #[error("Link preview request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The page answered with a non-2xx status.
    #[error("Link preview target returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Produces the display title and favicon for a URL.
#[async_trait]
pub trait LinkPreviewer: Send + Sync {
    async fn preview(&self, url: &str) -> Result<LinkPreview, PreviewError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

pub struct HttpLinkPreviewer {
    client: reqwest::Client,
}

impl HttpLinkPreviewer {
    /// Build a previewer whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, PreviewError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LinkPreviewer for HttpLinkPreviewer {
    async fn preview(&self, url: &str) -> Result<LinkPreview, PreviewError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::HttpStatus(status.as_u16()));
        }

        // Relative icon hrefs resolve against wherever redirects ended up.
        let final_url = response.url().to_string();
        let body = read_capped(response, MAX_BODY_BYTES).await?;
        let html = String::from_utf8_lossy(&body);

        let mut preview = extract_preview(&html, &final_url);
        if preview.title == final_url {
            // No title in the page: show what the user typed, not the redirect target.
            preview.title = url.to_string();
        }

        tracing::debug!(url, title = %preview.title, "Fetched link preview");
        Ok(preview)
    }
}

/// Read at most `limit` bytes of the body, then drop the connection.
async fn read_capped(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, PreviewError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    const HTML_HEAD: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n";

    /// Answer every connection with `head`, then `chunk` written `repeat`
    /// times, or until the client hangs up when `repeat` is `None`.
    async fn spawn_page(head: String, chunk: Vec<u8>, repeat: Option<usize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let head = head.clone();
                let chunk = chunk.clone();
                tokio::spawn(async move {
                    let mut request = [0u8; 4096];
                    let _ = stream.read(&mut request).await;
                    if stream.write_all(head.as_bytes()).await.is_err() {
                        return;
                    }
                    let mut sent = 0;
                    while repeat.map_or(true, |n| sent < n) {
                        if stream.write_all(&chunk).await.is_err() {
                            return;
                        }
                        sent += 1;
                    }
                    let _ = stream.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    fn previewer() -> HttpLinkPreviewer {
        HttpLinkPreviewer::new(Duration::from_secs(30)).unwrap()
    }

    #[tokio::test]
    async fn reads_title_and_relative_icon() {
        let page = r#"<html><head>
            <title>Release notes</title>
            <link rel="icon" href="../static/icon.png">
        </head></html>"#;
        let base = spawn_page(HTML_HEAD.to_string(), page.as_bytes().to_vec(), Some(1)).await;

        let preview = previewer().preview(&format!("{base}/docs/v2/notes")).await.unwrap();
        assert_eq!(preview.title, "Release notes");
        assert_eq!(
            preview.favicon.as_deref(),
            Some(format!("{base}/docs/static/icon.png").as_str())
        );
    }

    #[tokio::test]
    async fn title_past_the_cap_is_ignored() {
        let mut page = b"<html><head>".to_vec();
        page.resize(page.len() + MAX_BODY_BYTES, b' ');
        page.extend_from_slice(b"<title>Too late</title></head></html>");
        let base = spawn_page(HTML_HEAD.to_string(), page, Some(1)).await;

        let url = format!("{base}/big");
        let preview = previewer().preview(&url).await.unwrap();
        assert_eq!(preview.title, url);
    }

    #[tokio::test]
    async fn endless_body_stops_at_the_cap() {
        let head = format!(r#"{HTML_HEAD}<html><head><meta property="og:title" content="Endless">"#);
        let base = spawn_page(head, b"<p>more</p>".repeat(4096), None).await;

        let preview = tokio::time::timeout(
            Duration::from_secs(10),
            previewer().preview(&format!("{base}/stream")),
        )
        .await
        .expect("preview should return once the cap is reached")
        .unwrap();
        assert_eq!(preview.title, "Endless");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let head = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        let base = spawn_page(head.to_string(), Vec::new(), Some(0)).await;

        let result = previewer().preview(&format!("{base}/missing")).await;
        assert_matches!(result, Err(PreviewError::HttpStatus(404)));
    }
}
