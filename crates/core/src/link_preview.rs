//! Link preview extraction from fetched HTML.
//!
//! The fetching itself lives in the API crate; this module only turns a page
//! body into a display title and a favicon URL.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("valid regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(meta|link)\b([^>]*)>").expect("valid regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid regex")
});

/// What a link item displays in place of its raw URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    pub title: String,
    pub favicon: Option<String>,
}

/// Returns true when `url` parses as an absolute `http` or `https` URL with
/// a host. Scheme matching is case-insensitive.
pub fn is_http_url(url: &str) -> bool {
    parse_http(url).is_some()
}

fn parse_http(url: &str) -> Option<Url> {
    Url::parse(url)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .filter(|u| u.host_str().is_some_and(|h| !h.is_empty()))
}

/// Extract a preview from an HTML document fetched from `page_url`.
///
/// Title precedence: `og:title`, `twitter:title`, `<title>`, then the URL
/// itself. The favicon comes from the first `icon`-type `<link>`, resolved
/// against the page, falling back to `/favicon.ico` on the page origin.
pub fn extract_preview(html: &str, page_url: &str) -> LinkPreview {
    let mut og_title = None;
    let mut twitter_title = None;
    let mut icon = None;
    let mut touch_icon = None;

    for tag in TAG_RE.captures_iter(html) {
        let kind = tag[1].to_ascii_lowercase();
        let attrs = parse_attributes(&tag[2]);
        let attr = |name: &str| {
            attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        if kind == "meta" {
            let key = attr("property").or_else(|| attr("name")).map(str::to_ascii_lowercase);
            let content = attr("content").map(clean_text).filter(|c| !c.is_empty());
            match key.as_deref() {
                Some("og:title") if og_title.is_none() => og_title = content,
                Some("twitter:title") if twitter_title.is_none() => twitter_title = content,
                _ => {}
            }
        } else {
            let rel = attr("rel").unwrap_or_default().to_ascii_lowercase();
            let Some(href) = attr("href")
                .map(|h| decode_entities(h.trim()))
                .filter(|h| !h.is_empty())
            else {
                continue;
            };
            let tokens: Vec<&str> = rel.split_whitespace().collect();
            if tokens.contains(&"icon") && icon.is_none() {
                icon = Some(resolve_url(&href, page_url));
            } else if tokens.contains(&"apple-touch-icon") && touch_icon.is_none() {
                touch_icon = Some(resolve_url(&href, page_url));
            }
        }
    }

    let title = og_title
        .or(twitter_title)
        .or_else(|| {
            TITLE_RE
                .captures(html)
                .map(|c| clean_text(&c[1]))
                .filter(|t| !t.is_empty())
        })
        .unwrap_or_else(|| page_url.to_string());

    let favicon = icon
        .or(touch_icon)
        .or_else(|| origin_of(page_url).map(|o| format!("{o}/favicon.ico")));

    LinkPreview { title, favicon }
}

/// `scheme://host[:port]` of an absolute http(s) URL. Default ports are
/// omitted.
pub fn origin_of(url: &str) -> Option<String> {
    parse_http(url).map(|u| u.origin().ascii_serialization())
}

/// Resolve `href` against the page it was found on. An href that cannot be
/// resolved is returned as-is.
pub fn resolve_url(href: &str, page_url: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .map(|c| {
            let value = c
                .get(2)
                .or_else(|| c.get(3))
                .or_else(|| c.get(4))
                .map(|m| m.as_str())
                .unwrap_or_default();
            (c[1].to_ascii_lowercase(), value.to_string())
        })
        .collect()
}

/// Decode entities and collapse runs of whitespace.
fn clean_text(raw: &str) -> String {
    decode_entities(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
