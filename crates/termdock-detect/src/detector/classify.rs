//! URL extraction and keyword classification.

use std::sync::LazyLock;

use regex::Regex;

use super::Classification;

static LOCAL_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)https?://(?:localhost|127\.0\.0\.1|0\.0\.0\.0)(?::(\d+))?(?:/[^\s'"<>()\[\]{}]*)?"#,
    )
    .expect("local url regex is valid")
});

static FRONTEND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:vite|webpack|turbopack|parcel|rollup|esbuild|rsbuild|next\.js|nuxt|astro|angular|svelte(?:kit)?|remix|gatsby|storybook|expo|metro|react-scripts|ready in)\b|\blocal:",
    )
    .expect("frontend keyword regex is valid")
});

static SERVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:express|fastify|koa|hapi|nestjs|flask|django|fastapi|uvicorn|gunicorn|rails|puma|sinatra|spring|actix|axum|gin|listening|rest|api server)\b",
    )
    .expect("server keyword regex is valid")
});

/// A URL match in the buffer, by byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct UrlMatch {
    pub url: String,
    pub start: usize,
    pub end: usize,
    /// `None` when the explicit port does not fit in a `u16`.
    pub port: Option<u16>,
}

pub(super) fn find_urls(text: &str) -> Vec<UrlMatch> {
    LOCAL_URL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let url = whole.as_str().to_string();
            let port = match caps.get(1) {
                Some(p) => p.as_str().parse::<u16>().ok(),
                None if url.to_ascii_lowercase().starts_with("https") => Some(443),
                None => Some(80),
            };
            Some(UrlMatch {
                url,
                start: whole.start(),
                end: whole.end(),
                port,
            })
        })
        .collect()
}

/// Classify from the text around a match. Frontend evidence wins.
pub(super) fn classify(context: &str) -> Classification {
    if FRONTEND_RE.is_match(context) {
        Classification::Dev
    } else if SERVER_RE.is_match(context) {
        Classification::Api
    } else {
        Classification::Ambiguous
    }
}

/// `text[start..end]` widened by up to `chars` characters on each side.
pub(super) fn context_window(text: &str, start: usize, end: usize, chars: usize) -> &str {
    if chars == 0 {
        return &text[start..end];
    }
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}
