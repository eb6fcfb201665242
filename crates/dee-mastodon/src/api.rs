//! Thin blocking client for the Mastodon hashtag endpoints.
//!
//! Every call hands back the decoded JSON untouched; turning it into records is the
//! job of [`crate::entities`].

use std::collections::HashSet;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, ACCEPT, LINK};
use reqwest::{Method, StatusCode};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::models::AppError;

const USER_AGENT: &str = concat!("dee-mastodon/", env!("CARGO_PKG_VERSION"), " (https://dee.ink)");
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
// Server-side maximum for followed_tags
const FOLLOWED_TAGS_PAGE_LIMIT: u32 = 200;
const MAX_PAGES: usize = 100;

pub struct MastodonClient {
    base: String,
    token: String,
    http: Client,
}

impl MastodonClient {
    pub fn new(credentials: &Credentials) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::RequestFailed(e.to_string()))?;

        Ok(Self {
            base: credentials.instance.clone(),
            token: credentials.access_token.clone(),
            http,
        })
    }

    /// Collects every page by following `rel="next"` links.
    ///
    /// Stops at the first link already visited or after `MAX_PAGES` pages.
    pub fn followed_tags(&self) -> Result<Value, AppError> {
        let mut url = format!(
            "{}/api/v1/followed_tags?limit={FOLLOWED_TAGS_PAGE_LIMIT}",
            self.base
        );
        let mut visited = HashSet::new();
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            let (page, next) = self.send(Method::GET, &url, None)?;
            pages += 1;
            visited.insert(url);
            match page {
                Value::Array(page_items) => items.extend(page_items),
                // Leave shape errors to the mapper.
                other => return Ok(other),
            }

            match next {
                Some(next) if pages >= MAX_PAGES => {
                    warn!(pages, next = %next, "page limit reached, ignoring further pages");
                    break;
                }
                Some(next) if !visited.contains(&next) => {
                    debug!(page = pages, next = %next, "following pagination link");
                    url = next;
                }
                Some(next) => {
                    debug!(next = %next, "pagination link already visited");
                    break;
                }
                None => break,
            }
        }

        debug!(pages, count = items.len(), "fetched followed tags");
        Ok(Value::Array(items))
    }

    pub fn tag(&self, name: &str) -> Result<Value, AppError> {
        let url = format!("{}/api/v1/tags/{}", self.base, enc(name));
        self.send(Method::GET, &url, None).map(|(value, _)| value)
    }

    pub fn follow_tag(&self, name: &str) -> Result<Value, AppError> {
        let url = format!("{}/api/v1/tags/{}/follow", self.base, enc(name));
        self.send(Method::POST, &url, None).map(|(value, _)| value)
    }

    pub fn unfollow_tag(&self, name: &str) -> Result<Value, AppError> {
        let url = format!("{}/api/v1/tags/{}/unfollow", self.base, enc(name));
        self.send(Method::POST, &url, None).map(|(value, _)| value)
    }

    pub fn featured_tags(&self) -> Result<Value, AppError> {
        let url = format!("{}/api/v1/featured_tags", self.base);
        self.send(Method::GET, &url, None).map(|(value, _)| value)
    }

    pub fn feature_tag(&self, name: &str) -> Result<Value, AppError> {
        let url = format!("{}/api/v1/featured_tags", self.base);
        let body = json!({ "name": name });
        self.send(Method::POST, &url, Some(&body))
            .map(|(value, _)| value)
    }

    pub fn unfeature_tag(&self, id: &str) -> Result<Value, AppError> {
        let url = format!("{}/api/v1/featured_tags/{}", self.base, enc(id));
        self.send(Method::DELETE, &url, None).map(|(value, _)| value)
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(Value, Option<String>), AppError> {
        debug!(%method, %url, "request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .map_err(|e| AppError::RequestFailed(e.to_string()))?;
        let status = response.status();
        let next = next_link(response.headers());
        let text = response
            .text()
            .map_err(|e| AppError::RequestFailed(e.to_string()))?;

        debug!(status = status.as_u16(), bytes = text.len(), "response");

        if !status.is_success() {
            return Err(error_for_status(status, &text));
        }
        if text.trim().is_empty() {
            return Ok((Value::Object(Map::new()), next));
        }

        let value = serde_json::from_str(&text).map_err(|_| AppError::ParseFailed)?;
        Ok((value, next))
    }
}

fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown API error")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::ApiError(format!("{message} (HTTP {})", status.as_u16())),
    }
}

fn next_link(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(raw)
}

/// Picks the `rel="next"` target out of an RFC 8288 `Link` header.
fn parse_next_link(raw: &str) -> Option<String> {
    raw.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = pieces.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        is_next.then(|| url.to_string())
    })
}

fn enc(input: &str) -> String {
    urlencoding::encode(input).to_string()
}
