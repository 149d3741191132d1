//! Client side of the recommender HTTP API.
//!
//! Both live endpoints take `{"itemId": "<id>"}` and answer with
//! `{"recommendations": [...]}`. Elements may be any JSON scalar; they are
//! coerced to display strings before reaching the UI.

use crate::config::Config;
use crate::fetch::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// A recommendation producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Collaborative,
    Content,
    /// Reserved for a future model. Has no endpoint and never produces items.
    Azure,
}

impl Source {
    pub const ALL: [Source; 3] = [Self::Collaborative, Self::Content, Self::Azure];

    pub fn key(self) -> &'static str {
        match self {
            Self::Collaborative => "collaborative",
            Self::Content => "content",
            Self::Azure => "azure",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Collaborative => "Collaborative Filtering",
            Self::Content => "Content-Based Filtering",
            Self::Azure => "Azure ML Model",
        }
    }

    /// Path of the endpoint serving this source, relative to the API base URL.
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            Self::Collaborative => Some("/recommend/collaborative"),
            Self::Content => Some("/recommend/content"),
            Self::Azure => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The three result lists shown side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationSet {
    pub collaborative: Vec<String>,
    pub content: Vec<String>,
    pub azure: Vec<String>,
}

impl RecommendationSet {
    pub fn get(&self, source: Source) -> &[String] {
        match source {
            Source::Collaborative => &self.collaborative,
            Source::Content => &self.content,
            Source::Azure => &self.azure,
        }
    }

    pub fn total(&self) -> usize {
        self.collaborative.len() + self.content.len() + self.azure.len()
    }
}

/// Request body shared by both endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest<'a> {
    pub item_id: &'a str,
}

/// Render a JSON value the way a browser's `String(value)` would.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format_js_number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Decimal text inside `[1e-6, 1e21)`, exponent form (`1e+21`, `1.5e-7`)
/// outside it. Negative zero prints as `0`.
fn format_js_number(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let text = format!("{f:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Pull the `recommendations` list out of a decoded response body.
///
/// A body without the field (including the backend's `{"error": ...}` reply)
/// yields an empty list. A field that is present but not a list fails the
/// source.
pub fn items_from_body(source: Source, body: &Value) -> Result<Vec<String>, FetchError> {
    let Some(object) = body.as_object() else {
        return Ok(Vec::new());
    };

    if let Some(error) = object.get("error") {
        tracing::warn!(%source, error = %coerce_to_string(error), "recommender reported an error");
    }

    match object.get("recommendations") {
        None => Ok(Vec::new()),
        Some(value) if is_falsy(value) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().map(coerce_to_string).collect()),
        Some(other) => Err(FetchError::Decode {
            recommender: source,
            reason: format!("`recommendations` is not a list: {other}"),
        }),
    }
}

/// Something that can produce recommendations for an item.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    fn source(&self) -> Source;

    async fn recommend(&self, item_id: &str) -> Result<Vec<String>, FetchError>;
}

/// Build the shared HTTP client. `None` means requests never time out.
pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// A recommender reached over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpRecommender {
    client: Client,
    source: Source,
    url: String,
}

impl HttpRecommender {
    pub fn new(client: Client, source: Source, url: impl Into<String>) -> Self {
        Self {
            client,
            source,
            url: url.into(),
        }
    }

    /// `None` for sources without an endpoint.
    pub fn from_config(client: Client, config: &Config, source: Source) -> Option<Self> {
        config
            .endpoint_url(source)
            .map(|url| Self::new(client, source, url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecommendationSource for HttpRecommender {
    fn source(&self) -> Source {
        self.source
    }

    async fn recommend(&self, item_id: &str) -> Result<Vec<String>, FetchError> {
        tracing::debug!(source = %self.source, url = %self.url, item_id, "requesting recommendations");

        let response = self
            .client
            .post(&self.url)
            .json(&RecommendRequest { item_id })
            .send()
            .await
            .map_err(|e| FetchError::network(self.source, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(source = %self.source, %status, "recommender answered with a non-success status");
        }

        let body: Value = response.json().await.map_err(|e| FetchError::Decode {
            recommender: self.source,
            reason: e.to_string(),
        })?;

        items_from_body(self.source, &body)
    }
}
