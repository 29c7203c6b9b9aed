//! The API client: request building, token injection, envelope
//! unwrapping, and the retry loop.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use questlog_core::types::DbId;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, FieldErrors};
use crate::retry::RetryConfig;
use crate::types::*;

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Token provider
// ---------------------------------------------------------------------------

/// Async source of bearer tokens.
///
/// The browser shell injects an implementation backed by the identity
/// provider's SDK; tests and tools use [`StaticTokenProvider`]. Returning
/// `None` sends the request unauthenticated (the server answers 401).
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Option<String>;
}

/// A fixed token, for tools and tests.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the questlog API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    retry: RetryConfig,
}

impl ApiClient {
    /// Create a client for the API at `base_url` (e.g.
    /// `https://host/api/v1`).
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            retry: RetryConfig::default(),
        }
    }

    /// Override the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client construction cannot fail");
        self
    }

    // ---- request plumbing ----

    /// Issue a request with retry, returning the unwrapped `data` value.
    ///
    /// `cancel` aborts the in-flight request and any backoff wait.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Value, ApiError> {
        run_with_retry(&self.retry, cancel, |_attempt| {
            Box::pin(self.send_once(method.clone(), path, query, body, cancel))
        })
        .await
    }

    /// One attempt: build, send, classify, unwrap.
    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&Value>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut builder = self
            .http
            .request(method, url)
            .header("accept", "application/json");

        if let Some(token) = self.tokens.access_token().await {
            builder = builder.bearer_auth(token);
        }
        if let Some(query) = query {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let send = builder.send();
        let response = match cancel {
            Some(cancel) => {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                    result = send => result,
                }
            }
            None => send.await,
        }
        .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(classify_reqwest_error)?;
        let body = if bytes.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice::<Value>(&bytes)
                    .map_err(|e| ApiError::Decode(e.to_string()))?,
            )
        };

        unwrap_envelope(status, body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path, None, None, None).await?;
        decode(value)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        let value = self
            .request(Method::POST, path, None, Some(&body), None)
            .await?;
        decode(value)
    }

    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        let value = self
            .request(Method::PUT, path, None, Some(&body), None)
            .await?;
        decode(value)
    }

    async fn delete_path(&self, path: &str) -> Result<(), ApiError> {
        self.request(Method::DELETE, path, None, None, None).await?;
        Ok(())
    }

    /// Send a multipart form (e.g. an asset upload).
    ///
    /// Multipart bodies are not replayable, so this path never retries.
    pub async fn post_form(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut builder = self
            .http
            .post(url)
            .header("accept", "application/json")
            .multipart(form);

        if let Some(token) = self.tokens.access_token().await {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(classify_reqwest_error)?;
        let body = if bytes.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice::<Value>(&bytes)
                    .map_err(|e| ApiError::Decode(e.to_string()))?,
            )
        };
        unwrap_envelope(status, body)
    }

    // ---- auth ----

    /// GET /auth/me
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get_json("auth/me").await
    }

    // ---- campaigns ----

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        self.get_json("campaigns").await
    }

    pub async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Campaign, ApiError> {
        self.post_json("campaigns", draft).await
    }

    pub async fn get_campaign(&self, id: DbId) -> Result<Campaign, ApiError> {
        self.get_json(&format!("campaigns/{id}")).await
    }

    pub async fn update_campaign(
        &self,
        id: DbId,
        draft: &CampaignDraft,
    ) -> Result<Campaign, ApiError> {
        self.put_json(&format!("campaigns/{id}"), draft).await
    }

    pub async fn delete_campaign(&self, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{id}")).await
    }

    // ---- characters ----

    pub async fn list_characters(&self, campaign_id: DbId) -> Result<Vec<Character>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/characters")).await
    }

    pub async fn create_character(
        &self,
        campaign_id: DbId,
        draft: &CharacterDraft,
    ) -> Result<Character, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/characters"), draft)
            .await
    }

    pub async fn get_character(
        &self,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Character, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/characters/{id}")).await
    }

    pub async fn update_character(
        &self,
        campaign_id: DbId,
        id: DbId,
        draft: &CharacterDraft,
    ) -> Result<Character, ApiError> {
        self.put_json(&format!("campaigns/{campaign_id}/characters/{id}"), draft)
            .await
    }

    pub async fn delete_character(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/characters/{id}")).await
    }

    pub async fn character_relationships(
        &self,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<Vec<Relationship>, ApiError> {
        self.get_json(&format!(
            "campaigns/{campaign_id}/characters/{id}/relationships"
        ))
        .await
    }

    // ---- locations ----

    pub async fn list_locations(&self, campaign_id: DbId) -> Result<Vec<Location>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/locations")).await
    }

    pub async fn create_location(
        &self,
        campaign_id: DbId,
        draft: &LocationDraft,
    ) -> Result<Location, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/locations"), draft)
            .await
    }

    pub async fn update_location(
        &self,
        campaign_id: DbId,
        id: DbId,
        draft: &LocationDraft,
    ) -> Result<Location, ApiError> {
        self.put_json(&format!("campaigns/{campaign_id}/locations/{id}"), draft)
            .await
    }

    pub async fn delete_location(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/locations/{id}")).await
    }

    // ---- items ----

    pub async fn list_items(&self, campaign_id: DbId) -> Result<Vec<Item>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/items")).await
    }

    pub async fn create_item(
        &self,
        campaign_id: DbId,
        draft: &ItemDraft,
    ) -> Result<Item, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/items"), draft).await
    }

    pub async fn update_item(
        &self,
        campaign_id: DbId,
        id: DbId,
        draft: &ItemDraft,
    ) -> Result<Item, ApiError> {
        self.put_json(&format!("campaigns/{campaign_id}/items/{id}"), draft)
            .await
    }

    pub async fn delete_item(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/items/{id}")).await
    }

    // ---- notes ----

    pub async fn list_notes(&self, campaign_id: DbId) -> Result<Vec<Note>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/notes")).await
    }

    pub async fn create_note(
        &self,
        campaign_id: DbId,
        draft: &NoteDraft,
    ) -> Result<Note, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/notes"), draft).await
    }

    pub async fn update_note(
        &self,
        campaign_id: DbId,
        id: DbId,
        draft: &NoteDraft,
    ) -> Result<Note, ApiError> {
        self.put_json(&format!("campaigns/{campaign_id}/notes/{id}"), draft)
            .await
    }

    pub async fn delete_note(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/notes/{id}")).await
    }

    // ---- relationships ----

    pub async fn list_relationships(
        &self,
        campaign_id: DbId,
    ) -> Result<Vec<Relationship>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/relationships")).await
    }

    pub async fn create_relationship(
        &self,
        campaign_id: DbId,
        draft: &RelationshipDraft,
    ) -> Result<Relationship, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/relationships"), draft)
            .await
    }

    pub async fn delete_relationship(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/relationships/{id}"))
            .await
    }

    // ---- timeline events ----

    pub async fn list_timeline_events(
        &self,
        campaign_id: DbId,
    ) -> Result<Vec<TimelineEvent>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/timeline-events")).await
    }

    pub async fn create_timeline_event(
        &self,
        campaign_id: DbId,
        draft: &TimelineEventDraft,
    ) -> Result<TimelineEvent, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/timeline-events"), draft)
            .await
    }

    pub async fn update_timeline_event(
        &self,
        campaign_id: DbId,
        id: DbId,
        draft: &TimelineEventDraft,
    ) -> Result<TimelineEvent, ApiError> {
        self.put_json(
            &format!("campaigns/{campaign_id}/timeline-events/{id}"),
            draft,
        )
        .await
    }

    pub async fn delete_timeline_event(
        &self,
        campaign_id: DbId,
        id: DbId,
    ) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/timeline-events/{id}"))
            .await
    }

    // ---- quests ----

    pub async fn list_quests(&self, campaign_id: DbId) -> Result<Vec<Quest>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/quests")).await
    }

    pub async fn create_quest(
        &self,
        campaign_id: DbId,
        draft: &QuestDraft,
    ) -> Result<Quest, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/quests"), draft).await
    }

    pub async fn update_quest(
        &self,
        campaign_id: DbId,
        id: DbId,
        draft: &QuestDraft,
    ) -> Result<Quest, ApiError> {
        self.put_json(&format!("campaigns/{campaign_id}/quests/{id}"), draft)
            .await
    }

    pub async fn delete_quest(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/quests/{id}")).await
    }

    // ---- maps ----

    pub async fn list_maps(&self, campaign_id: DbId) -> Result<Vec<MapRecord>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/maps")).await
    }

    pub async fn create_map(
        &self,
        campaign_id: DbId,
        draft: &MapDraft,
    ) -> Result<MapRecord, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/maps"), draft).await
    }

    pub async fn update_map(
        &self,
        campaign_id: DbId,
        id: DbId,
        draft: &MapDraft,
    ) -> Result<MapRecord, ApiError> {
        self.put_json(&format!("campaigns/{campaign_id}/maps/{id}"), draft)
            .await
    }

    pub async fn delete_map(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/maps/{id}")).await
    }

    // ---- dice rolls ----

    pub async fn list_dice_rolls(&self, campaign_id: DbId) -> Result<Vec<DiceRoll>, ApiError> {
        self.get_json(&format!("campaigns/{campaign_id}/dice-rolls")).await
    }

    pub async fn roll_dice(
        &self,
        campaign_id: DbId,
        draft: &RollDraft,
    ) -> Result<DiceRoll, ApiError> {
        self.post_json(&format!("campaigns/{campaign_id}/dice-rolls/roll"), draft)
            .await
    }

    pub async fn delete_dice_roll(&self, campaign_id: DbId, id: DbId) -> Result<(), ApiError> {
        self.delete_path(&format!("campaigns/{campaign_id}/dice-rolls/{id}")).await
    }

    // ---- search ----

    pub async fn search(
        &self,
        campaign_id: DbId,
        query: &str,
    ) -> Result<SearchResults, ApiError> {
        let value = self
            .request(
                Method::GET,
                &format!("campaigns/{campaign_id}/search"),
                Some(&[("q", query)]),
                None,
                None,
            )
            .await?;
        decode(value)
    }

    pub async fn search_tags(
        &self,
        campaign_id: DbId,
        tag: &str,
    ) -> Result<SearchResults, ApiError> {
        let value = self
            .request(
                Method::GET,
                &format!("campaigns/{campaign_id}/search/tags"),
                Some(&[("tag", tag)]),
                None,
                None,
            )
            .await?;
        decode(value)
    }

    // ---- export / import ----

    /// Export a campaign. `format` is `json` or `csv`; `include` limits
    /// the exported collections.
    pub async fn export_campaign(
        &self,
        campaign_id: DbId,
        format: &str,
        include: Option<&[&str]>,
    ) -> Result<Value, ApiError> {
        let include_joined = include.map(|names| names.join(","));
        let mut query: Vec<(&str, &str)> = vec![("format", format)];
        if let Some(joined) = &include_joined {
            query.push(("include", joined));
        }

        self.request(
            Method::GET,
            &format!("campaigns/{campaign_id}/export"),
            Some(&query),
            None,
            None,
        )
        .await
    }

    pub async fn validate_import(
        &self,
        envelope: &Value,
    ) -> Result<ImportValidationReport, ApiError> {
        self.post_json("campaigns/import/validate", envelope).await
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn classify_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err.to_string())
    }
}

fn encode(body: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Unwrap a response into the `data` payload or a typed error.
///
/// Success bodies carry `{ "data": ... }` (204s have no body at all);
/// error bodies carry `{ "error", "code", "fields"? }`.
fn unwrap_envelope(status: u16, body: Option<Value>) -> Result<Value, ApiError> {
    if (200..300).contains(&status) {
        return Ok(body
            .and_then(|b| b.get("data").cloned())
            .unwrap_or(Value::Null));
    }

    let (message, code, fields) = match &body {
        Some(Value::Object(map)) => {
            let message = map
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("request failed")
                .to_string();
            let code = map
                .get("code")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            let fields: Option<FieldErrors> = map
                .get("fields")
                .and_then(|v| serde_json::from_value(v.clone()).ok());
            (message, code, fields)
        }
        _ => ("request failed".to_string(), None, None),
    };

    Err(ApiError::Api {
        status,
        code,
        message,
        fields,
    })
}

/// Retry loop shared by all JSON requests.
///
/// Attempt `n` failing retryably waits `backoff_delay(n)` and retries,
/// up to `max_attempts` total attempts. Cancellation aborts both the
/// in-flight attempt (inside `op`) and the backoff wait.
pub(crate) async fn run_with_retry<'a, T>(
    retry: &RetryConfig,
    cancel: Option<&CancellationToken>,
    mut op: impl FnMut(u32) -> Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>,
) -> Result<T, ApiError> {
    let mut attempt = 0u32;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt + 1 >= retry.max_attempts.max(1) {
                    return Err(err);
                }

                let delay = retry.backoff_delay(attempt);
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying request",
                );

                match cancel {
                    Some(cancel) => {
                        tokio::select! {
                            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                    None => tokio::time::sleep(delay).await,
                }

                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    fn server_error() -> ApiError {
        ApiError::Api {
            status: 500,
            code: None,
            message: "boom".to_string(),
            fields: None,
        }
    }

    fn not_found() -> ApiError {
        ApiError::Api {
            status: 404,
            code: Some("NOT_FOUND".to_string()),
            message: "missing".to_string(),
            fields: None,
        }
    }

    // -- unwrap_envelope -----------------------------------------------------

    #[test]
    fn success_envelope_is_unwrapped() {
        let value = unwrap_envelope(200, Some(json!({ "data": { "id": 1 } }))).unwrap();
        assert_eq!(value, json!({ "id": 1 }));
    }

    #[test]
    fn empty_204_body_becomes_null() {
        assert_eq!(unwrap_envelope(204, None).unwrap(), Value::Null);
    }

    #[test]
    fn error_envelope_becomes_typed_error() {
        let err = unwrap_envelope(
            422,
            Some(json!({
                "error": "Validation failed",
                "code": "VALIDATION_ERROR",
                "fields": { "name": ["must not be blank"] },
            })),
        )
        .unwrap_err();

        assert_matches!(err, ApiError::Api { status: 422, ref code, ref fields, .. } => {
            assert_eq!(code.as_deref(), Some("VALIDATION_ERROR"));
            assert_eq!(fields.as_ref().unwrap()["name"], vec!["must not be blank"]);
        });
    }

    #[test]
    fn unstructured_error_body_still_yields_status() {
        let err = unwrap_envelope(502, Some(json!("bad gateway"))).unwrap_err();
        assert_matches!(err, ApiError::Api { status: 502, .. });
    }

    // -- run_with_retry ------------------------------------------------------

    #[tokio::test]
    async fn server_errors_are_retried_up_to_the_maximum() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = run_with_retry(&fast_retry(3), None, |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(server_error()) })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn not_found_is_surfaced_without_retry() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = run_with_retry(&fast_retry(3), None, |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(not_found()) })
        })
        .await;

        assert_matches!(result, Err(ApiError::Api { status: 404, .. }));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_after_transient_failure_is_returned() {
        let attempts = AtomicU32::new(0);
        let result = run_with_retry(&fast_retry(3), None, |attempt| {
            attempts.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if attempt == 0 {
                    Err(ApiError::Network("connection reset".into()))
                } else {
                    Ok(42)
                }
            })
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cancellation_stops_the_backoff_wait() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        // First attempt fails retryably; the backoff wait must observe the
        // already-cancelled token and bail out.
        let result: Result<(), _> = run_with_retry(&fast_retry(3), Some(&cancel), |_| {
            Box::pin(async { Err(server_error()) })
        })
        .await;

        assert_matches!(result, Err(ApiError::Cancelled));
    }
}
