//! Leaderboard domain — a thin Supabase REST client.
//!
//! Configuration comes entirely from the environment; with no URL or key
//! present every call fails fast with a "not configured" error and no
//! network traffic happens at all. Submissions and fetches run against
//! the PostgREST endpoint (`/rest/v1/{table}`) with the anon key in both
//! the `apikey` and `Authorization` headers.

use crate::shared::*;
use bevy::prelude::*;
use serde::Deserialize;
use std::time::Duration;

const ENV_URL: &str = "SUPABASE_URL";
const ENV_KEY: &str = "SUPABASE_KEY";
const ENV_TABLE: &str = "SUPABASE_LEADERBOARD_TABLE";
const DEFAULT_TABLE: &str = "leaderboard";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const NOT_CONFIGURED: &str = "Leaderboard not configured (set SUPABASE_URL and SUPABASE_KEY).";

// ═════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    pub url: String,
    pub key: String,
    pub table: String,
}

impl LeaderboardConfig {
    /// Read configuration from the environment. `None` when either the
    /// URL or the key is missing or empty.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(ENV_URL).unwrap_or_default();
        let key = std::env::var(ENV_KEY).unwrap_or_default();
        if url.trim().is_empty() || key.trim().is_empty() {
            return None;
        }
        let table = std::env::var(ENV_TABLE)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            key,
            table,
        })
    }
}

/// Best-effort local username for submissions.
pub fn default_username() -> String {
    if let Ok(user) = std::env::var("USER") {
        if !user.is_empty() {
            return user;
        }
    }
    if let Ok(user) = std::env::var("USERNAME") {
        if !user.is_empty() {
            return user;
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if let Some(leaf) = std::path::Path::new(&home).file_name() {
            return leaf.to_string_lossy().into_owned();
        }
    }
    "flesh".to_string()
}

// ═════════════════════════════════════════════════════════════════════════════
// CLIENT
// ═════════════════════════════════════════════════════════════════════════════

/// One row of the leaderboard table. Servers in the wild differ on the
/// score column name, so `flesh` is accepted as an alias.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeaderboardRow {
    pub username: Option<String>,
    #[serde(alias = "flesh")]
    pub flesh_amount: Option<f64>,
    pub created_at: Option<String>,
    pub last_update: Option<String>,
}

#[derive(Resource)]
pub struct LeaderboardClient {
    config: Option<LeaderboardConfig>,
    http: Option<reqwest::blocking::Client>,
}

impl Default for LeaderboardClient {
    fn default() -> Self {
        Self::new(LeaderboardConfig::from_env())
    }
}

impl LeaderboardClient {
    pub fn new(config: Option<LeaderboardConfig>) -> Self {
        let http = config.as_ref().and_then(|_| {
            reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .ok()
        });
        Self { config, http }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some() && self.http.is_some()
    }

    fn endpoint(&self) -> Result<(&LeaderboardConfig, &reqwest::blocking::Client, String), String> {
        match (&self.config, &self.http) {
            (Some(config), Some(http)) => {
                let url = format!("{}/rest/v1/{}", config.url, config.table);
                Ok((config, http, url))
            }
            _ => Err(NOT_CONFIGURED.to_string()),
        }
    }

    /// Insert a score row and return the representation the server sends
    /// back. The score column is integer-typed server-side.
    pub fn submit(&self, username: &str, flesh_amount: i64) -> Result<serde_json::Value, String> {
        let (config, http, url) = self.endpoint()?;

        let response = http
            .post(&url)
            .header("apikey", &config.key)
            .header("Authorization", format!("Bearer {}", config.key))
            .header("Prefer", "return=representation")
            .json(&submission_body(username, flesh_amount))
            .send()
            .map_err(|e| format!("Request error: {e}"))?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|e| format!("Request error: {e}"))?;
        parse_submit_response(status, &text)
    }

    /// Fetch every row, highest score first.
    pub fn fetch_all(&self) -> Result<Vec<LeaderboardRow>, String> {
        let (config, http, url) = self.endpoint()?;

        let response = http
            .get(&url)
            .query(&[("select", "*"), ("order", "flesh_amount.desc")])
            .header("apikey", &config.key)
            .header("Authorization", format!("Bearer {}", config.key))
            .send()
            .map_err(|e| format!("Request error: {e}"))?;

        let status = response.status().as_u16();
        let text = response.text().map_err(|e| format!("Request error: {e}"))?;
        parse_fetch_response(status, &text)
    }
}

/// A fractional balance truncates to the integer score column.
pub fn submission_score(flesh: f64) -> i64 {
    flesh as i64
}

fn submission_body(username: &str, flesh_amount: i64) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "flesh_amount": flesh_amount,
    })
}

fn error_snippet(status: u16, body: &str) -> String {
    let snippet: String = body.chars().take(200).collect();
    format!("HTTP {status}: {snippet}")
}

/// Submits succeed on exactly 200 or 201 (plain insert vs. representation
/// echo); anything else is a failure with a body snippet.
fn parse_submit_response(status: u16, body: &str) -> Result<serde_json::Value, String> {
    if !matches!(status, 200 | 201) {
        return Err(error_snippet(status, body));
    }
    serde_json::from_str(body).map_err(|e| format!("JSON decode error: {e}"))
}

/// Fetches require a 200 and an array body.
fn parse_fetch_response(status: u16, body: &str) -> Result<Vec<LeaderboardRow>, String> {
    if status != 200 {
        return Err(error_snippet(status, body));
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| format!("JSON decode error: {e}"))?;
    if !value.is_array() {
        return Err("Unexpected response format".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("JSON decode error: {e}"))
}

// ═════════════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone, Default)]
pub struct LeaderboardSubmitEvent {
    /// Overrides the detected local username when set.
    pub username: Option<String>,
}

#[derive(Event, Debug, Clone, Default)]
pub struct LeaderboardRefreshEvent;

/// Last fetched rows plus a human-readable status line.
#[derive(Resource, Debug, Clone, Default)]
pub struct LeaderboardView {
    pub rows: Vec<LeaderboardRow>,
    pub status: String,
}

fn handle_submits(
    mut events: EventReader<LeaderboardSubmitEvent>,
    client: Res<LeaderboardClient>,
    state: Res<PlayerState>,
    mut view: ResMut<LeaderboardView>,
    mut refresh: EventWriter<LeaderboardRefreshEvent>,
) {
    for event in events.read() {
        let username = event
            .username
            .clone()
            .unwrap_or_else(default_username);
        let score = submission_score(state.flesh);
        match client.submit(&username, score) {
            Ok(_) => {
                info!("[Leaderboard] Submitted {score} flesh as {username}.");
                view.status = format!("Submitted as {username}.");
                refresh.send_default();
            }
            Err(e) => {
                warn!("[Leaderboard] Submit failed: {e}");
                view.status = e;
            }
        }
    }
}

fn handle_refreshes(
    mut events: EventReader<LeaderboardRefreshEvent>,
    client: Res<LeaderboardClient>,
    mut view: ResMut<LeaderboardView>,
) {
    if events.read().next().is_none() {
        return;
    }
    match client.fetch_all() {
        Ok(rows) => {
            info!("[Leaderboard] Fetched {} row(s).", rows.len());
            view.status = format!("{} entries.", rows.len());
            view.rows = rows;
        }
        Err(e) => {
            warn!("[Leaderboard] Fetch failed: {e}");
            view.status = e;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct LeaderboardPlugin;

impl Plugin for LeaderboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LeaderboardClient>()
            .init_resource::<LeaderboardView>();

        app.add_event::<LeaderboardSubmitEvent>()
            .add_event::<LeaderboardRefreshEvent>();

        app.add_systems(
            Update,
            (handle_submits, handle_refreshes)
                .chain()
                .in_set(GameSet::Mutate)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// TESTS
// ═════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_client_fails_fast() {
        let client = LeaderboardClient::new(None);
        assert!(!client.is_configured());

        let err = client.submit("tester", 100).unwrap_err();
        assert!(err.contains("not configured"));

        let err = client.fetch_all().unwrap_err();
        assert!(err.contains("not configured"));
    }

    #[test]
    fn config_trims_trailing_slash() {
        let config = LeaderboardConfig {
            url: "https://example.supabase.co".into(),
            key: "anon".into(),
            table: "leaderboard".into(),
        };
        let client = LeaderboardClient::new(Some(config));
        assert!(client.is_configured());
        let (_, _, url) = client.endpoint().unwrap();
        assert_eq!(url, "https://example.supabase.co/rest/v1/leaderboard");
    }

    #[test]
    fn row_accepts_score_alias() {
        let row: LeaderboardRow =
            serde_json::from_str(r#"{"username": "a", "flesh": 12.0}"#).unwrap();
        assert_eq!(row.flesh_amount, Some(12.0));

        let row: LeaderboardRow =
            serde_json::from_str(r#"{"username": "b", "flesh_amount": 7.5}"#).unwrap();
        assert_eq!(row.flesh_amount, Some(7.5));
    }

    #[test]
    fn default_username_is_never_empty() {
        assert!(!default_username().is_empty());
    }

    #[test]
    fn submission_score_truncates_fractions() {
        assert_eq!(submission_score(12.5), 12);
        assert_eq!(submission_score(0.999), 0);
        assert_eq!(submission_score(1000.0), 1000);
    }

    #[test]
    fn submission_body_carries_an_integral_score() {
        let body = submission_body("tester", submission_score(12.5));
        assert_eq!(body["username"], "tester");
        assert_eq!(body["flesh_amount"], serde_json::json!(12));
        assert!(body["flesh_amount"].is_i64());
        assert_eq!(body.to_string(), r#"{"flesh_amount":12,"username":"tester"}"#);
    }

    #[test]
    fn submit_accepts_exactly_200_and_201() {
        assert!(parse_submit_response(200, "[]").is_ok());
        assert!(parse_submit_response(201, "[]").is_ok());

        let err = parse_submit_response(204, "").unwrap_err();
        assert!(err.starts_with("HTTP 204:"), "2xx outside the pair must fail: {err}");

        let long_body = "x".repeat(500);
        let err = parse_submit_response(409, &long_body).unwrap_err();
        assert_eq!(err.len(), "HTTP 409: ".len() + 200);
    }

    #[test]
    fn fetch_requires_a_200_array() {
        assert_eq!(parse_fetch_response(200, "[]").unwrap().len(), 0);

        let rows = parse_fetch_response(200, r#"[{"username": "a", "flesh_amount": 3}]"#).unwrap();
        assert_eq!(rows[0].flesh_amount, Some(3.0));

        let err = parse_fetch_response(200, r#"{"message": "ok"}"#).unwrap_err();
        assert_eq!(err, "Unexpected response format");

        let err = parse_fetch_response(201, "[]").unwrap_err();
        assert!(err.starts_with("HTTP 201:"));
    }
}
