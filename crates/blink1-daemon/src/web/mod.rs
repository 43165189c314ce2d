//! HTTP API module.
//!
//! All endpoints answer 200; problems are reported in-band through the
//! `status` field of the JSON body.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::jobs::{self, BlinkParams};
use crate::morse;
use crate::state::AppState;
use blink1_hw::Rgb;

/// Text whose encoding is included in status responses as a sample.
const STATUS_SAMPLE_TEXT: &str = "Hello, world";

/// Default fade/blink time in seconds.
const DEFAULT_TIME_SECS: f64 = 0.1;

/// Default morse unit time in seconds.
const DEFAULT_MORSE_TIME_SECS: f64 = 0.4;

/// Default blink repeat count.
const DEFAULT_REPEATS: u32 = 3;

/// Help page template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

/// Response body for the status and color-command endpoints.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommandResponse {
    blink1_connected: bool,
    blink1_serials: Vec<String>,
    last_color: String,
    last_time: f64,
    last_ledn: u8,
    last_repeats: u32,
    cmd: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    status: String,
}

impl CommandResponse {
    fn new(state: &AppState, cmd: &'static str, status: String) -> Self {
        let session = state.session();
        Self {
            blink1_connected: state.is_connected(),
            blink1_serials: state.serials(),
            last_color: session.last_color,
            last_time: session.last_time,
            last_ledn: session.last_ledn,
            last_repeats: session.last_repeats,
            cmd,
            code: None,
            status,
        }
    }
}

/// Response body for morse requests.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MorseResponse {
    code: String,
    message: String,
    time: f64,
    blink1_connected: bool,
    blink1_serials: Vec<String>,
}

/// Query parameters for the color-command endpoints.
///
/// Kept as raw strings so malformed values fall back to their defaults
/// instead of rejecting the request.
#[derive(Deserialize)]
struct ColorQuery {
    rgb: Option<String>,
    time: Option<String>,
    ledn: Option<String>,
    repeats: Option<String>,
    count: Option<String>,
}

/// Query parameters for the morse endpoint.
#[derive(Deserialize)]
struct MorseQuery {
    message: Option<String>,
    time: Option<String>,
}

/// Parses an optional query value, falling back when absent or malformed.
fn param_or<T: std::str::FromStr>(value: Option<&str>, default: T) -> T {
    value.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Creates the web router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/blink1", get(info))
        .route("/blink1/fadeToRGB", get(fade_to_rgb))
        .route("/blink1/blink", get(blink))
        .route("/blink1/morse", get(morse_message))
        .with_state(state)
}

/// GET / - Help page
async fn index() -> impl IntoResponse {
    Html(IndexTemplate.render().unwrap())
}

/// GET /blink1 - Reconnect probe plus status snapshot
async fn info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.try_connect();
    let mut response = CommandResponse::new(&state, "info", "success".to_string());
    response.code = Some(morse::encode(STATUS_SAMPLE_TEXT));
    Json(response)
}

/// GET /blink1/fadeToRGB - Fade one channel to a color
async fn fade_to_rgb(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ColorQuery>,
) -> impl IntoResponse {
    let time = param_or(query.time.as_deref(), DEFAULT_TIME_SECS);
    let ledn = param_or(query.ledn.as_deref(), 0u8);

    let raw = query.rgb.as_deref().unwrap_or_default();
    let status = match raw.parse::<Rgb>() {
        Ok(color) => {
            state.record_fade(&color, time, ledn);
            state.fade((time * 1000.0) as u64, color, ledn).to_string()
        }
        Err(_) => format!("bad hex color specified {}", raw),
    };
    Json(CommandResponse::new(&state, "fadeToRGB", status))
}

/// GET /blink1/blink - Start a blink job
async fn blink(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ColorQuery>,
) -> impl IntoResponse {
    let time = param_or(query.time.as_deref(), DEFAULT_TIME_SECS);
    let ledn = param_or(query.ledn.as_deref(), 0u8);
    let repeats = query
        .repeats
        .as_deref()
        .and_then(|s| s.parse().ok())
        .or_else(|| query.count.as_deref().and_then(|s| s.parse().ok()))
        .unwrap_or(DEFAULT_REPEATS);

    let raw = query.rgb.as_deref().unwrap_or_default();
    let status = match raw.parse::<Rgb>() {
        Ok(color) => {
            state.record_blink(&color, time, ledn, repeats);
            jobs::spawn_blink(
                state.clone(),
                BlinkParams {
                    color,
                    ledn,
                    repeats,
                    period_ms: (time * 1000.0) as u64,
                },
            );
            "success".to_string()
        }
        Err(_) => format!("bad hex color specified {}", raw),
    };
    Json(CommandResponse::new(&state, "blink1", status))
}

/// GET /blink1/morse - Play a message as morse code on channel 0
async fn morse_message(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MorseQuery>,
) -> impl IntoResponse {
    let message = query
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "sos".to_string());
    let time = param_or(query.time.as_deref(), DEFAULT_MORSE_TIME_SECS);
    let unit_ms = (time * 1000.0) as u64;

    let code = morse::encode(&message);
    for pulse in morse::pulse_schedule(&code, unit_ms) {
        jobs::spawn_blink_after(
            state.clone(),
            Duration::from_millis(pulse.offset_ms),
            BlinkParams {
                color: morse::PULSE_COLOR,
                ledn: 0,
                repeats: 1,
                period_ms: pulse.duration_ms / 2,
            },
        );
    }

    Json(MorseResponse {
        code,
        message,
        time,
        blink1_connected: state.is_connected(),
        blink1_serials: state.serials(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_fallbacks() {
        assert_eq!(param_or::<f64>(None, 0.1), 0.1);
        assert_eq!(param_or(Some("1.5"), 0.1), 1.5);
        assert_eq!(param_or(Some("oops"), 0.1), 0.1);
        assert_eq!(param_or(Some(""), 0.1), 0.1);
        assert_eq!(param_or(Some("0"), 0.1), 0.0);
        assert_eq!(param_or::<u8>(Some("2"), 0), 2);
        assert_eq!(param_or::<u8>(Some("-1"), 0), 0);
    }

    #[test]
    fn test_command_response_wire_fields() {
        let state = AppState::new();
        let mut response = CommandResponse::new(&state, "info", "success".to_string());
        response.code = Some(morse::encode(STATUS_SAMPLE_TEXT));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["blink1Connected"], false);
        assert!(value["blink1Serials"].as_array().unwrap().is_empty());
        assert_eq!(value["lastColor"], "#000000");
        assert_eq!(value["lastTime"], 0.0);
        assert_eq!(value["lastLedn"], 0);
        assert_eq!(value["lastRepeats"], 0);
        assert_eq!(value["cmd"], "info");
        assert_eq!(value["status"], "success");
        // sample encoding exercises the punctuation table
        assert!(value["code"].as_str().unwrap().contains("--..--"));
    }

    #[test]
    fn test_command_response_omits_code_by_default() {
        let state = AppState::new();
        let response = CommandResponse::new(&state, "fadeToRGB", "no blink1".to_string());
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("code").is_none());
        assert_eq!(value["cmd"], "fadeToRGB");
        assert_eq!(value["status"], "no blink1");
    }

    #[test]
    fn test_morse_response_wire_fields() {
        let response = MorseResponse {
            code: morse::encode("sos"),
            message: "sos".to_string(),
            time: 0.4,
            blink1_connected: false,
            blink1_serials: Vec::new(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["code"], "... --- ...");
        assert_eq!(value["message"], "sos");
        assert_eq!(value["time"], 0.4);
        assert_eq!(value["blink1Connected"], false);
        assert!(value.get("cmd").is_none());
    }

    #[test]
    fn test_index_lists_routes() {
        let html = IndexTemplate.render().unwrap();
        assert!(html.contains("/blink1/fadeToRGB"));
        assert!(html.contains("/blink1/blink"));
        assert!(html.contains("/blink1/morse"));
    }
}
