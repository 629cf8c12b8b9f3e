use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    admitted: u32,
}

/// Fixed one-second admission window shared by every route it wraps.
#[derive(Clone, Debug)]
pub struct TurnLimiter {
    per_second: u32,
    window: Arc<Mutex<Window>>,
}

impl TurnLimiter {
    pub fn new(per_second: u32) -> Self {
        Self {
            per_second: per_second.max(1),
            window: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                admitted: 0,
            })),
        }
    }

    fn admit(&self) -> bool {
        let mut window = self.window.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Rate limiter lock poisoned, recovering window state");
            self.window.clear_poison();
            poisoned.into_inner()
        });
        let now = Instant::now();
        if now.duration_since(window.opened_at) >= WINDOW {
            window.opened_at = now;
            window.admitted = 0;
        }
        if window.admitted >= self.per_second {
            return false;
        }
        window.admitted += 1;
        true
    }
}

pub async fn limit_requests(
    State(limiter): State<TurnLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !limiter.admit() {
        tracing::warn!(path = %req.uri().path(), "Request rejected by rate limiter");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "1")],
            Json(json!({ "error": "rate_limit_exceeded", "retryable": true })),
        )
            .into_response();
    }
    next.run(req).await
}
