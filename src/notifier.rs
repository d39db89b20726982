// src/notifier.rs

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::time::Duration;

// Delivery is a quick collaborator call; anything hung past this is dropped
// and left for the next scheduled pass.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum NotifierError {
    RequestFailed(String),
    ApiError(String),
}

impl fmt::Display for NotifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            NotifierError::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl Error for NotifierError {}

/// Client for the collaborator notification API (email + push delivery).
pub struct Notifier {
    base_url: String,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
struct EmailPayload<'a> {
    email: &'a str,
    subject: &'a str,
    template: &'a str,
    context: &'a Value,
}

#[derive(Serialize)]
struct PushPayload<'a> {
    user_id: i64,
    title: &'a str,
    body: &'a str,
    data: &'a Value,
}

impl Notifier {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    pub fn send_email(
        &self,
        email: &str,
        subject: &str,
        template: &str,
        context: &Value,
    ) -> Result<(), NotifierError> {
        let payload = EmailPayload {
            email,
            subject,
            template,
            context,
        };
        self.post("/notifications/email", &payload)
    }

    pub fn send_push(
        &self,
        user_id: i64,
        title: &str,
        body: &str,
        data: &Value,
    ) -> Result<(), NotifierError> {
        let payload = PushPayload {
            user_id,
            title,
            body,
            data,
        };
        self.post("/notifications/push", &payload)
    }

    fn post<T: Serialize>(&self, path: &str, payload: &T) -> Result<(), NotifierError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let resp = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(DELIVERY_TIMEOUT)
            .json(payload)
            .send()
            .map_err(|e| NotifierError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifierError::ApiError(format!(
                "Failed to deliver notification: {}",
                error_body
            )));
        }

        Ok(())
    }
}
