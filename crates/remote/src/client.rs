//! HTTP client for the order service.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use fretdesk_core::OrdreId;
use fretdesk_pricing::{TaxCatalog, TaxDefinition};

use crate::error::RemoteError;
use crate::payload::OrdrePayload;

/// Client for the remote document API and the tax-catalog source.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Create a new order. Never retried internally: the wizard's in-flight
    /// guard owns retry policy, and a blind resend could duplicate an order.
    pub async fn create_ordre(&self, payload: &OrdrePayload) -> Result<OrdreId, RemoteError> {
        let url = format!("{}/api/ordres", self.base_url);
        let resp = self
            .authorize(self.http.post(&url))
            .json(payload)
            .send()
            .await
            .map_err(network_error)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        if (200..300).contains(&status) {
            parse_created_id(&body)
        } else {
            tracing::warn!(status, "order creation refused");
            Err(triage(status, &body))
        }
    }

    /// Update a committed order.
    pub async fn update_ordre(
        &self,
        id: OrdreId,
        payload: &OrdrePayload,
    ) -> Result<(), RemoteError> {
        let url = format!("{}/api/ordres/{id}", self.base_url);
        let resp = self
            .authorize(self.http.put(&url))
            .json(payload)
            .send()
            .await
            .map_err(network_error)?;

        let status = resp.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status, ordre = %id, "order update refused");
        Err(triage(status, &body))
    }

    /// Fetch the session tax catalog, retrying transient failures a bounded
    /// number of times with a doubling delay.
    pub async fn fetch_tax_catalog(&self) -> Result<TaxCatalog, RemoteError> {
        let url = format!("{}/api/taxes", self.base_url);
        let max_retries = 2;
        let mut delay = Duration::from_millis(500);
        let mut attempt = 0;

        loop {
            match self.fetch_tax_catalog_once(&url).await {
                Ok(catalog) => return Ok(catalog),
                Err(err) if err.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt, "tax catalog fetch failed, retrying: {err}");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn fetch_tax_catalog_once(&self, url: &str) -> Result<TaxCatalog, RemoteError> {
        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(network_error)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        if !(200..300).contains(&status) {
            return Err(triage(status, &body));
        }

        let taxes: Vec<TaxDefinition> = serde_json::from_str(&body)
            .map_err(|e| RemoteError::Unexpected(format!("malformed tax catalog: {e}")))?;
        Ok(TaxCatalog::new(taxes))
    }
}

fn network_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Retryable(err.to_string())
}

fn parse_created_id(body: &str) -> Result<OrdreId, RemoteError> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("id")?.as_str()?.parse().ok())
        .ok_or_else(|| {
            RemoteError::Unexpected(format!("creation response without an id: {}", excerpt(body)))
        })
}

/// Classify a non-success response. 422-style bodies become per-field
/// rejections, 5xx is retryable, the rest is surfaced verbatim.
fn triage(status: u16, body: &str) -> RemoteError {
    match status {
        400 | 422 => decode_rejection(body),
        500..=599 => RemoteError::Retryable(format!("server error {status}")),
        _ => RemoteError::Unexpected(format!("status {status}: {}", excerpt(body))),
    }
}

/// Decode a structured validation failure. Field values may be a message or
/// a list of messages; the first of each is kept.
fn decode_rejection(body: &str) -> RemoteError {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return RemoteError::Unexpected(format!("unreadable rejection: {}", excerpt(body)));
    };

    if let Some(errors) = value.get("errors").and_then(Value::as_object) {
        let mut fields = BTreeMap::new();
        for (field, messages) in errors {
            let text = match messages {
                Value::String(s) => s.clone(),
                Value::Array(list) => list
                    .first()
                    .and_then(Value::as_str)
                    .unwrap_or("invalid value")
                    .to_string(),
                other => other.to_string(),
            };
            fields.insert(field.clone(), text);
        }
        let first_message = fields
            .iter()
            .next()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .unwrap_or_else(|| "the order failed remote validation".to_string());
        return RemoteError::Rejected {
            fields,
            first_message,
        };
    }

    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return RemoteError::Rejected {
            fields: BTreeMap::new(),
            first_message: message.to_string(),
        };
    }

    RemoteError::Unexpected(format!("unrecognized rejection: {}", excerpt(body)))
}

fn excerpt(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_422_becomes_a_field_map() {
        let body = r#"{
            "errors": {
                "client_id": "client inconnu",
                "conteneurs": ["au moins un conteneur est requis", "autre"]
            }
        }"#;

        let err = triage(422, body);
        let RemoteError::Rejected {
            fields,
            first_message,
        } = err
        else {
            panic!("expected Rejected, got {err:?}");
        };

        assert_eq!(fields.get("client_id").map(String::as_str), Some("client inconnu"));
        assert_eq!(
            fields.get("conteneurs").map(String::as_str),
            Some("au moins un conteneur est requis")
        );
        assert_eq!(first_message, "client_id: client inconnu");
    }

    #[test]
    fn message_only_rejection_keeps_the_message() {
        let err = triage(400, r#"{"message": "document invalide"}"#);
        assert_eq!(
            err,
            RemoteError::Rejected {
                fields: BTreeMap::new(),
                first_message: "document invalide".to_string(),
            }
        );
    }

    #[test]
    fn server_errors_are_retryable() {
        assert!(triage(500, "boom").is_retryable());
        assert!(triage(503, "").is_retryable());
        assert!(!triage(404, "").is_retryable());
        assert!(!triage(422, "{}").is_retryable());
    }

    #[test]
    fn unreadable_rejection_is_unexpected_not_a_panic() {
        let err = triage(422, "<html>gateway</html>");
        assert!(matches!(err, RemoteError::Unexpected(_)));
    }

    #[test]
    fn created_id_is_parsed_from_the_response() {
        let id = OrdreId::new();
        let body = format!(r#"{{"id": "{id}", "statut": "brouillon"}}"#);
        assert_eq!(parse_created_id(&body).unwrap(), id);

        assert!(parse_created_id(r#"{"statut": "brouillon"}"#).is_err());
        assert!(parse_created_id("not json").is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("https://api.example.test/");
        assert_eq!(client.base_url, "https://api.example.test");
    }

    #[test]
    fn field_message_accessor_reads_the_map() {
        let err = triage(422, r#"{"errors": {"motif_exoneration": "obligatoire"}}"#);
        assert_eq!(err.field_message("motif_exoneration"), Some("obligatoire"));
        assert_eq!(err.field_message("notes"), None);
    }
}
