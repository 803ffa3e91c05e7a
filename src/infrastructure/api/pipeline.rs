#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use anyhow::Result;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiRequest;
use crate::domain::models::Method;
use crate::domain::models::RequestError;
use crate::domain::models::UNAUTHORIZED;
use crate::domain::services::SessionStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Every call to the Savi API goes through here. Requests pass a pre-send
/// stage (credential, dispatch time), the transport, then a post-receive stage
/// that either hands the body back or normalizes the failure.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Result<ApiClient> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        tracing::debug!(base_url = base_url, "API client ready");

        return Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        });
    }

    pub fn from_config(session: Arc<SessionStore>) -> Result<ApiClient> {
        return ApiClient::new(&Config::get(ConfigKey::ApiURL), session);
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        return &self.session;
    }

    fn url(&self, request: &ApiRequest) -> String {
        return format!("{}{}", self.base_url, request.path);
    }

    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, RequestError> {
        let (request, builder) = self.pre_send(request);
        let outcome = builder.send().await;
        return self.post_receive(&request, outcome).await;
    }

    fn pre_send(&self, mut request: ApiRequest) -> (ApiRequest, reqwest::RequestBuilder) {
        let url = self.url(&request);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };

        // Read at dispatch time so a logout between two calls is honoured.
        if let Some(token) = self.session.credential() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        request.dispatched_at = Some(Instant::now());
        tracing::debug!(
            method = %request.method,
            url = %url,
            query = ?request.query,
            body = ?request.body,
            "HTTP →"
        );

        return (request, builder);
    }

    async fn post_receive<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        outcome: reqwest::Result<reqwest::Response>,
    ) -> Result<T, RequestError> {
        let res = match outcome {
            Ok(res) => res,
            Err(err) => {
                let status = err.status().map(|e| return e.as_u16());
                return Err(self.on_failure(request, status, None, &err.to_string()));
            }
        };

        let status = res.status().as_u16();
        let text = match res.text().await {
            Ok(text) => text,
            Err(err) => {
                return Err(self.on_failure(request, Some(status), None, &err.to_string()));
            }
        };

        if !(200..300).contains(&status) {
            let data = serde_json::from_str::<Value>(&text).ok();
            let transport = format!("Request failed with status code {status}");
            return Err(self.on_failure(request, Some(status), data, &transport));
        }

        tracing::info!(
            status = status,
            method = %request.method,
            url = %self.url(request),
            elapsed_ms = elapsed_ms(request),
            "HTTP ✓"
        );

        let mut payload = text.as_str();
        if payload.trim().is_empty() {
            payload = "null";
        }

        return serde_json::from_str::<T>(payload).map_err(|err| {
            tracing::error!(error = ?err, url = %self.url(request), "Unexpected response body");
            return RequestError::from_parts(
                Some(status),
                serde_json::from_str::<Value>(payload).ok(),
                &format!("Unexpected response from server: {err}"),
            );
        });
    }

    fn on_failure(
        &self,
        request: &ApiRequest,
        status: Option<u16>,
        data: Option<Value>,
        transport: &str,
    ) -> RequestError {
        if status == Some(UNAUTHORIZED) {
            self.session.logout();
        }

        let err = RequestError::from_parts(status, data, transport);
        tracing::warn!(
            status = ?status,
            method = %request.method,
            url = %self.url(request),
            elapsed_ms = elapsed_ms(request),
            reason = %err.message,
            "HTTP ✗"
        );

        return err;
    }
}

fn elapsed_ms(request: &ApiRequest) -> u64 {
    return request
        .dispatched_at
        .map(|e| return e.elapsed().as_millis() as u64)
        .unwrap_or_default();
}
