//! Thin reqwest wrapper: base URL joining, bearer auth from the session, status
//! mapping and request counters.

use std::time::Instant;

use bytes::Bytes;
use metrics::{counter, histogram};
use reqwest::{Client, Method, RequestBuilder, Url, header, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::application::api::ApiError;
use crate::application::session::SessionStore;
use crate::config::ApiSettings;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, session: SessionStore) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(ApiError::from_transport)?;
        Ok(Self {
            http,
            base: settings.base_url.clone(),
            session,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("quill-cli/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::InvalidUrl(format!("{path}: {err}")))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        let bytes = self.execute(self.http.get(url), "GET", path).await?;
        decode(&bytes)
    }

    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let label = method_label(&method);
        let request = self.http.request(method, self.url(path)?).json(body);
        let bytes = self.execute(request, label, path).await?;
        decode(&bytes)
    }

    /// POST with no body; the response body, if any, is ignored.
    pub async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        let request = self.http.post(self.url(path)?);
        self.execute(request, "POST", path).await.map(drop)
    }

    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let label = method_label(&method);
        let request = self.http.request(method, self.url(path)?).multipart(form);
        let bytes = self.execute(request, label, path).await?;
        decode(&bytes)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(path)?);
        self.execute(request, "DELETE", path).await.map(drop)
    }

    async fn execute(
        &self,
        mut request: RequestBuilder,
        method: &'static str,
        path: &str,
    ) -> Result<Bytes, ApiError> {
        if let Some(token) = self.session.access_token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        counter!("quill_api_requests_total", "method" => method).increment(1);
        debug!(method, path, "sending api request");
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                counter!("quill_api_failures_total", "method" => method).increment(1);
                warn!(method, path, error = %err, "api request failed");
                return Err(ApiError::from_transport(err));
            }
        };

        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        histogram!("quill_api_request_ms", "method" => method)
            .record(started.elapsed().as_secs_f64() * 1000.0);
        if !status.is_success() {
            counter!("quill_api_failures_total", "method" => method).increment(1);
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(method, path, status = status.as_u16(), "api returned error status");
            return Err(ApiError::from_status(status.as_u16(), body));
        }
        Ok(bytes)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::PATCH => "PATCH",
        Method::DELETE => "DELETE",
        _ => "OTHER",
    }
}
