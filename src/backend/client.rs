//! HTTP client for case backend requests.
//!
//! This module provides a low-level HTTP client wrapper for making requests
//! to the case backend, handling the session cookie jar, CSRF echoing and
//! response parsing.

use super::BackendError;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Makes requests to the backend and tries to conform response data to the
/// requested type.
///
pub struct Client {
    base_url: Url,
    cookies: Arc<Jar>,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL.
    ///
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        // Paths are joined relative to the base, which needs a trailing slash.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|e| BackendError::InvalidBaseUrl(e.to_string()))?;
        let cookies = Arc::new(Jar::default());
        let http_client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .build()?;
        Ok(Client {
            base_url,
            cookies,
            http_client,
        })
    }

    /// Return data for a GET request on the path with optional query params.
    ///
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<Vec<(&str, &str)>>,
    ) -> Result<T, BackendError> {
        let mut request = self.http_client.get(self.url(path)?);
        if let Some(params) = params {
            request = request.query(&params);
        }
        Self::parse(request.send().await?).await
    }

    /// Return data for a POST request with a JSON body.
    ///
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let request = self.http_client.post(self.url(path)?).json(body);
        let request = self.with_csrf(request);
        Self::parse(request.send().await?).await
    }

    /// Return data for a POST request with a multipart body.
    ///
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, BackendError> {
        let request = self.http_client.post(self.url(path)?).multipart(form);
        let request = self.with_csrf(request);
        Self::parse(request.send().await?).await
    }

    /// Returns the CSRF token the backend handed out through its cookie, if any.
    ///
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        let header = header.to_str().ok()?;
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidBaseUrl(e.to_string()))
    }

    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match self.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    /// Check status before trying to deserialize, keeping the body of failed
    /// responses for the error message.
    ///
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            log::error!("API request failed with status {}: {}", status, body);
            return Err(BackendError::from_response(status.as_u16(), &body));
        }
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            log::error!(
                "Failed to deserialize API response: {}. Response body: {}",
                e,
                String::from_utf8_lossy(&bytes)
            );
            BackendError::Deserialization(e)
        })
    }
}
