//! One-shot collection loader.
//!
//! `DataFetcher` issues a single GET per URL identity and exposes the
//! `{data, loading, error}` triple the screen renders from. There is no
//! retry, no cache and no cancellation: an outcome delivered after the URL
//! changed is still applied.

use serde::de::DeserializeOwned;

use crate::client::{check_status, from_json};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Message exposed through `error()` after any failed load.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data";

#[derive(Debug, Clone)]
pub struct DataFetcher<T> {
    url: String,
    issued: bool,
    data: Vec<T>,
    loading: bool,
    error: String,
}

impl<T: DeserializeOwned> DataFetcher<T> {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            issued: false,
            data: Vec::new(),
            loading: true,
            error: String::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Point the fetcher at another resource. Re-arms the load only when the
    /// URL actually differs.
    pub fn set_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if url == self.url {
            return;
        }
        self.url = url;
        self.issued = false;
        self.loading = true;
        self.error.clear();
    }

    /// The GET for the current URL, handed out at most once per URL.
    pub fn begin(&mut self) -> Option<HttpRequest> {
        if self.issued {
            return None;
        }
        self.issued = true;
        Some(HttpRequest {
            method: HttpMethod::Get,
            url: self.url.clone(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Apply the outcome of the request returned by `begin`.
    ///
    /// Returns `true` when fresh data was stored.
    pub fn settle(&mut self, outcome: Result<HttpResponse, ApiError>) -> bool {
        self.loading = false;
        match outcome.and_then(decode) {
            Ok(data) => {
                self.data = data;
                self.error.clear();
                true
            }
            Err(err) => {
                tracing::warn!(url = %self.url, error = %err, "collection load failed");
                self.error = FETCH_ERROR_MESSAGE.to_string();
                false
            }
        }
    }

    /// Run `begin` and `settle` through `transport`. A no-op when the load
    /// for the current URL was already issued.
    pub fn run<X: Transport + ?Sized>(&mut self, transport: &X) -> bool {
        match self.begin() {
            Some(request) => {
                let outcome = transport.execute(&request);
                self.settle(outcome)
            }
            None => false,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Empty string unless the last load failed.
    pub fn error(&self) -> &str {
        &self.error
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, ApiError> {
    check_status(&response)?;
    from_json(&response.body)
}
