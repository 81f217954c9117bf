//! HTTP client implementation

use std::time::Duration;

use apps_api::ErrorResponse;
use reqwest::{header, Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::errors::DeployerError;

/// Default App Platform API endpoint
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// HTTP client for the platform API
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client authenticating with the given API token
    pub fn new(base_url: &str, token: SecretString) -> Result<Self, DeployerError> {
        Url::parse(base_url)
            .map_err(|e| DeployerError::InputError(format!("invalid API URL {base_url:?}: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("app-action/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        self.client.request(method, &url).header(
            header::AUTHORIZATION,
            format!("Bearer {}", self.token.expose_secret()),
        )
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DeployerError> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        decode(response).await
    }

    /// Make a GET request with query parameters
    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, DeployerError> {
        let response = self
            .request(reqwest::Method::GET, path)
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployerError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, DeployerError> {
        let response = self
            .request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    /// Make a DELETE request, discarding the response body
    pub async fn delete(&self, path: &str) -> Result<(), DeployerError> {
        let response = self.request(reqwest::Method::DELETE, path).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DeployerError> {
    let response = check_status(response).await?;
    let body = response.json().await?;
    Ok(body)
}

async fn check_status(response: Response) -> Result<Response, DeployerError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!("HTTP request failed: {} - {}", status, body);
    Err(DeployerError::ApiError {
        status,
        message: error_message(&body),
    })
}

/// Pull the human readable message out of an API error body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => body.trim().to_string(),
    }
}
