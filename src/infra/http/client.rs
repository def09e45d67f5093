use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use quire_api_types::ErrorBody;

use crate::cache::lock::{rw_read, rw_write};
use crate::config::ApiSettings;

use super::error::ApiError;

const SOURCE: &str = "infra::http::client";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Query string pairs appended to a request URL.
pub type Query<'a> = &'a [(&'a str, String)];

/// Shared REST client. Clones share the connection pool and the bearer token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(site: &str, token: Option<String>) -> Result<Self, ApiError> {
        Self::with_timeout(site, token, DEFAULT_TIMEOUT)
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::with_timeout(
            settings.base_url.as_str(),
            settings.token.clone(),
            settings.timeout,
        )
    }

    pub fn with_timeout(
        site: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut base = Url::parse(site)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base,
            token: Arc::new(RwLock::new(token)),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("quire/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *rw_write(&self.token, SOURCE, "set_token") = Some(token.into());
    }

    pub fn clear_token(&self) {
        *rw_write(&self.token, SOURCE, "clear_token") = None;
    }

    pub fn token(&self) -> Option<String> {
        rw_read(&self.token, SOURCE, "token").clone()
    }

    pub fn auth_header(&self) -> Result<Option<HeaderValue>, ApiError> {
        self.token()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ApiError::Header(e.to_string()))
            })
            .transpose()
    }

    pub fn url(&self, path: &str, query: Option<Query<'_>>) -> Result<Url, ApiError> {
        let mut url = self.base.join(path)?;
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.set_query(None);
            let mut qp = url.query_pairs_mut();
            for (k, v) in q {
                qp.append_pair(k, v);
            }
        }
        Ok(url)
    }

    fn builder(
        &self,
        method: Method,
        path: &str,
        query: Option<Query<'_>>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path, query)?;
        debug!(%method, %url, "sending api request");
        let mut req = self.client.request(method, url);
        if let Some(header) = self.auth_header()? {
            req = req.header(AUTHORIZATION, header);
        }
        Ok(req)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<Query<'_>>,
    ) -> Result<T, ApiError> {
        let resp = self.builder(Method::GET, path, query)?.send().await?;
        Self::decode(resp).await
    }

    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.builder(method, path, None)?.json(body).send().await?;
        Self::decode(resp).await
    }

    /// Bodiless request whose response carries data (likes, logout, ...).
    pub async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let resp = self.builder(method, path, None)?.send().await?;
        Self::decode(resp).await
    }

    pub async fn send_no_content(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let resp = self.builder(method, path, None)?.send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let resp = self
            .builder(Method::POST, path, None)?
            .multipart(form)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn check(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(%status, error = %err, "failed to read error body");
                Default::default()
            }
        };
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
        Err(ApiError::status(status, message))
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        let resp = Self::check(resp).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
