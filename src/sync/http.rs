use reqwest::{Client, Response, Url};

use super::{ApiError, ListResponse, TodoBackend};
use crate::core::todo::Todo;

/// REST client for the todo service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().build()?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: &str, http: Client) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = check(resp).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl TodoBackend for HttpBackend {
    async fn list(&self) -> Result<ListResponse, ApiError> {
        let url = self.endpoint(&["api", "get-todo"])?;
        log::debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    async fn create(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let url = self.endpoint(&["api", "newtodo"])?;
        log::debug!("POST {}", url);
        let resp = self.http.post(url).json(todo).send().await?;
        decode(resp).await
    }

    async fn update(&self, id: &str, todo: &Todo) -> Result<Todo, ApiError> {
        let url = self.endpoint(&["api", "update-todo", id])?;
        log::debug!("PUT {}", url);
        let resp = self.http.put(url).json(todo).send().await?;
        decode(resp).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "delete-todo", id])?;
        log::debug!("DELETE {}", url);
        let resp = self.http.delete(url).send().await?;
        check(resp).await?;
        Ok(())
    }
}
