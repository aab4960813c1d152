//! Typed HTTP client for the CRUD API, used by the list pages.

use crate::error::ErrorBody;
use crate::resource::Resource;
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{status} {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl ClientError {
    /// HTTP status of an API error; `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// CRUD calls for one resource.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R::Record>, ClientError>;
    async fn get(&self, id: i64) -> Result<R::Record, ClientError>;
    async fn create(&self, input: &R::Input) -> Result<R::Record, ClientError>;
    async fn update(&self, id: i64, input: &R::Input) -> Result<R::Record, ClientError>;
    async fn delete(&self, id: i64) -> Result<(), ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url<R: Resource>(&self) -> String {
        format!("{}/{}", self.base_url, R::PATH)
    }

    fn item_url<R: Resource>(&self, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, R::PATH, id)
    }
}

/// Decodes a success body, or turns the JSON error body into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check(response).await?;
    Ok(response.json::<T>().await?)
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(api_error(status, &text))
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(b) => ClientError::Api {
            status: status.as_u16(),
            code: b.error.code,
            message: b.error.message,
        },
        Err(_) => ClientError::Api {
            status: status.as_u16(),
            code: "http_error".into(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.to_string()
            },
        },
    }
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for HttpClient {
    async fn list(&self) -> Result<Vec<R::Record>, ClientError> {
        let response = self.http.get(self.collection_url::<R>()).send().await?;
        decode(response).await
    }

    async fn get(&self, id: i64) -> Result<R::Record, ClientError> {
        let response = self.http.get(self.item_url::<R>(id)).send().await?;
        decode(response).await
    }

    async fn create(&self, input: &R::Input) -> Result<R::Record, ClientError> {
        let response = self.http.post(self.collection_url::<R>()).json(input).send().await?;
        decode(response).await
    }

    async fn update(&self, id: i64, input: &R::Input) -> Result<R::Record, ClientError> {
        let response = self.http.put(self.item_url::<R>(id)).json(input).send().await?;
        decode(response).await
    }

    async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let response = self.http.delete(self.item_url::<R>(id)).send().await?;
        check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Animals, Consultations};

    #[test]
    fn urls_join_base_and_path() {
        let client = HttpClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.collection_url::<Animals>(), "http://localhost:3000/animais");
        assert_eq!(client.item_url::<Consultations>(7), "http://localhost:3000/consultas/7");
    }

    #[test]
    fn error_body_is_decoded() {
        let err = api_error(
            StatusCode::CONFLICT,
            r#"{"error":{"code":"conflict","message":"veterinarian 2 is referenced"}}"#,
        );
        match err {
            ClientError::Api { status, code, message } => {
                assert_eq!(status, 409);
                assert_eq!(code, "conflict");
                assert_eq!(message, "veterinarian 2 is referenced");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn plain_error_body_is_kept_as_message() {
        let err = api_error(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded");
        assert_eq!(err.status(), Some(413));
        assert!(err.to_string().contains("length limit exceeded"));
    }
}
