//! API client for the remote book catalog.
//!
//! The remote store is authoritative: ids are assigned there and every
//! list the client shows eventually comes from `GET /books`.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Book, NewBook};

use super::ApiError;

/// Collection path on the remote store.
const BOOKS_PATH: &str = "books";

/// Operations the loader and mutation handlers need from the remote store.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list_books(&self) -> Result<Vec<Book>, ApiError>;

    async fn create_book(&self, book: &NewBook) -> Result<Book, ApiError>;

    async fn delete_book(&self, id: &str) -> Result<(), ApiError>;
}

/// HTTP client for the catalog.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot carry a path: {}", base_url));
        }

        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// but `.` and `..` are dot segments the URL parser swallows; callers
    /// placing an id go through `record_endpoint`.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of one record. Ids that cannot stand as a single path segment
    /// are refused before any request goes out.
    fn record_endpoint(&self, id: &str) -> Result<Url, ApiError> {
        if matches!(id, "" | "." | "..") {
            return Err(ApiError::InvalidRequest(format!(
                "book id {:?} cannot address a single record",
                id
            )));
        }
        Ok(self.endpoint(&[BOOKS_PATH, id]))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        url: &Url,
    ) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
        })
    }
}

#[async_trait]
impl BookStore for ApiClient {
    async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        let url = self.endpoint(&[BOOKS_PATH]);
        debug!(%url, "GET books");

        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    async fn create_book(&self, book: &NewBook) -> Result<Book, ApiError> {
        let url = self.endpoint(&[BOOKS_PATH]);
        debug!(%url, title = %book.title, "POST book");

        let response = self.client.post(url.clone()).json(book).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, &url).await
    }

    async fn delete_book(&self, id: &str) -> Result<(), ApiError> {
        let url = self.record_endpoint(id)?;
        debug!(%url, "DELETE book");

        let response = self.client.delete(url).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_appends_to_base_path() {
        let client = ApiClient::new("http://example.com/api/").unwrap();
        assert_eq!(
            client.endpoint(&["books"]).as_str(),
            "http://example.com/api/books"
        );

        let client = ApiClient::new("http://example.com").unwrap();
        assert_eq!(
            client.endpoint(&["books", "a/b c"]).as_str(),
            "http://example.com/books/a%2Fb%20c"
        );
    }

    #[test]
    fn test_record_endpoint_rejects_dot_segments() {
        let client = ApiClient::new("http://example.com").unwrap();
        for id in ["", ".", ".."] {
            let err = client.record_endpoint(id).unwrap_err();
            assert!(matches!(err, ApiError::InvalidRequest(_)), "id {id:?}");
        }
        assert_eq!(
            client.record_endpoint("...").unwrap().as_str(),
            "http://example.com/books/..."
        );
    }

    #[tokio::test]
    async fn test_delete_book_with_dot_id_sends_nothing() {
        let server = MockServer::start_async().await;
        let collection = server
            .mock_async(|when, then| {
                when.method(DELETE);
                then.status(204);
            })
            .await;

        let client = ApiClient::new(&server.base_url()).unwrap();
        for id in ["", ".", ".."] {
            assert!(client.delete_book(id).await.is_err());
        }
        collection.assert_hits_async(0).await;
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("mailto:someone@example.com").is_err());
    }

    #[tokio::test]
    async fn test_list_books() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/books");
                then.status(200).json_body(json!([
                    {"id": "1", "title": "A", "author": "X", "year": 2001, "genre": "SF"},
                    {"id": 2, "title": "B", "author": "Y", "year": 2002}
                ]));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).unwrap();
        let books = client.list_books().await.unwrap();

        mock.assert_async().await;
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].id, "2");
        assert_eq!(books[1].genre, "Unknown");
    }

    #[tokio::test]
    async fn test_list_books_invalid_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/books");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let client = ApiClient::new(&server.base_url()).unwrap();
        let err = client.list_books().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_create_book_sends_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/books").json_body(json!({
                    "title": "Dune",
                    "author": "Herbert",
                    "year": 1965,
                    "genre": "Unknown"
                }));
                then.status(201).json_body(json!({
                    "id": "abc",
                    "title": "Dune",
                    "author": "Herbert",
                    "year": 1965,
                    "genre": "Unknown"
                }));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).unwrap();
        let created = client
            .create_book(&NewBook {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                year: 1965,
                genre: "Unknown".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "abc");
    }

    #[tokio::test]
    async fn test_create_book_remote_error_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/books");
                then.status(422).json_body(json!({"message": "duplicate title"}));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).unwrap();
        let err = client
            .create_book(&NewBook {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                year: 1965,
                genre: "SF".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status.as_u16(), 422);
                assert_eq!(message, "duplicate title");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_book() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/books/7");
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/books/8");
                then.status(404).json_body(json!({"message": "no such book"}));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).unwrap();
        client.delete_book("7").await.unwrap();
        ok.assert_async().await;

        let err = client.delete_book("8").await.unwrap_err();
        assert!(err.to_string().contains("no such book"));
    }

    #[tokio::test]
    async fn test_network_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = client.list_books().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
