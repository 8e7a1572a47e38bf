//! HTTP client for the item endpoints under `/api/v1`.

use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;
use crate::types::{
    DeletedEnvelope, ErrorBody, Item, ItemEnvelope, ItemId, ItemPayload, ItemsEnvelope, Session,
};

/// Calls the API on behalf of whichever [`Session`] is passed in.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// * `base_url` - server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    // -----------------------------------------------------------------------
    // Block-scoped items
    // -----------------------------------------------------------------------

    pub async fn create_item(
        &self,
        session: &Session,
        space: i64,
        block: i64,
        payload: &ItemPayload,
    ) -> Result<Item, ClientError> {
        let path = format!("/space/{space}/block/{block}/item");
        let env: ItemEnvelope = self.send_json(Method::POST, &path, session, payload).await?;
        Ok(env.item)
    }

    pub async fn list_block_items(
        &self,
        session: &Session,
        space: i64,
        block: i64,
    ) -> Result<Vec<Item>, ClientError> {
        let path = format!("/space/{space}/block/{block}/item");
        let env: ItemsEnvelope = self.fetch(self.request(Method::GET, &path, session)).await?;
        Ok(env.items)
    }

    pub async fn get_item(
        &self,
        session: &Session,
        space: i64,
        block: i64,
        id: ItemId,
    ) -> Result<Item, ClientError> {
        let path = format!("/space/{space}/block/{block}/item/{id}");
        let env: ItemEnvelope = self.fetch(self.request(Method::GET, &path, session)).await?;
        Ok(env.item)
    }

    pub async fn update_item(
        &self,
        session: &Session,
        space: i64,
        block: i64,
        id: ItemId,
        payload: &ItemPayload,
    ) -> Result<Item, ClientError> {
        let path = format!("/space/{space}/block/{block}/item/{id}");
        let env: ItemEnvelope = self.send_json(Method::PUT, &path, session, payload).await?;
        Ok(env.item)
    }

    pub async fn delete_item(
        &self,
        session: &Session,
        space: i64,
        block: i64,
        id: ItemId,
    ) -> Result<Item, ClientError> {
        let path = format!("/space/{space}/block/{block}/item/{id}");
        let env: DeletedEnvelope = self.fetch(self.request(Method::DELETE, &path, session)).await?;
        Ok(env.data)
    }

    // -----------------------------------------------------------------------
    // Queries across scopes
    // -----------------------------------------------------------------------

    /// `GET /item`. `sort` is `field` or `-field`.
    pub async fn filter_items(
        &self,
        session: &Session,
        due_date: Option<NaiveDate>,
        sort: Option<&str>,
    ) -> Result<Vec<Item>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(date) = due_date {
            query.push(("dueDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(sort) = sort {
            query.push(("sort", sort.to_string()));
        }
        let req = self.request(Method::GET, "/item", session).query(&query);
        let env: ItemsEnvelope = self.fetch(req).await?;
        Ok(env.items)
    }

    /// `GET /item/label`. The server answers with a bare array here.
    pub async fn items_by_label(
        &self,
        session: &Session,
        name: &str,
        space: Option<i64>,
    ) -> Result<Vec<Item>, ClientError> {
        let mut query = vec![("name", name.to_string())];
        if let Some(space) = space {
            query.push(("space", space.to_string()));
        }
        let req = self.request(Method::GET, "/item/label", session).query(&query);
        self.fetch(req).await
    }

    pub async fn search_items(&self, session: &Session, q: &str) -> Result<Vec<Item>, ClientError> {
        let req = self
            .request(Method::GET, "/item/search", session)
            .query(&[("q", q)]);
        let env: ItemsEnvelope = self.fetch(req).await?;
        Ok(env.items)
    }

    // -----------------------------------------------------------------------
    // Inbox
    // -----------------------------------------------------------------------

    pub async fn create_inbox_item(
        &self,
        session: &Session,
        payload: &ItemPayload,
    ) -> Result<Item, ClientError> {
        let env: ItemEnvelope = self
            .send_json(Method::POST, "/inbox/item", session, payload)
            .await?;
        Ok(env.item)
    }

    pub async fn list_inbox_items(
        &self,
        session: &Session,
        item_type: Option<&str>,
    ) -> Result<Vec<Item>, ClientError> {
        let mut req = self.request(Method::GET, "/inbox/item", session);
        if let Some(t) = item_type {
            req = req.query(&[("type", t)]);
        }
        let env: ItemsEnvelope = self.fetch(req).await?;
        Ok(env.items)
    }

    pub async fn list_overdue_items(&self, session: &Session) -> Result<Vec<Item>, ClientError> {
        let req = self.request(Method::GET, "/inbox/item/overdue", session);
        let env: ItemsEnvelope = self.fetch(req).await?;
        Ok(env.items)
    }

    pub async fn update_inbox_item(
        &self,
        session: &Session,
        id: ItemId,
        payload: &ItemPayload,
    ) -> Result<Item, ClientError> {
        let path = format!("/inbox/item/{id}");
        let env: ItemEnvelope = self.send_json(Method::PUT, &path, session, payload).await?;
        Ok(env.item)
    }

    pub async fn delete_inbox_item(&self, session: &Session, id: ItemId) -> Result<Item, ClientError> {
        let path = format!("/inbox/item/{id}");
        let env: DeletedEnvelope = self.fetch(self.request(Method::DELETE, &path, session)).await?;
        Ok(env.data)
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn request(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.client
            .request(method, format!("{}/api/v1{path}", self.base_url))
            .bearer_auth(&session.token)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: &B,
    ) -> Result<T, ClientError> {
        self.fetch(self.request(method, path, session).json(body)).await
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let response = req.send().await?;
        Self::parse_response(response).await
    }

    /// Decode a 2xx body as `T`, or turn the server's `{error, code}` body
    /// into [`ClientError::Api`].
    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => (body.code, body.error),
                Err(_) => (
                    "HTTP_ERROR".to_string(),
                    String::from_utf8_lossy(&bytes).into_owned(),
                ),
            };
            tracing::debug!(status = status.as_u16(), %code, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
