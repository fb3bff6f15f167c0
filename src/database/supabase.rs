use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::config::DatabaseConfig;

use super::error::StoreError;
use super::filter::Filter;
use super::models::{DocumentFilter, DocumentPatch, DocumentRecord, NewDocument, NewUser, UserRecord};
use super::repository::{DocumentRepository, UserRepository};

const USERS_TABLE: &str = "users";
const DOCUMENTS_TABLE: &str = "documents";

/// Thin client for a Supabase project's PostgREST endpoint.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    rest_url: Url,
}

impl SupabaseClient {
    pub fn new(project_url: &str, api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base = Url::parse(project_url).map_err(|e| StoreError::Unavailable(format!("invalid project url: {}", e)))?;
        // `join` drops the last path segment unless the base ends with a slash
        let base = if base.path().ends_with('/') {
            base
        } else {
            Url::parse(&format!("{}/", base)).map_err(|e| StoreError::Unavailable(e.to_string()))?
        };
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key).map_err(|_| StoreError::Unavailable("invalid api key".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| StoreError::Unavailable("invalid api key".to_string()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { http, rest_url })
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config
            .supabase_url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("SUPABASE_URL is not configured".to_string()))?;
        let key = config
            .supabase_key
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("SUPABASE_KEY is not configured".to_string()))?;
        Self::new(url, key, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn table<T>(&self, name: &'static str) -> Table<'_, T> {
        Table {
            client: self,
            name,
            _phantom: PhantomData,
        }
    }

    fn table_url(&self, name: &str) -> Result<Url, StoreError> {
        self.rest_url
            .join(name)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Cheap reachability probe against the REST root.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        let response = self.http.get(self.rest_url.clone()).send().await?;
        check_status(response).await.map(|_| ())
    }
}

/// Typed access to one PostgREST table.
pub struct Table<'a, T> {
    client: &'a SupabaseClient,
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<'a, T> Table<'a, T>
where
    T: DeserializeOwned,
{
    pub async fn select(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let request = self.client.http.get(self.url()?).query(&filter.to_query());
        self.execute(request).await
    }

    pub async fn select_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        let mut query = filter.to_query();
        query.push(("limit".to_string(), "1".to_string()));
        let request = self.client.http.get(self.url()?).query(&query);
        Ok(self.execute(request).await?.into_iter().next())
    }

    pub async fn insert<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<T>, StoreError> {
        let request = self
            .client
            .http
            .post(self.url()?)
            .header("Prefer", "return=representation")
            .json(body);
        self.execute(request).await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, filter: &Filter, body: &B) -> Result<Vec<T>, StoreError> {
        let request = self
            .client
            .http
            .patch(self.url()?)
            .query(&filter.to_query())
            .header("Prefer", "return=representation")
            .json(body);
        self.execute(request).await
    }

    pub async fn delete(&self, filter: &Filter) -> Result<(), StoreError> {
        if filter.is_empty() {
            // PostgREST would delete every row
            return Err(StoreError::Remote {
                status: 400,
                message: format!("refusing unfiltered delete on {}", self.name),
            });
        }
        let request = self
            .client
            .http
            .delete(self.url()?)
            .query(&filter.to_query())
            .header("Prefer", "return=minimal");
        let response = request.send().await?;
        check_status(response).await.map(|_| ())
    }

    fn url(&self) -> Result<Url, StoreError> {
        self.client.table_url(self.name)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<T>, StoreError> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        let rows = response.json::<Vec<T>>().await.map_err(|e| StoreError::Decode(e.to_string()))?;
        debug!(table = self.name, rows = rows.len(), "database call completed");
        Ok(rows)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Repository implementation backed by the Supabase `users` and `documents` tables.
#[derive(Clone)]
pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for SupabaseStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let filter = Filter::new().eq("email", email)?;
        self.client.table::<UserRecord>(USERS_TABLE).select_one(&filter).await
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        self.client
            .table::<UserRecord>(USERS_TABLE)
            .insert(&user)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::EmptyResult("create user"))
    }
}

#[async_trait]
impl DocumentRepository for SupabaseStore {
    async fn insert(&self, document: NewDocument) -> Result<DocumentRecord, StoreError> {
        self.client
            .table::<DocumentRecord>(DOCUMENTS_TABLE)
            .insert(&document)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::EmptyResult("create document"))
    }

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<DocumentRecord>, StoreError> {
        let filter = Filter::try_from(filter)?;
        self.client.table::<DocumentRecord>(DOCUMENTS_TABLE).select(&filter).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>, StoreError> {
        self.client
            .table::<DocumentRecord>(DOCUMENTS_TABLE)
            .select_one(&Filter::by_id(id))
            .await
    }

    async fn update(&self, id: Uuid, patch: &DocumentPatch) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self
            .client
            .table::<DocumentRecord>(DOCUMENTS_TABLE)
            .update(&Filter::by_id(id), patch)
            .await?
            .into_iter()
            .next())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.client
            .table::<DocumentRecord>(DOCUMENTS_TABLE)
            .delete(&Filter::by_id(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url_is_derived_from_project_url() {
        let client = SupabaseClient::new("https://abc.supabase.co", "key", Duration::from_secs(1)).unwrap();
        assert_eq!(client.table_url("documents").unwrap().as_str(), "https://abc.supabase.co/rest/v1/documents");

        let client = SupabaseClient::new("https://abc.supabase.co/", "key", Duration::from_secs(1)).unwrap();
        assert_eq!(client.table_url("users").unwrap().as_str(), "https://abc.supabase.co/rest/v1/users");
    }

    #[test]
    fn test_rejects_invalid_project_url() {
        assert!(SupabaseClient::new("not a url", "key", Duration::from_secs(1)).is_err());
    }
}
