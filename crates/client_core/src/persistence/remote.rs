use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use shared::{
    domain::{decode_swimmers, DecodedSwimmers, Swimmer, SwimmerId},
    error::{ApiError, ApiException},
    protocol::{
        swimmer_decrement_route, swimmer_increment_route, swimmer_reset_route, swimmer_route,
        CreateSwimmerRequest, SWIMMERS_ROUTE,
    },
};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use super::{Change, Committed, Persistence};
use crate::error::StoreError;

/// Binds the store to the REST server, which owns ids and lap arithmetic.
///
/// Requests touching the same swimmer are issued one at a time, so rapid
/// repeated taps reach the server in the order they were made.
pub struct RemoteApi {
    http: Client,
    server_url: String,
    in_flight: Mutex<HashMap<SwimmerId, Arc<Mutex<()>>>>,
}

impl RemoteApi {
    pub fn new(server_url: &str) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, StoreError> {
        let parsed = Url::parse(server_url).map_err(|e| {
            StoreError::Validation(format!("invalid server url '{server_url}': {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::Validation(format!(
                "unsupported server url scheme '{}'",
                parsed.scheme()
            )));
        }

        Ok(Self {
            http,
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Number of swimmers with a request in flight or waiting behind one.
    pub async fn in_flight(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.server_url)
    }

    async fn swimmer_lock(&self, id: SwimmerId) -> Arc<Mutex<()>> {
        let mut locks = self.in_flight.lock().await;
        locks.entry(id).or_default().clone()
    }

    async fn prune_locks(&self) {
        let mut locks = self.in_flight.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    async fn send(&self, change: &Change) -> Result<Committed, StoreError> {
        match change {
            Change::Added(swimmer) => {
                let response = self
                    .http
                    .post(self.url(SWIMMERS_ROUTE))
                    .json(&CreateSwimmerRequest::named(swimmer.name.clone()))
                    .send()
                    .await?;
                let record: Swimmer = expect_success(response).await?.json().await?;
                debug!(
                    provisional_id = swimmer.id.0,
                    swimmer_id = record.id.0,
                    "server assigned swimmer id"
                );
                Ok(Committed::Record(record))
            }
            Change::Removed(id) => {
                let response = self.http.delete(self.url(&swimmer_route(*id))).send().await?;
                if response.status() == StatusCode::NOT_FOUND {
                    return Ok(Committed::Gone);
                }
                expect_success(response).await?;
                Ok(Committed::Accepted)
            }
            Change::Incremented(id) => self.post_for_record(&swimmer_increment_route(*id)).await,
            Change::Decremented(id) => self.post_for_record(&swimmer_decrement_route(*id)).await,
            Change::Reset(id) => self.post_for_record(&swimmer_reset_route(*id)).await,
        }
    }

    async fn post_for_record(&self, route: &str) -> Result<Committed, StoreError> {
        let response = self.http.post(self.url(route)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Committed::Gone);
        }
        let record: Swimmer = expect_success(response).await?.json().await?;
        Ok(Committed::Record(record))
    }
}

#[async_trait]
impl Persistence for RemoteApi {
    async fn load(&self) -> Result<DecodedSwimmers, StoreError> {
        let response = self.http.get(self.url(SWIMMERS_ROUTE)).send().await?;
        let value: Value = expect_success(response).await?.json().await?;
        Ok(decode_swimmers(&value))
    }

    async fn commit(&self, change: &Change, _swimmers: &[Swimmer]) -> Result<Committed, StoreError> {
        let lock = match change {
            Change::Added(_) => None,
            other => Some(self.swimmer_lock(other.swimmer_id()).await),
        };
        let guard = match &lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let result = self.send(change).await;

        drop(guard);
        drop(lock);
        self.prune_locks().await;
        result
    }
}

async fn expect_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => ApiException::from(api_error).to_string(),
        Err(_) => body,
    };
    warn!(%status, %detail, "swimmer request rejected");
    Err(StoreError::persistence(format!(
        "server responded {status}: {detail}"
    )))
}
