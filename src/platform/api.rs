// EstateHub - platform/api.rs
//
// Thin async client for the marketplace backend REST API.
//
// The backend owns the contracts; this client only knows the four
// endpoints the front end consumes. There is no retry and no timeout:
// every transport error, non-success status or undecodable body is
// reported as a network failure and the caller keeps its previous state.

use crate::core::model::{ContactRequest, Property, Role, User};
use crate::util::constants::{APP_NAME, APP_VERSION};
use crate::util::error::ApiError;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Body of `POST /users/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Listings plus one buyer's contact requests, fetched together.
#[derive(Debug, Clone)]
pub struct BuyerFeed {
    pub properties: Vec<Property>,
    pub requests: Vec<ContactRequest>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()
            .map_err(|e| ApiError::NetworkFailure {
                endpoint: base_url.clone(),
                source: e,
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and decode a JSON body, mapping every failure.
    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let network = |e| ApiError::NetworkFailure {
            endpoint: endpoint.to_string(),
            source: e,
        };

        let response = request.send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "Backend returned an error status");
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.json::<T>().await.map_err(network)?;
        tracing::debug!(endpoint, "Backend call succeeded");
        Ok(body)
    }

    /// `GET /listings/`
    pub async fn fetch_listings(&self) -> Result<Vec<Property>, ApiError> {
        let endpoint = "/listings/";
        self.send_json(endpoint, self.client.get(self.url(endpoint)))
            .await
    }

    /// `GET /contact-requests/?buyer_id={id}`
    pub async fn fetch_contact_requests(
        &self,
        buyer_id: &str,
    ) -> Result<Vec<ContactRequest>, ApiError> {
        let endpoint = "/contact-requests/";
        let request = self
            .client
            .get(self.url(endpoint))
            .query(&[("buyer_id", buyer_id)]);
        self.send_json(endpoint, request).await
    }

    /// `GET /users/`
    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        let endpoint = "/users/";
        self.send_json(endpoint, self.client.get(self.url(endpoint)))
            .await
    }

    /// `POST /users/`
    pub async fn create_user(&self, payload: &NewUserPayload) -> Result<User, ApiError> {
        let endpoint = "/users/";
        let request = self.client.post(self.url(endpoint)).json(payload);
        self.send_json(endpoint, request).await
    }

    /// Fetch listings and the buyer's requests concurrently.
    ///
    /// Either both succeed or the first failure is returned; there is no
    /// partial result.
    pub async fn fetch_buyer_feed(&self, buyer_id: &str) -> Result<BuyerFeed, ApiError> {
        let (properties, requests) = tokio::try_join!(
            self.fetch_listings(),
            self.fetch_contact_requests(buyer_id)
        )?;
        tracing::info!(
            buyer_id,
            properties = properties.len(),
            requests = requests.len(),
            "Buyer feed fetched"
        );
        Ok(BuyerFeed {
            properties,
            requests,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/users/"), "http://localhost:8000/api/users/");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_failure() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let client = ApiClient::new("http://127.0.0.1:9/api").unwrap();
        let err = client.fetch_users().await.unwrap_err();
        assert!(matches!(err, ApiError::NetworkFailure { .. }));
    }
}
