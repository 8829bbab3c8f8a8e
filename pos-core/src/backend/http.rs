//! HTTP backend for the booking and catalog services

use super::normalize::{
    self, OutgoingAppendItems, OutgoingStatusUpdate, OutgoingTransaction, RemoteBookingResponse,
    RemoteCategory, RemoteIngredient, RemoteMenuItem, RemoteOrder, RemoteTable,
};
use super::{
    BackendError, BackendResult, BookingBackend, BookingConfirmation, BookingPayload, CatalogBackend,
    FetchedOrder,
};
use crate::core::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::models::{
    Category, DiningTable, Ingredient, InventoryTransaction, MenuItem, Order, OrderItem,
};
use std::time::Duration;

/// reqwest client talking JSON to both backends
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    booking_url: String,
    catalog_url: String,
}

impl HttpBackend {
    pub fn new(
        booking_url: impl Into<String>,
        catalog_url: impl Into<String>,
        timeout: Duration,
    ) -> BackendResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let booking_url: String = booking_url.into();
        let catalog_url: String = catalog_url.into();
        Ok(Self {
            client,
            booking_url: booking_url.trim_end_matches('/').to_string(),
            catalog_url: catalog_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> BackendResult<Self> {
        Self::new(
            &config.booking_backend_url,
            &config.catalog_backend_url,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    fn url(base: &str, path: &str) -> String {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// GET returning raw JSON (list endpoints are normalized by the caller)
    async fn get_json(&self, url: String) -> BackendResult<serde_json::Value> {
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }

    async fn send_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: String,
        body: &B,
    ) -> BackendResult<T> {
        tracing::debug!(method = %method, url = %url, "Sending request");
        let response = self.client.request(method, &url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Same as `send_json` but ignores the response body
    async fn send_ignore<B: serde::Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: String,
        body: &B,
    ) -> BackendResult<()> {
        tracing::debug!(method = %method, url = %url, "Sending request");
        let response = self.client.request(method, &url).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> BackendResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(text)),
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                Err(BackendError::Unavailable(format!("{}: {}", status, text)))
            }
            _ => Err(BackendError::Rejected {
                status: status.as_u16(),
                message: text,
            }),
        }
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(BackendError::InvalidResponse("empty body".into()));
        }
        serde_json::from_slice(&bytes).map_err(Into::into)
    }
}

#[async_trait]
impl BookingBackend for HttpBackend {
    async fn tables_by_time(&self, iso_time: &str, party_size: u32) -> BackendResult<Vec<DiningTable>> {
        let url = Self::url(&self.booking_url, "tables/availability");
        tracing::debug!(url = %url, time = %iso_time, party_size, "GET");
        let response = self
            .client
            .get(&url)
            .query(&[("time", iso_time.to_string()), ("partySize", party_size.to_string())])
            .send()
            .await?;
        let value: serde_json::Value = Self::handle_response(response).await?;
        Ok(normalize::decode_list::<RemoteTable, _>(value)?)
    }

    async fn create_booking(&self, payload: &BookingPayload) -> BackendResult<BookingConfirmation> {
        let url = Self::url(&self.booking_url, "reservations");
        let response: RemoteBookingResponse = self.send_json(reqwest::Method::POST, url, payload).await?;
        Ok(response.into())
    }

    async fn update_booking_status(&self, booking_id: &str, status_code: i32) -> BackendResult<()> {
        let url = Self::url(&self.booking_url, &format!("orders/{}/status", booking_id));
        self.send_ignore(reqwest::Method::PUT, url, &OutgoingStatusUpdate { status_code })
            .await
    }

    async fn append_order_items(&self, order: &Order, items: &[OrderItem]) -> BackendResult<()> {
        let url = Self::url(&self.booking_url, &format!("orders/{}/items", order.id));
        let body = OutgoingAppendItems {
            table_id: &order.table_id,
            items: items.iter().map(Into::into).collect(),
        };
        self.send_ignore(reqwest::Method::POST, url, &body).await
    }

    async fn fetch_order(&self, order_id: &str) -> BackendResult<FetchedOrder> {
        let url = Self::url(&self.booking_url, &format!("orders/{}", order_id));
        let value = self.get_json(url).await?;
        let remote: RemoteOrder = serde_json::from_value(value)?;
        Ok(remote.into())
    }
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        let value = self.get_json(Self::url(&self.catalog_url, "categories")).await?;
        Ok(normalize::decode_list::<RemoteCategory, _>(value)?)
    }

    async fn list_menu_items(&self) -> BackendResult<Vec<MenuItem>> {
        let value = self.get_json(Self::url(&self.catalog_url, "dishes")).await?;
        Ok(normalize::decode_list::<RemoteMenuItem, _>(value)?)
    }

    async fn list_ingredients(&self) -> BackendResult<Vec<Ingredient>> {
        let value = self.get_json(Self::url(&self.catalog_url, "ingredients")).await?;
        Ok(normalize::decode_list::<RemoteIngredient, _>(value)?)
    }

    async fn push_transaction(&self, tx: &InventoryTransaction) -> BackendResult<()> {
        let url = Self::url(&self.catalog_url, "inventory/transactions");
        self.send_ignore(reqwest::Method::POST, url, &OutgoingTransaction::from(tx))
            .await
    }
}
