//! Request building, response interpretation and the transport helper.
//!
//! # Design
//! `ApiClient` is split the same way as its wire contract:
//! - `build_request` turns (method, path, payload) into an `HttpRequest`,
//! - `parse_response` turns an `HttpResponse` into JSON or an `ApiError`,
//! - `request` / `request_as` glue the two around the injected transport and
//!   apply the uniform loading/notification contract.
//!
//! The client is a cheap handle: the transport sits behind an `Arc` and the
//! `UiService` is itself shared, so clones observe the same indicator.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    Acknowledgement, Customer, NewCustomer, NewOrder, NewProduct, OrderDetail, OrderSummary, Product,
    Uom,
};
use crate::ui::{NotificationLevel, UiService};

/// Record types served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Customers,
    Products,
    Orders,
    Uom,
}

impl Entity {
    pub fn collection_path(self) -> &'static str {
        match self {
            Entity::Customers => "/api/customers",
            Entity::Products => "/api/products",
            Entity::Orders => "/api/orders",
            Entity::Uom => "/api/uom",
        }
    }

    pub fn item_path(self, id: u64) -> String {
        format!("{}/{id}", self.collection_path())
    }
}

/// Result of a delete, with referential conflicts split out from other
/// failures.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted { message: Option<String> },
    /// The record is still referenced by orders; `reason` prefers the
    /// server's `details` over its `error`.
    Conflict { reason: String },
    Failed { error: ApiError },
}

#[derive(Debug)]
pub struct ApiClient<T> {
    base_url: String,
    transport: Arc<T>,
    ui: UiService,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            transport: self.transport.clone(),
            ui: self.ui.clone(),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T, ui: UiService) -> Self {
        Self::with_shared_transport(base_url, Arc::new(transport), ui)
    }

    pub fn with_shared_transport(base_url: &str, transport: Arc<T>, ui: UiService) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            ui,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ui(&self) -> &UiService {
        &self.ui
    }

    /// Absolute URL for `path`; absolute inputs pass through unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Build the request. The payload is serialized only for POST and PUT.
    pub fn build_request<P: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&P>,
    ) -> Result<HttpRequest, ApiError> {
        let body = match payload {
            Some(payload) if method.carries_body() => Some(
                serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?,
            ),
            _ => None,
        };
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    /// Transport helper: one request with the loading indicator held for its
    /// whole duration and every failure reported as a notification.
    pub async fn request<P: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&P>,
    ) -> Result<Value, ApiError> {
        self.request_as(method, path, payload).await
    }

    /// [`request`](Self::request) decoding the body into `D`.
    pub async fn request_as<D, P>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&P>,
    ) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let result = self.request_quiet(method, path, payload).await;
        if let Err(err) = &result {
            tracing::error!(%method, path, error = %err, "API request failed");
            self.ui.notify(NotificationLevel::Error, format!("API Error: {err}"));
        }
        result
    }

    /// Same contract as [`request_as`](Self::request_as) without the
    /// notification, for callers that route the failure to their own UI.
    pub async fn request_quiet<D, P>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&P>,
    ) -> Result<D, ApiError>
    where
        D: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let _loading = self.ui.begin();
        let request = self.build_request(method, path, payload)?;
        tracing::debug!(%method, url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        tracing::debug!(%method, path, status = response.status, "response received");
        let value = parse_response(response)?;
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    async fn get<D: DeserializeOwned>(&self, path: &str) -> Result<D, ApiError> {
        self.request_as::<D, ()>(HttpMethod::Get, path, None).await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.get(Entity::Customers.collection_path()).await
    }

    pub async fn get_customer(&self, id: u64) -> Result<Customer, ApiError> {
        self.get(&Entity::Customers.item_path(id)).await
    }

    pub async fn create_customer(&self, input: &NewCustomer) -> Result<Acknowledgement, ApiError> {
        self.request_as(HttpMethod::Post, Entity::Customers.collection_path(), Some(input))
            .await
    }

    pub async fn update_customer(&self, id: u64, input: &NewCustomer) -> Result<Acknowledgement, ApiError> {
        self.request_as(HttpMethod::Put, &Entity::Customers.item_path(id), Some(input))
            .await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get(Entity::Products.collection_path()).await
    }

    pub async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        self.get(&Entity::Products.item_path(id)).await
    }

    pub async fn create_product(&self, input: &NewProduct) -> Result<Acknowledgement, ApiError> {
        self.request_as(HttpMethod::Post, Entity::Products.collection_path(), Some(input))
            .await
    }

    pub async fn update_product(&self, id: u64, input: &NewProduct) -> Result<Acknowledgement, ApiError> {
        self.request_as(HttpMethod::Put, &Entity::Products.item_path(id), Some(input))
            .await
    }

    pub async fn list_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
        self.get(Entity::Orders.collection_path()).await
    }

    pub async fn get_order(&self, id: u64) -> Result<OrderDetail, ApiError> {
        self.get(&Entity::Orders.item_path(id)).await
    }

    pub async fn create_order(&self, input: &NewOrder) -> Result<Acknowledgement, ApiError> {
        self.request_as(HttpMethod::Post, Entity::Orders.collection_path(), Some(input))
            .await
    }

    pub async fn list_uom(&self) -> Result<Vec<Uom>, ApiError> {
        self.get(Entity::Uom.collection_path()).await
    }

    /// Delete a record without notifying; the caller decides how each
    /// outcome is presented.
    pub async fn delete(&self, entity: Entity, id: u64) -> DeleteOutcome {
        let path = entity.item_path(id);
        match self
            .request_quiet::<Acknowledgement, ()>(HttpMethod::Delete, &path, None)
            .await
        {
            Ok(ack) => DeleteOutcome::Deleted { message: ack.message },
            Err(error) if error.is_conflict() => {
                let reason = error.details().map(str::to_string).unwrap_or_else(|| error.to_string());
                tracing::info!(path = %path, %reason, "delete blocked by existing orders");
                DeleteOutcome::Conflict { reason }
            }
            Err(error) => {
                tracing::warn!(path = %path, %error, "delete failed");
                DeleteOutcome::Failed { error }
            }
        }
    }
}

/// Interpret a response under the uniform error contract.
///
/// 2xx bodies must be JSON. For other statuses the message comes from the
/// body's non-empty `error` string when there is one, else
/// `HTTP <status>: <reason>`.
pub fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    let parsed = serde_json::from_str::<Value>(&response.body);

    if response.is_success() {
        return parsed.map_err(|e| ApiError::Deserialization(e.to_string()));
    }

    let body = parsed.ok();
    let field = |name: &str| {
        body.as_ref()
            .and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let message = field("error")
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status_message(response.status));

    if response.status == 404 {
        return Err(ApiError::NotFound { message });
    }
    Err(ApiError::Http {
        status: response.status,
        message,
        details: field("details"),
    })
}

/// `HTTP <status>: <canonical reason>`; the reason is empty when unknown.
pub fn status_message(status: u16) -> String {
    let reason = http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("");
    format!("HTTP {status}: {reason}")
}
