//! In-memory grocery API used by the client's integration tests and for
//! local development.
//!
//! Serves `/api/customers`, `/api/products`, `/api/uom` and `/api/orders`
//! with the same JSON shapes, status codes and error bodies as the production
//! backend, including the delete conflicts raised for records that orders
//! still reference.

pub mod error;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use error::{AppError, ErrorBody};
pub use store::{Customer, OrderDetailView, OrderSummaryView, ProductView, Store, Uom};

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, AppError>;

/// Router over a freshly seeded store.
pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/uom", get(list_uom))
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{id}", get(get_order))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Malformed bodies get the same `{error}` shape as validation failures.
fn body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::new(rejection.status(), rejection.body_text()))
}

async fn list_customers(State(db): State<Db>) -> Json<Vec<Customer>> {
    Json(db.read().await.customers())
}

async fn get_customer(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Customer>> {
    db.read().await.customer(id).map(Json)
}

async fn create_customer(
    State(db): State<Db>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let data = body(payload)?;
    let customer_id = db.write().await.insert_customer(&data)?;
    tracing::info!(customer_id, "customer added");
    Ok((
        StatusCode::CREATED,
        Json(json!({"customer_id": customer_id, "message": "Customer added successfully"})),
    ))
}

async fn update_customer(
    State(db): State<Db>,
    Path(id): Path<u64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let data = body(payload)?;
    db.write().await.update_customer(id, &data)?;
    Ok(Json(json!({"message": "Customer updated successfully"})))
}

async fn delete_customer(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Value>> {
    db.write().await.delete_customer(id)?;
    tracing::info!(customer_id = id, "customer deleted");
    Ok(Json(json!({"message": "Customer deleted successfully"})))
}

async fn list_products(State(db): State<Db>) -> Json<Vec<ProductView>> {
    Json(db.read().await.products())
}

async fn get_product(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<ProductView>> {
    db.read().await.product(id).map(Json)
}

async fn create_product(
    State(db): State<Db>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let data = body(payload)?;
    let product_id = db.write().await.insert_product(&data)?;
    tracing::info!(product_id, "product added");
    Ok((
        StatusCode::CREATED,
        Json(json!({"product_id": product_id, "message": "Product added successfully"})),
    ))
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<u64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let data = body(payload)?;
    db.write().await.update_product(id, &data)?;
    Ok(Json(json!({"message": "Product updated successfully"})))
}

async fn delete_product(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Value>> {
    let name = db.write().await.delete_product(id)?;
    tracing::info!(product_id = id, "product deleted");
    Ok(Json(json!({"message": format!("Product '{name}' deleted successfully")})))
}

async fn list_uom(State(db): State<Db>) -> Json<Vec<Uom>> {
    Json(db.read().await.uom().to_vec())
}

async fn list_orders(State(db): State<Db>) -> Json<Vec<OrderSummaryView>> {
    Json(db.read().await.orders())
}

async fn get_order(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<OrderDetailView>> {
    db.read().await.order(id).map(Json)
}

async fn create_order(
    State(db): State<Db>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let data = body(payload)?;
    let placed_at = chrono::Utc::now().naive_utc();
    let order_id = db.write().await.insert_order(&data, placed_at)?;
    tracing::info!(order_id, "order created");
    Ok((
        StatusCode::CREATED,
        Json(json!({"order_id": order_id, "message": "Order created successfully"})),
    ))
}
