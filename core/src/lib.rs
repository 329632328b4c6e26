//! Client core for the grocery store front end.
//!
//! # Overview
//! Talks to the grocery REST API (`/api/customers`, `/api/products`,
//! `/api/orders`, `/api/uom`) and turns the results into page content. The
//! actual HTTP round-trip sits behind the [`Transport`] trait, so everything
//! above it runs unchanged against the real server, the mock server, or a
//! scripted transport in tests.
//!
//! # Design
//! - `ApiClient` is the transport helper: one request, a scoped loading
//!   indicator, a uniform error contract and a notification per failure.
//! - `Loader` wraps it with a bounded linear-backoff retry and writes either
//!   rendered markup or a terminal error panel into a `Page` container.
//! - `render` holds pure data → markup functions; no I/O, no clock reads.
//! - UI side effects go through an injected `UiService` rather than globals.
//! - `Storefront` is the page host that wires the pieces per user action.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod http;
pub mod loader;
pub mod order_draft;
pub mod page;
pub mod render;
pub mod storefront;
pub mod transport;
pub mod types;
pub mod ui;

#[cfg(test)]
mod testing;

pub use client::{parse_response, ApiClient, DeleteOutcome, Entity};
pub use config::ClientConfig;
pub use error::ApiError;
pub use export::CsvExport;
pub use form::{FieldKind, FormField, SubmitError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use loader::{Loader, RetryPolicy};
pub use order_draft::{DraftError, OrderDraft};
pub use page::Page;
pub use storefront::{Storefront, Submitted};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Acknowledgement, Customer, NewCustomer, NewOrder, NewOrderItem, NewProduct, OrderDetail,
    OrderLine, OrderSummary, Product, Uom,
};
pub use ui::{Notification, NotificationLevel, NotificationLog, Notifier, TracingNotifier, UiService};
