//! The page host: one object wiring client, loader, page and UI together.
//!
//! # Design
//! `Storefront` owns no state of its own beyond handles; the page content
//! lives in [`Page`], notifications and the spinner in [`UiService`]. Every
//! operation maps to one user action on the customers, products or orders
//! pages. Failures have already been reported through the notifier by the
//! time an operation returns `None`, except where noted.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::client::{ApiClient, DeleteOutcome, Entity};
use crate::config::ClientConfig;
use crate::export::{self, CsvExport};
use crate::form::{self, FormField, SubmitError};
use crate::http::HttpMethod;
use crate::loader::{Loader, RetryPolicy};
use crate::order_draft::OrderDraft;
use crate::page::Page;
use crate::render;
use crate::transport::Transport;
use crate::types::{Acknowledgement, Customer, OrderDetail, OrderSummary, Product, Uom};
use crate::ui::{NotificationLevel, UiService};

/// Container ids the storefront renders into.
pub mod containers {
    pub const CUSTOMERS: &str = "customersContainer";
    pub const PRODUCTS: &str = "productsContainer";
    pub const ORDERS: &str = "ordersContainer";
    pub const ORDER_SUMMARY: &str = "orderSummary";
    pub const ORDER_ITEMS: &str = "orderItems";
    pub const DRAFT: &str = "orderItemsList";
    pub const UOM_SELECT: &str = "uomId";
    pub const CUSTOMER_SELECT: &str = "customerId";
    pub const PRODUCT_SELECT: &str = "productId";
    pub const MODAL: &str = "modalContainer";

    pub const ALL: [&str; 10] = [
        CUSTOMERS,
        PRODUCTS,
        ORDERS,
        ORDER_SUMMARY,
        ORDER_ITEMS,
        DRAFT,
        UOM_SELECT,
        CUSTOMER_SELECT,
        PRODUCT_SELECT,
        MODAL,
    ];
}

/// A successful form submit and where the host should go next.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub acknowledgement: Acknowledgement,
    pub redirect: Option<String>,
}

#[derive(Debug)]
pub struct Storefront<T> {
    client: ApiClient<T>,
    loader: Loader<T>,
}

impl<T> Clone for Storefront<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            loader: self.loader.clone(),
        }
    }
}

impl<T: Transport> Storefront<T> {
    /// A storefront over a fresh page with every container mounted.
    pub fn new(client: ApiClient<T>, policy: RetryPolicy) -> Self {
        Self::with_page(client, Page::with_containers(containers::ALL), policy)
    }

    pub fn with_page(client: ApiClient<T>, page: Page, policy: RetryPolicy) -> Self {
        let loader = Loader::with_policy(client.clone(), page, policy);
        Self { client, loader }
    }

    pub fn from_config(config: &ClientConfig, transport: T, ui: UiService) -> Self {
        let client = ApiClient::new(&config.base_url, transport, ui);
        Self::new(client, config.retry_policy())
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn page(&self) -> &Page {
        self.loader.page()
    }

    pub fn ui(&self) -> &UiService {
        self.client.ui()
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.ui().notify(level, message);
    }

    pub async fn load_customers(&self) -> Option<Vec<Customer>> {
        self.loader
            .load_data(
                Entity::Customers.collection_path(),
                containers::CUSTOMERS,
                |customers: &Vec<Customer>| render::render_customers(customers),
            )
            .await
    }

    pub async fn load_products(&self) -> Option<Vec<Product>> {
        self.loader
            .load_data(
                Entity::Products.collection_path(),
                containers::PRODUCTS,
                |products: &Vec<Product>| render::render_products(products),
            )
            .await
    }

    /// `now` drives the "New" badge on orders from the last 24 hours.
    pub async fn load_orders(&self, now: NaiveDateTime) -> Option<Vec<OrderSummary>> {
        self.loader
            .load_data(
                Entity::Orders.collection_path(),
                containers::ORDERS,
                |orders: &Vec<OrderSummary>| render::render_orders(orders, now),
            )
            .await
    }

    /// Fill the unit-of-measure select, keeping `selected` chosen.
    pub async fn load_uom_options(&self, selected: Option<u64>) -> Option<Vec<Uom>> {
        let units = self.client.list_uom().await.ok()?;
        self.page()
            .set_html(containers::UOM_SELECT, render::render_uom_options(&units, selected));
        Some(units)
    }

    /// Order page: summary card and line items.
    pub async fn load_order_details(&self, order_id: u64) -> Option<OrderDetail> {
        let order = self.client.get_order(order_id).await.ok()?;
        self.page()
            .set_html(containers::ORDER_SUMMARY, render::render_order_summary(&order));
        self.page()
            .set_html(containers::ORDER_ITEMS, render::render_order_items(&order));
        Some(order)
    }

    pub async fn customer_details(&self, customer_id: u64) -> Option<Customer> {
        let customer = self.client.get_customer(customer_id).await.ok()?;
        self.page()
            .set_html(containers::MODAL, render::render_customer_details(&customer));
        Some(customer)
    }

    pub async fn product_details(&self, product_id: u64) -> Option<Product> {
        let product = self.client.get_product(product_id).await.ok()?;
        self.page()
            .set_html(containers::MODAL, render::render_product_details(&product));
        Some(product)
    }

    /// Delete a customer. A customer with orders is kept and the user is
    /// told why with a warning; the list is reloaded after a delete.
    pub async fn delete_customer(&self, customer_id: u64, name: &str) -> DeleteOutcome {
        self.notify(NotificationLevel::Info, "Deleting customer...");
        let outcome = self.client.delete(Entity::Customers, customer_id).await;
        match &outcome {
            DeleteOutcome::Deleted { .. } => {
                self.notify(
                    NotificationLevel::Success,
                    format!("Customer \"{name}\" deleted successfully!"),
                );
                self.load_customers().await;
            }
            DeleteOutcome::Conflict { .. } => self.notify(
                NotificationLevel::Warning,
                format!(
                    "Cannot delete \"{name}\" - they have existing orders. \
                     Customer records must be preserved for accounting purposes."
                ),
            ),
            DeleteOutcome::Failed { error } => self.notify(
                NotificationLevel::Error,
                format!("Failed to delete \"{name}\": {error}"),
            ),
        }
        outcome
    }

    /// Delete a product. A product still used by orders opens the
    /// explanatory modal instead of an error notification.
    pub async fn delete_product(&self, product_id: u64, name: &str) -> DeleteOutcome {
        self.notify(NotificationLevel::Info, "Deleting product...");
        let outcome = self.client.delete(Entity::Products, product_id).await;
        match &outcome {
            DeleteOutcome::Deleted { .. } => {
                self.notify(
                    NotificationLevel::Success,
                    format!("Product \"{name}\" deleted successfully!"),
                );
                self.load_products().await;
            }
            DeleteOutcome::Conflict { reason } => {
                self.page().set_html(
                    containers::MODAL,
                    render::render_cannot_delete(product_id, name, reason),
                );
            }
            DeleteOutcome::Failed { error } => self.notify(
                NotificationLevel::Error,
                format!("Failed to delete \"{name}\": {error}"),
            ),
        }
        outcome
    }

    pub async fn export_customers(&self) -> Option<CsvExport> {
        let customers = self.client.list_customers().await.ok()?;
        self.exported("Customers", export::customers_csv(&customers))
    }

    pub async fn export_products(&self) -> Option<CsvExport> {
        let products = self.client.list_products().await.ok()?;
        self.exported("Products", export::products_csv(&products))
    }

    pub async fn export_orders(&self) -> Option<CsvExport> {
        let orders = self.client.list_orders().await.ok()?;
        self.exported("Orders", export::orders_csv(&orders))
    }

    fn exported(&self, what: &str, export: CsvExport) -> Option<CsvExport> {
        tracing::info!(filename = export.filename, bytes = export.contents.len(), "export ready");
        self.notify(NotificationLevel::Success, format!("{what} exported successfully!"));
        Some(export)
    }

    /// Printable receipt document for one order.
    pub async fn print_receipt(&self, order_id: u64, now: NaiveDateTime) -> Option<String> {
        let order = self.client.get_order(order_id).await.ok()?;
        Some(render::render_receipt(&order, now))
    }

    /// Edit form for one customer, filled from the API.
    pub async fn customer_form(&self, customer_id: u64) -> Option<Vec<FormField>> {
        self.notify(NotificationLevel::Info, "Loading customer data...");
        let customer = self.client.get_customer(customer_id).await.ok()?;
        self.notify(NotificationLevel::Success, "Customer data loaded successfully!");
        Some(form::customer_fields(Some(&customer)))
    }

    /// Edit form for one product. Also fills the unit select with the
    /// product's unit chosen; an API that omits `uom_id` is matched by name.
    pub async fn product_form(&self, product_id: u64) -> Option<Vec<FormField>> {
        let product = self.client.get_product(product_id).await.ok()?;
        let units = self.client.list_uom().await.unwrap_or_default();
        let uom_id = product.uom_id.or_else(|| {
            units
                .iter()
                .find(|unit| unit.uom_name == product.uom_name)
                .map(|unit| unit.uom_id)
        });
        self.page()
            .set_html(containers::UOM_SELECT, render::render_uom_options(&units, uom_id));
        Some(form::product_fields(Some(&product), uom_id))
    }

    /// Order-creation page: customer and product selects. Returns the
    /// products so the host can add them to an [`OrderDraft`].
    pub async fn load_order_form(&self) -> Option<Vec<Product>> {
        let customers = self.client.list_customers().await.ok()?;
        self.page().set_html(
            containers::CUSTOMER_SELECT,
            render::render_customer_options(&customers),
        );
        let products = self.client.list_products().await.ok()?;
        self.page().set_html(
            containers::PRODUCT_SELECT,
            render::render_product_options(&products),
        );
        Some(products)
    }

    /// Validate and submit a create/edit form.
    ///
    /// Invalid fields stop the submit before any request is made and are not
    /// notified; the caller highlights them. API failures were already
    /// notified by the transport helper.
    pub async fn submit_form(
        &self,
        method: HttpMethod,
        path: &str,
        fields: &[FormField],
        redirect: Option<&str>,
    ) -> Result<Submitted, SubmitError> {
        let validation = form::validate(fields);
        if !validation.is_valid() {
            let invalid: Vec<String> = validation
                .invalid_fields()
                .into_iter()
                .map(str::to_string)
                .collect();
            tracing::debug!(path, ?invalid, "form rejected before submit");
            return Err(SubmitError::Invalid(invalid));
        }

        let payload = Value::Object(form::to_payload(fields));
        let acknowledgement: Acknowledgement =
            self.client.request_as(method, path, Some(&payload)).await?;
        self.notify(
            NotificationLevel::Success,
            acknowledgement
                .message
                .clone()
                .unwrap_or_else(|| "Operation completed successfully".to_string()),
        );
        Ok(Submitted {
            acknowledgement,
            redirect: redirect.map(str::to_string),
        })
    }

    /// Show the draft's lines and running total.
    pub fn show_draft(&self, draft: &OrderDraft) {
        self.page()
            .set_html(containers::DRAFT, render::render_draft(draft));
    }

    /// Submit the draft for `customer_id`; returns the new order id.
    pub async fn submit_order(&self, draft: &OrderDraft, customer_id: u64) -> Option<u64> {
        let order = match draft.to_new_order(customer_id) {
            Ok(order) => order,
            Err(err) => {
                self.notify(NotificationLevel::Warning, err.to_string());
                return None;
            }
        };
        let acknowledgement = self.client.create_order(&order).await.ok()?;
        self.notify(NotificationLevel::Success, "Order created successfully!");
        let order_id = acknowledgement.id("order_id");
        if order_id.is_none() {
            tracing::warn!("order created but the response carried no order_id");
        }
        order_id
    }
}
