//! Pure markup builders.
//!
//! Every function here maps data to an HTML string with no I/O and no hidden
//! inputs: anything clock-dependent takes the time as an argument. All text
//! coming from the API goes through [`format::escape_html`].

pub mod customers;
pub mod format;
pub mod orders;
pub mod products;
pub mod receipt;
pub mod status;

pub use customers::{render_customer_details, render_customers};
pub use orders::{
    render_customer_options, render_draft, render_order_items, render_order_summary,
    render_orders, render_product_options,
};
pub use products::{
    render_cannot_delete, render_product_details, render_products, render_uom_options,
    StockStatus,
};
pub use receipt::render_receipt;
