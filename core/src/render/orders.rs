//! Order list, order details and the draft summary used while creating an
//! order.

use std::fmt::Write;

use chrono::{Duration, NaiveDateTime};

use super::format::{escape_html, format_currency, format_date, format_datetime, format_quantity, format_time};
use crate::order_draft::OrderDraft;
use crate::types::{Customer, OrderDetail, OrderSummary, Product};

/// Orders placed less than this long before `now` get the "New" badge.
const RECENT_WINDOW_HOURS: i64 = 24;

fn is_recent(placed: &NaiveDateTime, now: &NaiveDateTime) -> bool {
    let age = *now - *placed;
    age >= Duration::zero() && age < Duration::hours(RECENT_WINDOW_HOURS)
}

/// `now` decides which orders are highlighted as new; pass the same value
/// to get the same markup.
pub fn render_orders(orders: &[OrderSummary], now: NaiveDateTime) -> String {
    if orders.is_empty() {
        return r#"<div class="empty-state text-center py-5">
    <i class="fas fa-shopping-cart fa-4x text-muted mb-3"></i>
    <h4>No Orders Found</h4>
    <p class="text-muted">Start taking orders from your customers.</p>
    <a href="/orders/create" class="btn btn-primary"><i class="fas fa-plus"></i> Create First Order</a>
</div>"#
            .to_string();
    }

    let revenue: f64 = orders.iter().map(|o| o.total).sum();
    let mut html = format!(
        r#"<div class="d-flex justify-content-between align-items-center mb-4">
    <div>
        <h3><i class="fas fa-shopping-cart me-2"></i>Orders ({count})</h3>
        <p class="text-muted">Total Revenue: {revenue}</p>
    </div>
    <div class="btn-group">
        <a href="/orders/create" class="btn btn-success"><i class="fas fa-plus"></i> New Order</a>
        <button class="btn btn-info" data-action="export-orders"><i class="fas fa-download"></i> Export</button>
        <button class="btn btn-secondary" data-action="load-orders"><i class="fas fa-refresh"></i> Refresh</button>
    </div>
</div>
<div class="card"><div class="card-body p-0"><div class="table-responsive">
<table class="table table-hover mb-0">
<thead><tr><th>Order ID</th><th>Customer</th><th>Date</th><th>Total</th><th>Status</th><th>Actions</th></tr></thead>
<tbody>
"#,
        count = orders.len(),
        revenue = format_currency(revenue),
    );

    for order in orders {
        let recent = is_recent(&order.datetime, &now);
        let id = order.order_id;
        let _ = write!(
            html,
            r#"<tr data-order-id="{id}"{row_class}>
    <td><strong>#{id}</strong>{badge}</td>
    <td><i class="fas fa-user-circle text-primary me-2"></i><strong>{customer}</strong></td>
    <td><strong>{date}</strong><small class="text-muted d-block">{time}</small></td>
    <td><strong class="text-success">{total}</strong></td>
    <td><span class="badge bg-success">Completed</span></td>
    <td><div class="btn-group btn-group-sm">
        <a href="/orders/{id}" class="btn btn-outline-primary" title="View Details"><i class="fas fa-eye"></i></a>
        <button class="btn btn-outline-info" title="Print Order" data-action="print-order" data-id="{id}"><i class="fas fa-print"></i></button>
    </div></td>
</tr>
"#,
            row_class = if recent { r#" class="table-success""# } else { "" },
            badge = if recent { r#"<span class="badge bg-success ms-2">New</span>"# } else { "" },
            customer = escape_html(&order.customer_name),
            date = format_date(&order.datetime),
            time = format_time(&order.datetime),
            total = format_currency(order.total),
        );
    }

    let _ = write!(
        html,
        r#"</tbody>
</table>
</div></div></div>
<div class="mt-3 text-muted"><small><i class="fas fa-info-circle"></i> Total Orders: {} | Total Revenue: {} | Average Order: {}</small></div>"#,
        orders.len(),
        format_currency(revenue),
        format_currency(revenue / orders.len() as f64),
    );
    html
}

pub fn render_order_summary(order: &OrderDetail) -> String {
    format!(
        r#"<div class="card mb-4">
    <div class="card-header">Order Summary</div>
    <div class="card-body"><div class="row">
        <div class="col-md-6">
            <p><strong>Order ID:</strong> {id}</p>
            <p><strong>Customer:</strong> {customer}</p>
        </div>
        <div class="col-md-6">
            <p><strong>Date:</strong> {date}</p>
            <p><strong>Total:</strong> <span class="order-total">{total}</span></p>
        </div>
    </div></div>
</div>"#,
        id = order.order_id,
        customer = escape_html(&order.customer_name),
        date = format_datetime(&order.datetime),
        total = format_currency(order.total),
    )
}

pub fn render_order_items(order: &OrderDetail) -> String {
    let mut html = String::from(
        r#"<div class="table-responsive">
<table class="table">
<thead><tr><th>Product</th><th>Unit</th><th>Quantity</th><th>Price</th></tr></thead>
<tbody>
"#,
    );
    for item in &order.items {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&item.product_name),
            escape_html(&item.uom_name),
            format_quantity(item.quantity),
            format_currency(item.total_price),
        );
    }
    let _ = write!(
        html,
        r#"</tbody>
<tfoot><tr><th colspan="3" class="text-end">Total:</th><th>{}</th></tr></tfoot>
</table>
</div>"#,
        format_currency(order.total)
    );
    html
}

/// Line items of an order that is still being assembled.
pub fn render_draft(draft: &OrderDraft) -> String {
    if draft.is_empty() {
        return r#"<p class="text-muted">No items added to order yet.</p>"#.to_string();
    }

    let mut html = String::from(
        r#"<div class="table-responsive">
<table class="table table-sm">
<thead><tr><th>Product</th><th>Quantity</th><th>Price</th><th>Action</th></tr></thead>
<tbody>
"#,
    );
    for (index, item) in draft.items().iter().enumerate() {
        let _ = writeln!(
            html,
            r#"<tr><td>{}</td><td>{} {}</td><td>{}</td><td><button type="button" class="btn btn-sm btn-outline-danger" data-action="remove-item" data-index="{index}">Remove</button></td></tr>"#,
            escape_html(&item.product_name),
            format_quantity(item.quantity),
            escape_html(&item.uom_name),
            format_currency(item.total_price),
        );
    }
    let _ = write!(
        html,
        r#"</tbody>
<tfoot><tr><th colspan="2" class="text-end">Total:</th><th colspan="2">{}</th></tr></tfoot>
</table>
</div>"#,
        format_currency(draft.total())
    );
    html
}

/// Customer select on the order-creation page.
pub fn render_customer_options(customers: &[Customer]) -> String {
    let mut html = String::from(r#"<option value="">Select Customer</option>"#);
    for customer in customers {
        let _ = write!(
            html,
            r#"<option value="{}">{}</option>"#,
            customer.customer_id,
            escape_html(&customer.name)
        );
    }
    html
}

/// Product select on the order-creation page, labelled with the unit price.
pub fn render_product_options(products: &[Product]) -> String {
    let mut html = String::from(r#"<option value="">Select Product</option>"#);
    for product in products {
        let label = format!(
            "{} ({} per {})",
            product.name,
            format_currency(product.price_per_unit),
            product.uom_name
        );
        let _ = write!(
            html,
            r#"<option value="{}">{}</option>"#,
            product.product_id,
            escape_html(&label)
        );
    }
    html
}
