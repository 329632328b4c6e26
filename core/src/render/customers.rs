//! Customer list and details markup.

use std::fmt::Write;

use super::format::escape_html;
use crate::types::Customer;

/// Optional contact field: icon + value, or a muted dash.
fn contact_cell(value: Option<&str>, icon: &str) -> String {
    match value {
        Some(value) => format!(
            r#"<i class="fas fa-{icon} me-1"></i>{}"#,
            escape_html(value)
        ),
        None => r#"<span class="text-muted">-</span>"#.to_string(),
    }
}

pub fn render_customers(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return r#"<div class="empty-state text-center py-5">
    <i class="fas fa-users fa-4x text-muted mb-3"></i>
    <h4>No Customers Found</h4>
    <p class="text-muted">Start building your customer base by adding your first customer.</p>
    <a href="/customers/add" class="btn btn-primary"><i class="fas fa-plus"></i> Add First Customer</a>
</div>"#
            .to_string();
    }

    let mut html = format!(
        r#"<div class="d-flex justify-content-between align-items-center mb-4">
    <div>
        <h3><i class="fas fa-users me-2"></i>Customers ({count})</h3>
        <p class="text-muted">Manage your customer database</p>
    </div>
    <div class="btn-group">
        <a href="/customers/add" class="btn btn-success"><i class="fas fa-plus"></i> Add Customer</a>
        <button class="btn btn-info" data-action="export-customers"><i class="fas fa-download"></i> Export</button>
        <button class="btn btn-secondary" data-action="load-customers"><i class="fas fa-refresh"></i> Refresh</button>
    </div>
</div>
<div class="card"><div class="card-body p-0"><div class="table-responsive">
<table class="table table-hover mb-0">
<thead><tr><th>ID</th><th>Name</th><th>Phone</th><th>Email</th><th>Address</th><th>Actions</th></tr></thead>
<tbody>
"#,
        count = customers.len()
    );

    for customer in customers {
        let id = customer.customer_id;
        let name = escape_html(&customer.name);
        let _ = write!(
            html,
            r#"<tr data-customer-id="{id}">
    <td><strong>#{id}</strong></td>
    <td><i class="fas fa-user-circle text-primary me-2"></i><strong>{name}</strong></td>
    <td>{phone}</td>
    <td>{email}</td>
    <td>{address}</td>
    <td><div class="btn-group btn-group-sm">
        <a href="/customers/edit/{id}" class="btn btn-outline-primary" title="Edit Customer"><i class="fas fa-edit"></i></a>
        <button class="btn btn-outline-danger" title="Delete Customer" data-action="delete-customer" data-id="{id}" data-name="{name}"><i class="fas fa-trash"></i></button>
        <button class="btn btn-outline-info" title="View Details" data-action="view-customer" data-id="{id}"><i class="fas fa-eye"></i></button>
    </div></td>
</tr>
"#,
            phone = contact_cell(customer.phone.as_deref(), "phone text-success"),
            email = contact_cell(customer.email.as_deref(), "envelope text-info"),
            address = contact_cell(customer.address.as_deref(), "map-marker-alt text-warning"),
        );
    }

    let _ = write!(
        html,
        r#"</tbody>
</table>
</div></div></div>
<div class="mt-3 text-muted"><small><i class="fas fa-info-circle"></i> Total Customers: {}</small></div>"#,
        customers.len()
    );
    html
}

pub fn render_customer_details(customer: &Customer) -> String {
    let or_missing = |v: &Option<String>| escape_html(v.as_deref().unwrap_or("Not provided"));
    let id = customer.customer_id;
    format!(
        r#"<div class="modal-dialog modal-lg"><div class="modal-content">
<div class="modal-header"><h5 class="modal-title"><i class="fas fa-user-circle me-2"></i>Customer Details</h5></div>
<div class="modal-body"><div class="row">
    <div class="col-md-6"><div class="card"><div class="card-body">
        <h6 class="card-subtitle mb-2 text-muted">Contact Information</h6>
        <p><strong>ID:</strong> #{id}</p>
        <p><strong>Name:</strong> {name}</p>
        <p><strong>Phone:</strong> {phone}</p>
        <p><strong>Email:</strong> {email}</p>
        <p><strong>Address:</strong> {address}</p>
    </div></div></div>
    <div class="col-md-6"><div class="card"><div class="card-body">
        <h6 class="card-subtitle mb-2 text-muted">Actions</h6>
        <div class="d-grid gap-2">
            <a href="/customers/edit/{id}" class="btn btn-primary btn-sm"><i class="fas fa-edit"></i> Edit Customer</a>
            <a href="/orders/create?customer={id}" class="btn btn-success btn-sm"><i class="fas fa-plus"></i> Create Order</a>
        </div>
    </div></div></div>
</div></div>
</div></div>"#,
        name = escape_html(&customer.name),
        phone = or_missing(&customer.phone),
        email = or_missing(&customer.email),
        address = or_missing(&customer.address),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: u64, name: &str, phone: Option<&str>) -> Customer {
        Customer {
            customer_id: id,
            name: name.to_string(),
            phone: phone.map(str::to_string),
            email: None,
            address: None,
        }
    }

    #[test]
    fn empty_list_renders_empty_state() {
        let html = render_customers(&[]);
        assert!(html.contains("No Customers Found"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn rows_carry_ids_and_placeholders() {
        let html = render_customers(&[
            customer(1, "Asha", Some("9876543210")),
            customer(2, "Ravi", None),
        ]);
        assert!(html.contains("Customers (2)"));
        assert!(html.contains(r#"<tr data-customer-id="1">"#));
        assert!(html.contains("9876543210"));
        assert!(html.contains(r#"<span class="text-muted">-</span>"#));
        assert!(html.contains("Total Customers: 2"));
    }

    #[test]
    fn names_are_escaped() {
        let html = render_customers(&[customer(1, "O'Brien <script>", None)]);
        assert!(html.contains("O&#x27;Brien &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let data = vec![customer(1, "Asha", Some("9876543210"))];
        assert_eq!(render_customers(&data), render_customers(&data));
    }

    #[test]
    fn details_fill_missing_fields() {
        let html = render_customer_details(&customer(4, "Meera", None));
        assert!(html.contains("<strong>Phone:</strong> Not provided"));
        assert!(html.contains("/orders/create?customer=4"));
    }
}
