//! Product list, details and the "cannot delete" explanation.

use std::fmt::Write;

use super::format::{escape_html, format_currency};
use crate::types::{Product, Uom};

/// Stock band of a product: label shown under the quantity and the badge
/// colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    OutOfStock,
    Low,
    Medium,
    InStock,
}

impl StockStatus {
    pub fn for_quantity(stock: i64) -> Self {
        match stock {
            i64::MIN..=0 => StockStatus::OutOfStock,
            1..=9 => StockStatus::Low,
            10..=49 => StockStatus::Medium,
            _ => StockStatus::InStock,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Low => "Low Stock",
            StockStatus::Medium => "Medium Stock",
            StockStatus::InStock => "In Stock",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "danger",
            StockStatus::Low => "warning",
            StockStatus::Medium => "info",
            StockStatus::InStock => "success",
        }
    }
}

/// Display-ready values for one table row.
struct ProductRow {
    id: u64,
    name: String,
    unit: String,
    price: String,
    stock: i64,
    status: StockStatus,
    value: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let stock = product.stock();
        Self {
            id: product.product_id,
            name: escape_html(&product.name),
            unit: escape_html(&product.uom_name),
            price: format_currency(product.price_per_unit),
            stock,
            status: StockStatus::for_quantity(stock),
            value: format_currency(product.stock_value()),
        }
    }
}

pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return r#"<div class="empty-state text-center py-5">
    <i class="fas fa-box-open fa-4x text-muted mb-3"></i>
    <h4>No Products Found</h4>
    <p class="text-muted">Get started by adding your first product to the inventory.</p>
    <a href="/products/add" class="btn btn-primary"><i class="fas fa-plus"></i> Add First Product</a>
</div>"#
            .to_string();
    }

    let mut html = format!(
        r#"<div class="d-flex justify-content-between align-items-center mb-4">
    <div>
        <h3><i class="fas fa-boxes me-2"></i>Products ({count})</h3>
        <p class="text-muted">Manage your product inventory</p>
    </div>
    <div class="btn-group">
        <a href="/products/add" class="btn btn-success"><i class="fas fa-plus"></i> Add Product</a>
        <button class="btn btn-info" data-action="export-products"><i class="fas fa-download"></i> Export</button>
        <button class="btn btn-secondary" data-action="load-products"><i class="fas fa-refresh"></i> Refresh</button>
    </div>
</div>
<div class="card"><div class="card-body p-0"><div class="table-responsive">
<table class="table table-hover mb-0">
<thead><tr><th>ID</th><th>Name</th><th>Unit</th><th>Price</th><th>Stock</th><th>Value</th><th>Actions</th></tr></thead>
<tbody>
"#,
        count = products.len()
    );

    for row in products.iter().map(ProductRow::from) {
        let _ = write!(
            html,
            r#"<tr data-product-id="{id}">
    <td><strong>#{id}</strong></td>
    <td><i class="fas fa-cube text-primary me-2"></i><strong>{name}</strong></td>
    <td><span class="badge bg-secondary">{unit}</span></td>
    <td><strong class="text-success">{price}</strong></td>
    <td><span class="badge bg-{class}">{stock}</span><small class="text-muted d-block">{label}</small></td>
    <td><strong>{value}</strong></td>
    <td><div class="btn-group btn-group-sm">
        <a href="/products/edit/{id}" class="btn btn-outline-primary" title="Edit Product"><i class="fas fa-edit"></i></a>
        <button class="btn btn-outline-danger" title="Delete Product" data-action="delete-product" data-id="{id}" data-name="{name}"><i class="fas fa-trash"></i></button>
        <button class="btn btn-outline-info" title="View Details" data-action="view-product" data-id="{id}"><i class="fas fa-eye"></i></button>
    </div></td>
</tr>
"#,
            id = row.id,
            name = row.name,
            unit = row.unit,
            price = row.price,
            class = row.status.badge_class(),
            stock = row.stock,
            label = row.status.label(),
            value = row.value,
        );
    }

    let inventory: f64 = products.iter().map(Product::stock_value).sum();
    let _ = write!(
        html,
        r#"</tbody>
</table>
</div></div></div>
<div class="mt-3 text-muted"><small><i class="fas fa-info-circle"></i> Total Products: {} | Total Inventory Value: {}</small></div>"#,
        products.len(),
        format_currency(inventory)
    );
    html
}

pub fn render_product_details(product: &Product) -> String {
    let row = ProductRow::from(product);
    format!(
        r#"<div class="modal-dialog modal-lg"><div class="modal-content">
<div class="modal-header"><h5 class="modal-title"><i class="fas fa-cube me-2"></i>Product Details</h5></div>
<div class="modal-body"><div class="card"><div class="card-body">
    <p><strong>ID:</strong> #{id}</p>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Unit:</strong> {unit}</p>
    <p><strong>Price:</strong> {price}</p>
    <p><strong>Stock:</strong> {stock}</p>
    <p><strong>Status:</strong> {label}</p>
    <p><strong>Stock Value:</strong> {value}</p>
    <a href="/products/edit/{id}" class="btn btn-primary btn-sm"><i class="fas fa-edit"></i> Edit Product</a>
</div></div></div>
</div></div>"#,
        id = row.id,
        name = row.name,
        unit = row.unit,
        price = row.price,
        stock = row.stock,
        label = row.status.label(),
        value = row.value,
    )
}

/// Explains why a product still used by orders cannot be deleted and offers
/// editing it instead.
pub fn render_cannot_delete(product_id: u64, product_name: &str, details: &str) -> String {
    format!(
        r#"<div class="modal-dialog modal-dialog-centered" data-state="delete-conflict"><div class="modal-content">
<div class="modal-header bg-warning text-dark"><h5 class="modal-title"><i class="fas fa-exclamation-triangle me-2"></i>Cannot Delete Product</h5></div>
<div class="modal-body">
    <div class="alert alert-warning">
        <h6><strong>{name}</strong> cannot be deleted</h6>
        <p class="mb-0">{details}</p>
    </div>
    <h6>Alternative Options:</h6>
    <ul class="list-unstyled">
        <li><strong>Edit Product:</strong> Update the product information instead</li>
        <li><strong>Hide from Sales:</strong> Set stock to 0 to prevent new orders</li>
        <li><strong>Keep for Records:</strong> Products in orders must be preserved for accounting</li>
    </ul>
</div>
<div class="modal-footer">
    <button type="button" class="btn btn-secondary" data-bs-dismiss="modal">Close</button>
    <a href="/products/edit/{product_id}" class="btn btn-primary"><i class="fas fa-edit me-1"></i>Edit Product Instead</a>
</div>
</div></div>"#,
        name = escape_html(product_name),
        details = escape_html(details),
    )
}

/// `<option>` list for the unit-of-measure select, `selected` pre-chosen.
pub fn render_uom_options(units: &[Uom], selected: Option<u64>) -> String {
    let mut html = String::from(r#"<option value="">Select Unit of Measure</option>"#);
    for unit in units {
        let marker = if selected == Some(unit.uom_id) { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{marker}>{}</option>"#,
            unit.uom_id,
            escape_html(&unit.uom_name)
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, name: &str, price: f64, stock: Option<i64>) -> Product {
        Product {
            product_id: id,
            name: name.to_string(),
            uom_id: Some(1),
            price_per_unit: price,
            uom_name: "kg".to_string(),
            stock_quantity: stock,
        }
    }

    #[test]
    fn stock_bands() {
        assert_eq!(StockStatus::for_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::for_quantity(9), StockStatus::Low);
        assert_eq!(StockStatus::for_quantity(10), StockStatus::Medium);
        assert_eq!(StockStatus::for_quantity(49).badge_class(), "info");
        assert_eq!(StockStatus::for_quantity(50).label(), "In Stock");
    }

    #[test]
    fn empty_list_renders_empty_state() {
        assert!(render_products(&[]).contains("No Products Found"));
    }

    #[test]
    fn rows_show_value_and_inventory_total() {
        let html = render_products(&[product(1, "Rice", 45.5, None), product(2, "Dal", 100.0, Some(5))]);
        assert!(html.contains("Products (2)"));
        assert!(html.contains("₹4,550"));
        assert!(html.contains(r#"<span class="badge bg-warning">5</span>"#));
        assert!(html.contains("Total Inventory Value: ₹5,050"));
    }

    #[test]
    fn cannot_delete_explains_and_links_edit() {
        let html = render_cannot_delete(3, "Rice", "appears in 2 existing order(s)");
        assert!(html.contains("Cannot Delete Product"));
        assert!(html.contains("appears in 2 existing order(s)"));
        assert!(html.contains("/products/edit/3"));
    }

    #[test]
    fn uom_options_keep_placeholder_first() {
        let units = [
            Uom { uom_id: 1, uom_name: "kg".into() },
            Uom { uom_id: 2, uom_name: "each".into() },
        ];
        let html = render_uom_options(&units, Some(2));
        assert!(html.starts_with(r#"<option value="">Select Unit of Measure</option>"#));
        assert!(html.contains(r#"<option value="2" selected>each</option>"#));
        assert_eq!(render_uom_options(&[], None).matches("<option").count(), 1);
    }

    #[test]
    fn details_show_status() {
        let html = render_product_details(&product(1, "Salt", 20.0, Some(0)));
        assert!(html.contains("<strong>Status:</strong> Out of Stock"));
    }
}
