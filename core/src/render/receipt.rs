//! Printable receipt: a standalone HTML document for one order.

use chrono::NaiveDateTime;

use super::format::{escape_html, format_currency, format_datetime, format_quantity};
use crate::types::OrderDetail;

const STORE_NAME: &str = "Grocery Store";

const RECEIPT_STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }
.header { text-align: center; border-bottom: 2px solid #333; padding-bottom: 10px; margin-bottom: 20px; }
.order-info { margin-bottom: 20px; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; }
.total { font-weight: bold; font-size: 1.2em; }
.footer { text-align: center; margin-top: 30px; border-top: 1px solid #ccc; padding-top: 10px; }
@media print { body { margin: 0; } }";

/// `generated_at` is printed in the footer.
pub fn render_receipt(order: &OrderDetail, generated_at: NaiveDateTime) -> String {
    let rows: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&item.product_name),
                escape_html(&item.uom_name),
                format_quantity(item.quantity),
                format_currency(item.total_price),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>Order Receipt #{id}</title>
<style>
{style}
</style>
</head>
<body>
<div class="header">
    <h1>{store}</h1>
    <h2>Order Receipt</h2>
</div>
<div class="order-info">
    <p><strong>Order ID:</strong> #{id}</p>
    <p><strong>Customer:</strong> {customer}</p>
    <p><strong>Date:</strong> {date}</p>
</div>
<table>
<thead><tr><th>Product</th><th>Unit</th><th>Quantity</th><th>Price</th></tr></thead>
<tbody>
{rows}</tbody>
<tfoot><tr class="total"><td colspan="3">Total:</td><td>{total}</td></tr></tfoot>
</table>
<div class="footer">
    <p>Thank you for your business!</p>
    <p><small>Generated on {generated}</small></p>
</div>
</body>
</html>
"#,
        id = order.order_id,
        style = RECEIPT_STYLE,
        store = STORE_NAME,
        customer = escape_html(&order.customer_name),
        date = format_datetime(&order.datetime),
        total = format_currency(order.total),
        generated = format_datetime(&generated_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderLine;
    use chrono::NaiveDate;

    #[test]
    fn receipt_lists_items_and_footer() {
        let placed = NaiveDate::from_ymd_opt(2024, 10, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let order = OrderDetail {
            order_id: 12,
            customer_id: Some(1),
            customer_name: "Asha & Sons".into(),
            total: 90.0,
            datetime: placed,
            items: vec![OrderLine {
                product_id: 2,
                product_name: "Sugar".into(),
                quantity: 2.0,
                uom_name: "kg".into(),
                total_price: 90.0,
            }],
        };
        let html = render_receipt(&order, placed);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Order Receipt #12</title>"));
        assert!(html.contains("Asha &amp; Sons"));
        assert!(html.contains("<tr><td>Sugar</td><td>kg</td><td>2</td><td>₹90</td></tr>"));
        assert!(html.contains("Generated on 15/10/2024, 10:30:00"));
    }
}
