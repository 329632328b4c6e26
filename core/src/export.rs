//! CSV exports of the entity lists.

use crate::render::format::format_datetime;
use crate::types::{Customer, OrderSummary, Product};

/// A finished export: the suggested download name and the file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: &'static str,
    pub contents: String,
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_csv(headers: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut lines = vec![headers.iter().map(|h| csv_field(h)).collect::<Vec<_>>().join(",")];
    lines.extend(
        rows.into_iter()
            .map(|row| row.iter().map(|v| csv_field(v)).collect::<Vec<_>>().join(",")),
    );
    lines.join("\n")
}

pub fn customers_csv(customers: &[Customer]) -> CsvExport {
    let rows = customers.iter().map(|c| {
        vec![
            c.customer_id.to_string(),
            c.name.clone(),
            c.phone.clone().unwrap_or_default(),
            c.email.clone().unwrap_or_default(),
            c.address.clone().unwrap_or_default(),
        ]
    });
    CsvExport {
        filename: "customers-export.csv",
        contents: to_csv(&["Customer ID", "Name", "Phone", "Email", "Address"], rows),
    }
}

pub fn products_csv(products: &[Product]) -> CsvExport {
    let rows = products.iter().map(|p| {
        vec![
            p.product_id.to_string(),
            p.name.clone(),
            p.uom_name.clone(),
            p.price_per_unit.to_string(),
            p.stock().to_string(),
            p.stock_value().to_string(),
        ]
    });
    CsvExport {
        filename: "products-export.csv",
        contents: to_csv(
            &[
                "Product ID",
                "Name",
                "Unit of Measure",
                "Price per Unit",
                "Stock Quantity",
                "Stock Value",
            ],
            rows,
        ),
    }
}

pub fn orders_csv(orders: &[OrderSummary]) -> CsvExport {
    let rows = orders.iter().map(|o| {
        vec![
            o.order_id.to_string(),
            o.customer_name.clone(),
            format_datetime(&o.datetime),
            o.total.to_string(),
        ]
    });
    CsvExport {
        filename: "orders-export.csv",
        contents: to_csv(&["Order ID", "Customer", "Date", "Total"], rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_export_has_only_headers() {
        let export = customers_csv(&[]);
        assert_eq!(export.filename, "customers-export.csv");
        assert_eq!(export.contents, "Customer ID,Name,Phone,Email,Address");
    }

    #[test]
    fn fields_with_commas_and_quotes_are_quoted() {
        let export = customers_csv(&[Customer {
            customer_id: 1,
            name: "Rao, \"Big\" Stores".into(),
            phone: Some("9876543210".into()),
            email: None,
            address: Some("12 MG Road\nBengaluru".into()),
        }]);
        let expected = "Customer ID,Name,Phone,Email,Address\n\
                        1,\"Rao, \"\"Big\"\" Stores\",9876543210,,\"12 MG Road\nBengaluru\"";
        assert_eq!(export.contents, expected);
    }

    #[test]
    fn products_default_stock_and_value() {
        let export = products_csv(&[Product {
            product_id: 3,
            name: "Rice".into(),
            uom_id: Some(1),
            price_per_unit: 45.5,
            uom_name: "kg".into(),
            stock_quantity: None,
        }]);
        assert_eq!(export.contents.lines().nth(1), Some("3,Rice,kg,45.5,100,4550"));
    }

    #[test]
    fn orders_use_display_dates() {
        let export = orders_csv(&[OrderSummary {
            order_id: 8,
            customer_id: None,
            customer_name: "Asha".into(),
            total: 120.0,
            datetime: NaiveDate::from_ymd_opt(2024, 10, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
        }]);
        assert_eq!(export.contents.lines().nth(1), Some("8,Asha,\"15/10/2024, 10:30:00\",120"));
    }
}
