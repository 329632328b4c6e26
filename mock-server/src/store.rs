//! In-memory tables and the validation rules of the grocery API.
//!
//! Request bodies arrive as loose JSON: numbers may be sent as numbers or as
//! numeric strings, so inputs are read from `serde_json::Value` rather than
//! typed extractors. Decimals go back out as two-place strings and order
//! timestamps as HTTP dates, the same shapes a SQL-backed deployment emits.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::AppError;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Customer {
    pub customer_id: u64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Uom {
    pub uom_id: u64,
    pub uom_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub product_id: u64,
    pub name: String,
    pub uom_id: u64,
    pub price_per_unit: f64,
    pub stock_quantity: Option<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderItem {
    pub product_id: u64,
    pub quantity: f64,
    pub total_price: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub order_id: u64,
    pub customer_id: u64,
    pub total: f64,
    pub datetime: NaiveDateTime,
    pub items: Vec<OrderItem>,
}

/// A product joined with its unit name.
#[derive(Clone, Debug, Serialize)]
pub struct ProductView {
    pub product_id: u64,
    pub name: String,
    pub uom_id: u64,
    #[serde(serialize_with = "decimal")]
    pub price_per_unit: f64,
    pub uom_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderSummaryView {
    pub order_id: u64,
    pub customer_id: u64,
    pub customer_name: String,
    #[serde(serialize_with = "decimal")]
    pub total: f64,
    #[serde(serialize_with = "http_date")]
    pub datetime: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderLineView {
    pub product_id: u64,
    pub product_name: String,
    #[serde(serialize_with = "decimal")]
    pub quantity: f64,
    pub uom_name: String,
    #[serde(serialize_with = "decimal")]
    pub total_price: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderDetailView {
    #[serde(flatten)]
    pub summary: OrderSummaryView,
    pub items: Vec<OrderLineView>,
}

fn decimal<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

fn http_date<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Present and not empty, zero, false or null.
fn is_set(data: &Value, key: &str) -> bool {
    match data.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Bool(b)) => *b,
        Some(_) => true,
    }
}

fn text(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number(data: &Value, key: &str) -> Option<f64> {
    let value = match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|n| n.is_finite())
}

fn id(data: &Value, key: &str) -> Option<u64> {
    number(data, key).filter(|n| n.fract() == 0.0 && *n > 0.0).map(|n| n as u64)
}

fn require(data: &Value, fields: &[&str]) -> Result<(), AppError> {
    match fields.iter().find(|field| !is_set(data, field)) {
        Some(field) => Err(AppError::bad_request(format!("Missing required field: {field}"))),
        None => Ok(()),
    }
}

struct CustomerInput {
    name: String,
    phone: String,
    email: String,
    address: String,
}

impl CustomerInput {
    fn parse(data: &Value) -> Result<Self, AppError> {
        if !is_set(data, "name") {
            return Err(AppError::bad_request("Customer name is required"));
        }
        let input = Self {
            name: text(data, "name"),
            phone: text(data, "phone"),
            email: text(data, "email"),
            address: text(data, "address"),
        };
        if !(1..=100).contains(&input.name.chars().count()) {
            return Err(AppError::bad_request("Customer name must be between 1 and 100 characters"));
        }
        if !input.phone.is_empty() && !(10..=15).contains(&input.phone.chars().count()) {
            return Err(AppError::bad_request("Phone number must be between 10 and 15 characters"));
        }
        if !input.email.is_empty() && (!input.email.contains('@') || input.email.chars().count() > 100) {
            return Err(AppError::bad_request("Invalid email format or email too long"));
        }
        if input.address.chars().count() > 500 {
            return Err(AppError::bad_request("Address too long (max 500 characters)"));
        }
        Ok(input)
    }
}

struct ProductInput {
    name: String,
    uom_id: u64,
    price_per_unit: f64,
    stock_quantity: Option<i64>,
}

impl ProductInput {
    fn parse(data: &Value) -> Result<Self, AppError> {
        require(data, &["name", "uom_id", "price_per_unit"])?;
        let (Some(uom_id), Some(price_per_unit)) = (id(data, "uom_id"), number(data, "price_per_unit")) else {
            return Err(AppError::bad_request("Invalid data types for uom_id or price_per_unit"));
        };
        if price_per_unit <= 0.0 {
            return Err(AppError::bad_request("Price must be greater than 0"));
        }
        let name = text(data, "name");
        if !(1..=45).contains(&name.chars().count()) {
            return Err(AppError::bad_request("Product name must be between 1 and 45 characters"));
        }
        let stock_quantity = match number(data, "stock_quantity") {
            Some(stock) if stock < 0.0 => {
                return Err(AppError::bad_request("Stock quantity cannot be negative"))
            }
            stock => stock.map(|s| s as i64),
        };
        Ok(Self {
            name,
            uom_id,
            price_per_unit,
            stock_quantity,
        })
    }
}

#[derive(Debug, Default)]
pub struct Store {
    customers: BTreeMap<u64, Customer>,
    products: BTreeMap<u64, Product>,
    uom: Vec<Uom>,
    orders: BTreeMap<u64, Order>,
    last_id: u64,
}

impl Store {
    /// An empty store with the standard units of measure.
    pub fn seeded() -> Self {
        let uom = [(1, "kg"), (2, "each"), (3, "litre"), (4, "gram")]
            .into_iter()
            .map(|(uom_id, name)| Uom {
                uom_id,
                uom_name: name.to_string(),
            })
            .collect();
        Self {
            uom,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn uom(&self) -> &[Uom] {
        &self.uom
    }

    fn uom_name(&self, uom_id: u64) -> String {
        self.uom
            .iter()
            .find(|u| u.uom_id == uom_id)
            .map(|u| u.uom_name.clone())
            .unwrap_or_default()
    }

    pub fn customers(&self) -> Vec<Customer> {
        let mut customers: Vec<_> = self.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        customers
    }

    pub fn customer(&self, customer_id: u64) -> Result<Customer, AppError> {
        self.customers
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Customer"))
    }

    pub fn insert_customer(&mut self, data: &Value) -> Result<u64, AppError> {
        let input = CustomerInput::parse(data)?;
        let customer_id = self.next_id();
        self.customers.insert(
            customer_id,
            Customer {
                customer_id,
                name: input.name,
                phone: input.phone,
                email: input.email,
                address: input.address,
            },
        );
        Ok(customer_id)
    }

    pub fn update_customer(&mut self, customer_id: u64, data: &Value) -> Result<(), AppError> {
        let input = CustomerInput::parse(data)?;
        let customer = self
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| AppError::not_found("Customer"))?;
        customer.name = input.name;
        customer.phone = input.phone;
        customer.email = input.email;
        customer.address = input.address;
        Ok(())
    }

    pub fn delete_customer(&mut self, customer_id: u64) -> Result<(), AppError> {
        if !self.customers.contains_key(&customer_id) {
            return Err(AppError::not_found("Customer"));
        }
        if self.orders.values().any(|o| o.customer_id == customer_id) {
            return Err(AppError::bad_request("Cannot delete customer. Customer has existing orders."));
        }
        self.customers.remove(&customer_id);
        Ok(())
    }

    fn product_view(&self, product: &Product) -> ProductView {
        ProductView {
            product_id: product.product_id,
            name: product.name.clone(),
            uom_id: product.uom_id,
            price_per_unit: product.price_per_unit,
            uom_name: self.uom_name(product.uom_id),
            stock_quantity: product.stock_quantity,
        }
    }

    pub fn products(&self) -> Vec<ProductView> {
        let mut products: Vec<_> = self.products.values().map(|p| self.product_view(p)).collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    pub fn product(&self, product_id: u64) -> Result<ProductView, AppError> {
        self.products
            .get(&product_id)
            .map(|p| self.product_view(p))
            .ok_or_else(|| AppError::not_found("Product"))
    }

    fn checked_product(&self, data: &Value) -> Result<ProductInput, AppError> {
        let input = ProductInput::parse(data)?;
        if !self.uom.iter().any(|u| u.uom_id == input.uom_id) {
            return Err(AppError::bad_request("Invalid UOM ID"));
        }
        Ok(input)
    }

    pub fn insert_product(&mut self, data: &Value) -> Result<u64, AppError> {
        let input = self.checked_product(data)?;
        let product_id = self.next_id();
        self.products.insert(
            product_id,
            Product {
                product_id,
                name: input.name,
                uom_id: input.uom_id,
                price_per_unit: input.price_per_unit,
                stock_quantity: input.stock_quantity,
            },
        );
        Ok(product_id)
    }

    pub fn update_product(&mut self, product_id: u64, data: &Value) -> Result<(), AppError> {
        let input = self.checked_product(data)?;
        let product = self
            .products
            .get_mut(&product_id)
            .ok_or_else(|| AppError::not_found("Product"))?;
        product.name = input.name;
        product.uom_id = input.uom_id;
        product.price_per_unit = input.price_per_unit;
        if input.stock_quantity.is_some() {
            product.stock_quantity = input.stock_quantity;
        }
        Ok(())
    }

    /// Removes the product and returns its name. Products that appear in
    /// any order are kept.
    pub fn delete_product(&mut self, product_id: u64) -> Result<String, AppError> {
        let name = self
            .products
            .get(&product_id)
            .map(|p| p.name.clone())
            .ok_or_else(|| AppError::not_found("Product"))?;
        let uses = self
            .orders
            .values()
            .flat_map(|o| &o.items)
            .filter(|item| item.product_id == product_id)
            .count();
        if uses > 0 {
            return Err(
                AppError::bad_request("Cannot delete product. It is referenced in existing orders.").with_details(
                    format!("Product '{name}' cannot be deleted because it appears in {uses} existing order(s)."),
                ),
            );
        }
        self.products.remove(&product_id);
        Ok(name)
    }

    fn order_summary(&self, order: &Order) -> OrderSummaryView {
        OrderSummaryView {
            order_id: order.order_id,
            customer_id: order.customer_id,
            customer_name: self
                .customers
                .get(&order.customer_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            total: order.total,
            datetime: order.datetime,
        }
    }

    /// Newest first.
    pub fn orders(&self) -> Vec<OrderSummaryView> {
        let mut orders: Vec<_> = self.orders.values().collect();
        orders.sort_by(|a, b| b.datetime.cmp(&a.datetime).then(b.order_id.cmp(&a.order_id)));
        orders.into_iter().map(|o| self.order_summary(o)).collect()
    }

    pub fn order(&self, order_id: u64) -> Result<OrderDetailView, AppError> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or_else(|| AppError::not_found("Order"))?;
        let items = order
            .items
            .iter()
            .map(|item| {
                let product = self.products.get(&item.product_id);
                OrderLineView {
                    product_id: item.product_id,
                    product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    quantity: item.quantity,
                    uom_name: product.map(|p| self.uom_name(p.uom_id)).unwrap_or_default(),
                    total_price: item.total_price,
                }
            })
            .collect();
        Ok(OrderDetailView {
            summary: self.order_summary(order),
            items,
        })
    }

    pub fn insert_order(&mut self, data: &Value, placed_at: NaiveDateTime) -> Result<u64, AppError> {
        require(data, &["customer_id", "total", "items"])?;
        let customer_id = id(data, "customer_id")
            .filter(|id| self.customers.contains_key(id))
            .ok_or_else(|| AppError::bad_request("Invalid customer_id"))?;
        let total = number(data, "total").ok_or_else(|| AppError::bad_request("Invalid order total"))?;
        let lines = data
            .get("items")
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .ok_or_else(|| AppError::bad_request("Order must contain at least one item"))?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let product_id = id(line, "product_id")
                .filter(|id| self.products.contains_key(id))
                .ok_or_else(|| AppError::bad_request(format!("Invalid product_id: {}", text(line, "product_id"))))?;
            let quantity = number(line, "quantity")
                .filter(|q| *q > 0.0)
                .ok_or_else(|| AppError::bad_request("Quantity must be greater than 0"))?;
            let total_price = number(line, "total_price")
                .ok_or_else(|| AppError::bad_request("Invalid total_price"))?;
            items.push(OrderItem {
                product_id,
                quantity,
                total_price,
            });
        }

        let order_id = self.next_id();
        self.orders.insert(
            order_id,
            Order {
                order_id,
                customer_id,
                total,
                datetime: placed_at,
                items,
            },
        );
        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn placed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn store_with_order() -> (Store, u64, u64) {
        let mut store = Store::seeded();
        let customer = store.insert_customer(&json!({"name": "Asha"})).unwrap();
        let product = store
            .insert_product(&json!({"name": "Rice", "uom_id": 1, "price_per_unit": "45.5"}))
            .unwrap();
        store
            .insert_order(
                &json!({"customer_id": customer, "total": 91, "items": [
                    {"product_id": product, "quantity": 2, "total_price": 91}
                ]}),
                placed(),
            )
            .unwrap();
        (store, customer, product)
    }

    #[test]
    fn product_validation_messages() {
        let mut store = Store::seeded();
        let err = |data: Value, store: &mut Store| store.insert_product(&data).unwrap_err().body.error;
        assert_eq!(err(json!({"name": "Rice", "uom_id": 1}), &mut store), "Missing required field: price_per_unit");
        assert_eq!(
            err(json!({"name": "Rice", "uom_id": "x", "price_per_unit": 2}), &mut store),
            "Invalid data types for uom_id or price_per_unit"
        );
        assert_eq!(
            err(json!({"name": "Rice", "uom_id": 1, "price_per_unit": -2}), &mut store),
            "Price must be greater than 0"
        );
        assert_eq!(
            err(json!({"name": "Rice", "uom_id": 99, "price_per_unit": 2}), &mut store),
            "Invalid UOM ID"
        );
    }

    #[test]
    fn customer_validation_messages() {
        let mut store = Store::seeded();
        let err = store.insert_customer(&json!({"name": ""})).unwrap_err();
        assert_eq!(err.body.error, "Customer name is required");
        let err = store
            .insert_customer(&json!({"name": "Asha", "phone": "12345"}))
            .unwrap_err();
        assert_eq!(err.body.error, "Phone number must be between 10 and 15 characters");
        let err = store
            .insert_customer(&json!({"name": "Asha", "email": "asha.example.com"}))
            .unwrap_err();
        assert_eq!(err.body.error, "Invalid email format or email too long");
    }

    #[test]
    fn referenced_product_cannot_be_deleted() {
        let (mut store, _, product) = store_with_order();
        let err = store.delete_product(product).unwrap_err();
        assert_eq!(err.body.error, "Cannot delete product. It is referenced in existing orders.");
        assert_eq!(
            err.body.details.as_deref(),
            Some("Product 'Rice' cannot be deleted because it appears in 1 existing order(s).")
        );
        assert!(store.product(product).is_ok());
    }

    #[test]
    fn customer_with_orders_cannot_be_deleted() {
        let (mut store, customer, _) = store_with_order();
        let err = store.delete_customer(customer).unwrap_err();
        assert!(err.body.error.contains("has existing orders"));
    }

    #[test]
    fn order_detail_joins_names_and_formats_wire_values() {
        let (store, _, _) = store_with_order();
        let order = store.orders()[0].order_id;
        let json = serde_json::to_value(store.order(order).unwrap()).unwrap();
        assert_eq!(json["customer_name"], "Asha");
        assert_eq!(json["total"], "91.00");
        assert_eq!(json["datetime"], "Tue, 15 Oct 2024 10:30:00 GMT");
        assert_eq!(json["items"][0]["product_name"], "Rice");
        assert_eq!(json["items"][0]["uom_name"], "kg");
        assert_eq!(json["items"][0]["quantity"], "2.00");
    }

    #[test]
    fn order_requires_known_customer_and_items() {
        let (mut store, customer, _) = store_with_order();
        let err = store
            .insert_order(&json!({"customer_id": 999, "total": 1, "items": [{}]}), placed())
            .unwrap_err();
        assert_eq!(err.body.error, "Invalid customer_id");
        let err = store
            .insert_order(&json!({"customer_id": customer, "total": 1, "items": []}), placed())
            .unwrap_err();
        assert_eq!(err.body.error, "Order must contain at least one item");
    }
}
