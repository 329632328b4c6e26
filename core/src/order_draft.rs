//! An order being assembled before submission.

use thiserror::Error;

use crate::types::{NewOrder, NewOrderItem, Product};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("Please select a product and enter a valid quantity")]
    InvalidQuantity,
    #[error("Please add at least one item to the order")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    pub product_id: u64,
    pub product_name: String,
    pub uom_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    items: Vec<DraftItem>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` of `product`. A product already in the draft has its
    /// quantity and line total replaced rather than accumulated.
    pub fn add_item(&mut self, product: &Product, quantity: f64) -> Result<(), DraftError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(DraftError::InvalidQuantity);
        }
        let total_price = quantity * product.price_per_unit;

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.product_id)
        {
            Some(existing) => {
                existing.quantity = quantity;
                existing.total_price = total_price;
            }
            None => self.items.push(DraftItem {
                product_id: product.product_id,
                product_name: product.name.clone(),
                uom_name: product.uom_name.clone(),
                quantity,
                unit_price: product.price_per_unit,
                total_price,
            }),
        }
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Option<DraftItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.total_price).sum()
    }

    pub fn to_new_order(&self, customer_id: u64) -> Result<NewOrder, DraftError> {
        if self.items.is_empty() {
            return Err(DraftError::Empty);
        }
        Ok(NewOrder {
            customer_id,
            total: self.total(),
            items: self
                .items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    total_price: item.total_price,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, price: f64) -> Product {
        Product {
            product_id: id,
            name: format!("P{id}"),
            uom_id: Some(1),
            price_per_unit: price,
            uom_name: "kg".into(),
            stock_quantity: None,
        }
    }

    #[test]
    fn rejects_non_positive_quantities() {
        let mut draft = OrderDraft::new();
        for quantity in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(draft.add_item(&product(1, 10.0), quantity), Err(DraftError::InvalidQuantity));
        }
        assert!(draft.is_empty());
    }

    #[test]
    fn readding_a_product_replaces_its_line() {
        let mut draft = OrderDraft::new();
        draft.add_item(&product(1, 10.0), 2.0).unwrap();
        draft.add_item(&product(2, 5.0), 1.0).unwrap();
        draft.add_item(&product(1, 10.0), 3.0).unwrap();

        assert_eq!(draft.items().len(), 2);
        assert_eq!(draft.items()[0].quantity, 3.0);
        assert_eq!(draft.total(), 35.0);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut draft = OrderDraft::new();
        draft.add_item(&product(1, 10.0), 1.0).unwrap();
        assert!(draft.remove_item(5).is_none());
        assert_eq!(draft.remove_item(0).map(|i| i.product_id), Some(1));
        assert!(draft.is_empty());
    }

    #[test]
    fn new_order_requires_items() {
        let mut draft = OrderDraft::new();
        assert_eq!(draft.to_new_order(1), Err(DraftError::Empty));

        draft.add_item(&product(4, 2.5), 4.0).unwrap();
        let order = draft.to_new_order(7).unwrap();
        assert_eq!(order.customer_id, 7);
        assert_eq!(order.total, 10.0);
        assert_eq!(order.items[0].product_id, 4);
        assert_eq!(order.items[0].total_price, 10.0);
    }
}
