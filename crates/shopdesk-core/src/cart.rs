//! Order/sale cart with single-line editing and due calculation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("Product {product_id} is already in the cart")]
    DuplicateProduct { product_id: u64 },

    #[error("Invalid line for product {product_id}: {reason}")]
    InvalidLine { product_id: u64, reason: String },

    #[error("No cart line at index {index}")]
    IndexOutOfRange { index: usize },

    #[error("No cart line is being edited")]
    NotEditing,

    #[error("Advance must not be negative")]
    NegativeAdvance,

    #[error("Cart amount is too large")]
    AmountOverflow,
}

/// One product line of an order or sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: u64,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(product_id: u64, name: &str, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_id,
            name: name.to_string(),
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> Result<Decimal, CartError> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)
            .ok_or(CartError::AmountOverflow)
    }

    fn validate(&self) -> Result<(), CartError> {
        if self.quantity == 0 {
            return Err(CartError::InvalidLine {
                product_id: self.product_id,
                reason: "quantity must be at least 1".to_string(),
            });
        }
        if self.unit_price.is_sign_negative() && !self.unit_price.is_zero() {
            return Err(CartError::InvalidLine {
                product_id: self.product_id,
                reason: "unit price must not be negative".to_string(),
            });
        }
        self.line_total()?;
        Ok(())
    }
}

/// Payment state after the advance is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueStatus {
    /// Fully paid
    Settled,
    /// Money still owed
    Partial,
    /// Advance exceeds the total
    Surplus,
}

impl DueStatus {
    pub fn from_due(due: Decimal) -> Self {
        if due.is_zero() {
            DueStatus::Settled
        } else if due.is_sign_negative() {
            DueStatus::Surplus
        } else {
            DueStatus::Partial
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: usize,
    pub total: Decimal,
    pub advance: Decimal,
    pub due: Decimal,
    pub due_status: DueStatus,
}

/// Body of a summary request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub advance: Decimal,
}

impl SummaryRequest {
    /// Rebuild the cart line by line and summarize it
    pub fn summarize(&self) -> Result<CartSummary, CartError> {
        let mut cart = Cart::new();
        for item in &self.items {
            cart.add(item.clone())?;
        }
        cart.summary(self.advance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
    editing: Option<usize>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position_of(&self, product_id: u64, ignore: Option<usize>) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .find(|(i, item)| Some(*i) != ignore && item.product_id == product_id)
            .map(|(i, _)| i)
    }

    /// Append a new line; a product may appear only once
    pub fn add(&mut self, item: LineItem) -> Result<(), CartError> {
        item.validate()?;
        if self.position_of(item.product_id, None).is_some() {
            return Err(CartError::DuplicateProduct {
                product_id: item.product_id,
            });
        }
        self.items.push(item);
        Ok(())
    }

    /// Start editing the line at `index`
    pub fn begin_edit(&mut self, index: usize) -> Result<&LineItem, CartError> {
        let item = self
            .items
            .get(index)
            .ok_or(CartError::IndexOutOfRange { index })?;
        self.editing = Some(index);
        Ok(item)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Replace the line being edited and leave edit mode
    pub fn commit_edit(&mut self, item: LineItem) -> Result<(), CartError> {
        let index = self.editing.ok_or(CartError::NotEditing)?;
        item.validate()?;
        if self.position_of(item.product_id, Some(index)).is_some() {
            return Err(CartError::DuplicateProduct {
                product_id: item.product_id,
            });
        }
        let slot = self
            .items
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange { index })?;
        *slot = item;
        self.editing = None;
        Ok(())
    }

    /// Remove a line, keeping the edit cursor on the same line when it moves
    pub fn remove(&mut self, index: usize) -> Result<LineItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::IndexOutOfRange { index });
        }
        let removed = self.items.remove(index);

        self.editing = match self.editing {
            Some(e) if e == index => None,
            Some(e) if index < e => Some(e - 1),
            other => other,
        };

        Ok(removed)
    }

    pub fn total(&self) -> Result<Decimal, CartError> {
        self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            sum.checked_add(item.line_total()?)
                .ok_or(CartError::AmountOverflow)
        })
    }

    pub fn summary(&self, advance: Decimal) -> Result<CartSummary, CartError> {
        if advance.is_sign_negative() && !advance.is_zero() {
            return Err(CartError::NegativeAdvance);
        }
        let total = self.total()?;
        let due = total.checked_sub(advance).ok_or(CartError::AmountOverflow)?;
        Ok(CartSummary {
            item_count: self.items.len(),
            total,
            advance,
            due,
            due_status: DueStatus::from_due(due),
        })
    }
}
