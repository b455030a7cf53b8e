//! Purchase order commands.

use chrono::NaiveDate;
use common::VendorId;

use super::{CurrencyCode, LineItem, PaymentTerms, ShippingMethod};
use crate::money::Money;

/// Command to place a new purchase order.
#[derive(Debug, Clone)]
pub struct CreatePurchaseOrder {
    /// The vendor the order is placed with. Must exist.
    pub vendor_id: VendorId,

    /// Ordered lines with their point-in-time prices.
    pub lines: Vec<LineItem>,

    /// Order date; defaults to today.
    pub order_date: Option<NaiveDate>,

    /// Requested delivery date.
    pub delivery_date: Option<NaiveDate>,

    pub payment_terms: PaymentTerms,
    pub shipping_method: ShippingMethod,
    pub currency: CurrencyCode,

    /// Shipping cost added on top of subtotal and tax.
    pub shipping: Money,
}

impl CreatePurchaseOrder {
    /// Creates a command with default terms (net30, ground, USD, no shipping).
    pub fn new(vendor_id: VendorId, lines: Vec<LineItem>) -> Self {
        Self {
            vendor_id,
            lines,
            order_date: None,
            delivery_date: None,
            payment_terms: PaymentTerms::default(),
            shipping_method: ShippingMethod::default(),
            currency: CurrencyCode::default(),
            shipping: Money::zero(),
        }
    }

    pub fn order_date(mut self, date: NaiveDate) -> Self {
        self.order_date = Some(date);
        self
    }

    pub fn delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Some(date);
        self
    }

    pub fn payment_terms(mut self, terms: PaymentTerms) -> Self {
        self.payment_terms = terms;
        self
    }

    pub fn shipping_method(mut self, method: ShippingMethod) -> Self {
        self.shipping_method = method;
        self
    }

    pub fn currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn shipping(mut self, shipping: Money) -> Self {
        self.shipping = shipping;
        self
    }
}
