//! The purchase order entity and its patch.

use chrono::NaiveDate;
use common::{PurchaseOrderId, VendorId};
use serde::{Deserialize, Deserializer, Serialize};

use super::{CreatePurchaseOrder, CurrencyCode, LineItem, OrderStatus, PaymentTerms, ShippingMethod};
use crate::error::{DomainError, Result};
use crate::money::{Money, TaxPolicy};
use crate::store::{Entity, Patch};

/// A commitment to buy line items from a vendor.
///
/// Subtotal, tax and total are derived from the lines, the tax policy and
/// the shipping cost. They have no setters; every change that could affect
/// them goes through [`PurchaseOrder::recalculate_totals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOrder {
    id: PurchaseOrderId,
    vendor_id: VendorId,
    order_date: NaiveDate,
    delivery_date: Option<NaiveDate>,
    status: OrderStatus,
    payment_terms: PaymentTerms,
    shipping_method: ShippingMethod,
    currency: CurrencyCode,
    lines: Vec<LineItem>,
    tax_policy: TaxPolicy,
    shipping: Money,
    subtotal: Money,
    tax: Money,
    total: Money,
}

impl PurchaseOrder {
    /// Validates a command and builds an open order from it.
    ///
    /// Fails with `EmptyOrder` when there are no lines or any quantity is
    /// zero, and with `InvalidArgument` for negative prices or shipping.
    /// Vendor existence is the caller's concern.
    pub fn place(
        id: PurchaseOrderId,
        cmd: CreatePurchaseOrder,
        order_date: NaiveDate,
        tax_policy: TaxPolicy,
    ) -> Result<Self> {
        if cmd.lines.is_empty() || cmd.lines.iter().any(|line| line.quantity == 0) {
            return Err(DomainError::EmptyOrder);
        }
        if let Some(line) = cmd.lines.iter().find(|line| line.unit_price.is_negative()) {
            return Err(DomainError::invalid(format!(
                "unit price for {} must not be negative",
                line.item_id
            )));
        }
        validate_shipping(cmd.shipping)?;

        let mut order = Self {
            id,
            vendor_id: cmd.vendor_id,
            order_date: cmd.order_date.unwrap_or(order_date),
            delivery_date: cmd.delivery_date,
            status: OrderStatus::Open,
            payment_terms: cmd.payment_terms,
            shipping_method: cmd.shipping_method,
            currency: cmd.currency,
            lines: cmd.lines,
            tax_policy,
            shipping: cmd.shipping,
            subtotal: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        };
        order.recalculate_totals()?;
        Ok(order)
    }

    /// Recomputes subtotal, tax and total, failing if any of them overflows.
    fn recalculate_totals(&mut self) -> Result<()> {
        let overflow = || DomainError::invalid("order total exceeds the largest supported amount");

        let subtotal = self
            .lines
            .iter()
            .try_fold(Money::zero(), |acc, line| acc.checked_add(line.checked_total()?))
            .ok_or_else(overflow)?;
        let tax = self.tax_policy.tax_on(subtotal).ok_or_else(overflow)?;
        let total = subtotal
            .checked_add(tax)
            .and_then(|sum| sum.checked_add(self.shipping))
            .ok_or_else(overflow)?;

        self.subtotal = subtotal;
        self.tax = tax;
        self.total = total;
        Ok(())
    }

    pub fn id(&self) -> &PurchaseOrderId {
        &self.id
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }

    pub fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivery_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    pub fn payment_terms(&self) -> PaymentTerms {
        self.payment_terms
    }

    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn tax_policy(&self) -> TaxPolicy {
        self.tax_policy
    }

    pub fn shipping(&self) -> Money {
        self.shipping
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseOrderId;
    const KIND: &'static str = "Purchase order";

    fn id(&self) -> &PurchaseOrderId {
        &self.id
    }

    fn sequence(&self) -> Option<u64> {
        self.id.sequence()
    }
}

/// Partial update for a purchase order.
///
/// Only fields that cannot break the derived totals are listed; lines,
/// vendor, currency and the totals themselves are fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurchaseOrderPatch {
    pub status: Option<OrderStatus>,
    pub order_date: Option<NaiveDate>,
    /// `Some(None)` clears the delivery date; on the wire that is an explicit `null`.
    #[serde(default, deserialize_with = "present_or_null")]
    pub delivery_date: Option<Option<NaiveDate>>,
    pub shipping_method: Option<ShippingMethod>,
    #[serde(rename = "shipping_cents")]
    pub shipping: Option<Money>,
}

impl PurchaseOrderPatch {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn shipping(shipping: Money) -> Self {
        Self {
            shipping: Some(shipping),
            ..Default::default()
        }
    }
}

impl Patch<PurchaseOrder> for PurchaseOrderPatch {
    fn apply_to(self, order: &mut PurchaseOrder) -> Result<()> {
        if let Some(next) = self.status {
            if !order.status.can_transition_to(next) {
                return Err(DomainError::InvalidStatusTransition {
                    from: order.status,
                    to: next,
                });
            }
            order.status = next;
        }
        if let Some(date) = self.order_date {
            order.order_date = date;
        }
        if let Some(date) = self.delivery_date {
            order.delivery_date = date;
        }
        if let Some(method) = self.shipping_method {
            order.shipping_method = method;
        }
        if let Some(shipping) = self.shipping {
            validate_shipping(shipping)?;
            order.shipping = shipping;
        }
        order.recalculate_totals()
    }
}

/// Distinguishes a field sent as `null` from one left out.
///
/// Absent fields never reach this function and fall back to `None` through
/// `#[serde(default)]`.
fn present_or_null<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_shipping(shipping: Money) -> Result<()> {
    if shipping.is_negative() {
        return Err(DomainError::invalid("shipping cost must not be negative"));
    }
    Ok(())
}
