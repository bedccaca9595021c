use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::CartTotals;

/// Money figures captured at checkout. Unlike [`CartTotals`] these are a
/// snapshot: they never change with the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, References)]
pub struct OrderPricing {
    subtotal: Decimal,
    tax: Decimal,
    shipping_fee: Decimal,
    total: Decimal,
}

impl OrderPricing {
    pub fn new(subtotal: Decimal, tax: Decimal, shipping_fee: Decimal, total: Decimal) -> Self {
        Self {
            subtotal,
            tax,
            shipping_fee,
            total,
        }
    }
}

impl From<&CartTotals> for OrderPricing {
    fn from(totals: &CartTotals) -> Self {
        Self {
            subtotal: *totals.subtotal(),
            tax: *totals.tax(),
            shipping_fee: *totals.shipping(),
            total: *totals.total(),
        }
    }
}
