use rust_decimal::Decimal;
use serde::Serialize;
use vodca::References;

/// 10% VAT applied on the subtotal.
fn tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Orders at or above this subtotal ship for free.
fn free_shipping_threshold() -> Decimal {
    Decimal::new(299_000, 0)
}

/// Flat fee below the free-shipping threshold.
fn shipping_fee() -> Decimal {
    Decimal::new(30_000, 0)
}

/// Derived money figures of a cart. Computed from live lines on every read,
/// never persisted on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, References)]
pub struct CartTotals {
    subtotal: Decimal,
    tax: Decimal,
    shipping: Decimal,
    total: Decimal,
    item_count: i32,
}

impl CartTotals {
    /// `lines` yields `(unit price, quantity)` per cart line.
    pub fn from_lines(lines: impl IntoIterator<Item = (Decimal, i32)>) -> Self {
        let mut subtotal = Decimal::ZERO;
        let mut item_count = 0;
        for (unit_price, quantity) in lines {
            subtotal += unit_price * Decimal::from(quantity);
            item_count += quantity;
        }
        let tax = subtotal * tax_rate();
        let shipping = if subtotal >= free_shipping_threshold() || subtotal == Decimal::ZERO {
            Decimal::ZERO
        } else {
            shipping_fee()
        };
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
            item_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub fn qualifies_for_free_shipping(&self) -> bool {
        self.subtotal >= free_shipping_threshold()
    }

    /// How much more the owner must add to ship for free.
    pub fn amount_for_free_shipping(&self) -> Decimal {
        (free_shipping_threshold() - self.subtotal).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use super::CartTotals;

    #[test]
    fn totals_derive_tax_and_shipping() {
        let totals = CartTotals::from_lines([(Decimal::new(100_000, 0), 2)]);
        assert_eq!(totals.subtotal(), &Decimal::new(200_000, 0));
        assert_eq!(totals.tax(), &Decimal::new(20_000, 0));
        assert_eq!(totals.shipping(), &Decimal::new(30_000, 0));
        assert_eq!(totals.total(), &Decimal::new(250_000, 0));
        assert_eq!(totals.item_count(), &2);
        assert!(!totals.qualifies_for_free_shipping());
        assert_eq!(
            totals.amount_for_free_shipping(),
            Decimal::new(99_000, 0)
        );
    }

    #[test]
    fn shipping_is_free_at_exactly_the_threshold() {
        let totals = CartTotals::from_lines([(Decimal::new(299_000, 0), 1)]);
        assert_eq!(totals.shipping(), &Decimal::ZERO);
        assert!(totals.qualifies_for_free_shipping());
        assert_eq!(totals.amount_for_free_shipping(), Decimal::ZERO);

        let below = CartTotals::from_lines([(Decimal::new(298_999, 0), 1)]);
        assert_eq!(below.shipping(), &Decimal::new(30_000, 0));
    }

    #[test]
    fn empty_cart_costs_nothing() {
        let totals = CartTotals::from_lines(Vec::<(Decimal, i32)>::new());
        assert!(totals.is_empty());
        assert_eq!(totals.subtotal(), &Decimal::ZERO);
        assert_eq!(totals.shipping(), &Decimal::ZERO);
        assert_eq!(totals.total(), &Decimal::ZERO);
    }
}
