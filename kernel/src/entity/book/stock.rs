use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Count of purchasable units. Never negative; decremented at order
/// creation, not at add-to-cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookStock(i32);

impl BookStock {
    pub fn new(stock: impl Into<i32>) -> Self {
        Self(stock.into())
    }
}
