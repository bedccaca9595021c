use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Desired units of one book in a cart, `1..=10` once stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }
}
