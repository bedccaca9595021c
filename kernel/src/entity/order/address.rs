use serde::{Deserialize, Serialize};
use vodca::References;

/// Destination captured at checkout, frozen with the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, References)]
pub struct ShippingAddress {
    recipient: String,
    phone: String,
    line1: String,
    line2: Option<String>,
    city: String,
    country: String,
}

impl ShippingAddress {
    pub fn new(
        recipient: impl Into<String>,
        phone: impl Into<String>,
        line1: impl Into<String>,
        line2: Option<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            phone: phone.into(),
            line1: line1.into(),
            line2,
            city: city.into(),
            country: country.into(),
        }
    }
}
