mod address;
mod id;
mod number;
mod payment;
mod pricing;
mod status;

pub use self::{address::*, id::*, number::*, payment::*, pricing::*, status::*};
use crate::entity::common::CreatedAt;
use crate::entity::{BookId, BookPrice, BookTitle, Quantity, UserId};
use destructure::{Destructure, Mutation};
use vodca::References;

/// Immutable record of a checkout. Everything except `status` is frozen at
/// creation time; line prices are snapshots, immune to later catalog edits.
#[derive(Debug, Clone, PartialEq, References, Destructure, Mutation)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    number: OrderNumber,
    status: OrderStatus,
    shipping: ShippingAddress,
    payment: PaymentMethod,
    pricing: OrderPricing,
    created_at: CreatedAt<Order>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: OrderId,
        user_id: UserId,
        number: OrderNumber,
        status: OrderStatus,
        shipping: ShippingAddress,
        payment: PaymentMethod,
        pricing: OrderPricing,
        created_at: CreatedAt<Order>,
    ) -> Self {
        Self {
            id,
            user_id,
            number,
            status,
            shipping,
            payment,
            pricing,
            created_at,
        }
    }
}

/// One frozen order line.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct OrderItem {
    order_id: OrderId,
    book_id: BookId,
    title: BookTitle,
    quantity: Quantity,
    unit_price: BookPrice,
}

impl OrderItem {
    pub fn new(
        order_id: OrderId,
        book_id: BookId,
        title: BookTitle,
        quantity: Quantity,
        unit_price: BookPrice,
    ) -> Self {
        Self {
            order_id,
            book_id,
            title,
            quantity,
            unit_price,
        }
    }
}
