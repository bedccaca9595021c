use std::fmt::Display;

use crate::entity::{BookId, OrderStatus};

/// Expected business refusals of the cart engine. These are values carried in
/// the success channel of an operation, not errors: the caller renders them
/// to the shopper and nothing is logged above `warn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartRejection {
    BookNotFound,
    BookInactive,
    OutOfStock,
    InsufficientStock { available: i32, in_cart: i32 },
    QuantityLimitExceeded { limit: i32, in_cart: i32 },
    ItemNotFound,
}

impl CartRejection {
    /// Stable machine-readable code for the wire.
    pub fn code(&self) -> &'static str {
        match self {
            CartRejection::BookNotFound => "BOOK_NOT_FOUND",
            CartRejection::BookInactive => "BOOK_INACTIVE",
            CartRejection::OutOfStock => "OUT_OF_STOCK",
            CartRejection::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            CartRejection::QuantityLimitExceeded { .. } => "QUANTITY_LIMIT_EXCEEDED",
            CartRejection::ItemNotFound => "ITEM_NOT_FOUND",
        }
    }
}

impl Display for CartRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartRejection::BookNotFound => write!(f, "This book does not exist"),
            CartRejection::BookInactive => write!(f, "This book is no longer for sale"),
            CartRejection::OutOfStock => write!(f, "This book is out of stock"),
            CartRejection::InsufficientStock { available, in_cart } if *in_cart > 0 => write!(
                f,
                "Only {available} left in stock. You already have {in_cart} in your cart"
            ),
            CartRejection::InsufficientStock { available, .. } => {
                write!(f, "Only {available} left in stock")
            }
            CartRejection::QuantityLimitExceeded { limit, in_cart } if *in_cart > 0 => write!(
                f,
                "You can buy at most {limit} copies of this book. You already have {in_cart} in your cart"
            ),
            CartRejection::QuantityLimitExceeded { limit, .. } => {
                write!(f, "You can buy at most {limit} copies of this book")
            }
            CartRejection::ItemNotFound => write!(f, "This item is not in your cart"),
        }
    }
}

/// Expected business refusals of the order engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRejection {
    EmptyCart,
    InsufficientStock {
        book_id: BookId,
        available: i32,
        requested: i32,
    },
    NotFound,
    NotCancellable {
        status: OrderStatus,
    },
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl OrderRejection {
    pub fn code(&self) -> &'static str {
        match self {
            OrderRejection::EmptyCart => "EMPTY_CART",
            OrderRejection::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            OrderRejection::NotFound => "ORDER_NOT_FOUND",
            OrderRejection::NotCancellable { .. } => "NOT_CANCELLABLE",
            OrderRejection::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

impl Display for OrderRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderRejection::EmptyCart => write!(f, "Your cart is empty"),
            OrderRejection::InsufficientStock {
                available,
                requested,
                ..
            } => write!(
                f,
                "Not enough stock to fulfil the order: {requested} requested, {available} available"
            ),
            OrderRejection::NotFound => write!(f, "Order not found"),
            OrderRejection::NotCancellable { status } => {
                write!(f, "This order can no longer be cancelled (status: {status})")
            }
            OrderRejection::InvalidTransition { from, to } => {
                write!(f, "An order cannot move from {from} to {to}")
            }
        }
    }
}
