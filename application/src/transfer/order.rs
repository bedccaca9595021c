use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::outcome::CartRejection;
use kernel::prelude::entity::{
    DestructOrder, DestructOrderItem, Order, OrderItem, OrderStatus, PaymentMethod, SelectLimit,
    SelectOffset, ShippingAddress,
};

#[derive(Debug, Clone)]
pub struct OrderDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub number: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub shipping: ShippingAddressDto,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
    pub created_at: OffsetDateTime,
    pub items: Vec<OrderItemDto>,
}

impl OrderDto {
    pub fn from_parts(order: Order, items: Vec<OrderItem>) -> Self {
        let DestructOrder {
            id,
            user_id,
            number,
            status,
            shipping,
            payment,
            pricing,
            created_at,
        } = order.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            number: number.into(),
            status,
            payment_method: payment,
            shipping: ShippingAddressDto::from(shipping),
            subtotal: *pricing.subtotal(),
            tax: *pricing.tax(),
            shipping_fee: *pricing.shipping_fee(),
            total: *pricing.total(),
            created_at: *created_at.as_ref(),
            items: items.into_iter().map(OrderItemDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderItemDto {
    pub book_id: Uuid,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(value: OrderItem) -> Self {
        let DestructOrderItem {
            book_id,
            title,
            quantity,
            unit_price,
            ..
        } = value.into_destruct();
        let quantity: i32 = quantity.into();
        let unit_price: Decimal = unit_price.into();
        Self {
            book_id: book_id.into(),
            title: title.into(),
            quantity,
            unit_price,
            line_total: unit_price * Decimal::from(quantity),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderSummaryDto {
    pub id: Uuid,
    pub number: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: OffsetDateTime,
}

impl From<Order> for OrderSummaryDto {
    fn from(value: Order) -> Self {
        let DestructOrder {
            id,
            number,
            status,
            pricing,
            created_at,
            ..
        } = value.into_destruct();
        Self {
            id: id.into(),
            number: number.into(),
            status,
            total: *pricing.total(),
            created_at: *created_at.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShippingAddressDto {
    pub recipient: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
}

impl From<ShippingAddress> for ShippingAddressDto {
    fn from(value: ShippingAddress) -> Self {
        Self {
            recipient: value.recipient().clone(),
            phone: value.phone().clone(),
            line1: value.line1().clone(),
            line2: value.line2().clone(),
            city: value.city().clone(),
            country: value.country().clone(),
        }
    }
}

impl From<ShippingAddressDto> for ShippingAddress {
    fn from(value: ShippingAddressDto) -> Self {
        ShippingAddress::new(
            value.recipient,
            value.phone,
            value.line1,
            value.line2,
            value.city,
            value.country,
        )
    }
}

#[derive(Debug)]
pub struct CreateOrderDto {
    pub user_id: Uuid,
    pub shipping: ShippingAddressDto,
    pub payment_method: PaymentMethod,
}

#[derive(Debug)]
pub struct GetOrderDto {
    pub order_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug)]
pub struct GetUserOrdersDto {
    pub user_id: Uuid,
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

#[derive(Debug)]
pub struct CancelOrderDto {
    pub order_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug)]
pub struct ReorderDto {
    pub order_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct ReorderedDto {
    pub item_count: i32,
    pub failures: Vec<ReorderFailureDto>,
}

#[derive(Debug, Clone)]
pub struct ReorderFailureDto {
    pub book_id: Uuid,
    pub reason: CartRejection,
}

#[derive(Debug)]
pub struct UpdateOrderStatusDto {
    pub order_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug, Clone)]
pub struct OrderStatusDto {
    pub order_id: Uuid,
    pub status: OrderStatus,
}
