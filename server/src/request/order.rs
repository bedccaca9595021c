use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CancelOrderDto, CreateOrderDto, GetOrderDto, GetUserOrdersDto, ReorderDto,
    ShippingAddressDto, UpdateOrderStatusDto,
};
use kernel::prelude::entity::{OrderStatus, PaymentMethod, SelectLimit, SelectOffset, UserId};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub recipient: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub country: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Deserialize)]
pub struct GetOrdersRequest {
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

pub struct OrderTransformer;

impl Intake<(UserId, CheckoutRequest)> for OrderTransformer {
    type To = CreateOrderDto;
    fn emit(&self, input: (UserId, CheckoutRequest)) -> Self::To {
        let (user_id, input) = input;
        CreateOrderDto {
            user_id: user_id.into(),
            shipping: ShippingAddressDto {
                recipient: input.recipient,
                phone: input.phone,
                line1: input.line1,
                line2: input.line2,
                city: input.city,
                country: input.country,
            },
            payment_method: input.payment_method,
        }
    }
}

impl Intake<(UserId, GetOrdersRequest)> for OrderTransformer {
    type To = GetUserOrdersDto;
    fn emit(&self, input: (UserId, GetOrdersRequest)) -> Self::To {
        let (user_id, input) = input;
        GetUserOrdersDto {
            user_id: user_id.into(),
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<(UserId, Uuid)> for OrderTransformer {
    type To = GetOrderDto;
    fn emit(&self, input: (UserId, Uuid)) -> Self::To {
        let (user_id, order_id) = input;
        GetOrderDto {
            order_id,
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug)]
pub struct CancelOrderRequest {
    order_id: Uuid,
}

impl CancelOrderRequest {
    pub fn new(order_id: Uuid) -> Self {
        Self { order_id }
    }
}

impl Intake<(UserId, CancelOrderRequest)> for OrderTransformer {
    type To = CancelOrderDto;
    fn emit(&self, input: (UserId, CancelOrderRequest)) -> Self::To {
        let (user_id, input) = input;
        CancelOrderDto {
            order_id: input.order_id,
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug)]
pub struct ReorderRequest {
    order_id: Uuid,
}

impl ReorderRequest {
    pub fn new(order_id: Uuid) -> Self {
        Self { order_id }
    }
}

impl Intake<(UserId, ReorderRequest)> for OrderTransformer {
    type To = ReorderDto;
    fn emit(&self, input: (UserId, ReorderRequest)) -> Self::To {
        let (user_id, input) = input;
        ReorderDto {
            order_id: input.order_id,
            user_id: user_id.into(),
        }
    }
}

impl Intake<(Uuid, UpdateOrderStatusRequest)> for OrderTransformer {
    type To = UpdateOrderStatusDto;
    fn emit(&self, input: (Uuid, UpdateOrderStatusRequest)) -> Self::To {
        let (order_id, input) = input;
        UpdateOrderStatusDto {
            order_id,
            status: input.status,
        }
    }
}
