use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{
    OrderDto, OrderItemDto, OrderStatusDto, OrderSummaryDto, ReorderedDto,
};
use kernel::interface::outcome::OrderRejection;
use kernel::prelude::entity::{OrderStatus, PaymentMethod};

use crate::controller::Exhaust;
use crate::response::RejectionResponse;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    id: Uuid,
    number: String,
    status: OrderStatus,
    payment_method: PaymentMethod,
    recipient: String,
    phone: String,
    line1: String,
    line2: Option<String>,
    city: String,
    country: String,
    subtotal: Decimal,
    tax: Decimal,
    shipping_fee: Decimal,
    total: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    items: Vec<OrderItemResponse>,
}

impl From<OrderDto> for OrderResponse {
    fn from(dto: OrderDto) -> Self {
        Self {
            id: dto.id,
            number: dto.number,
            status: dto.status,
            payment_method: dto.payment_method,
            recipient: dto.shipping.recipient,
            phone: dto.shipping.phone,
            line1: dto.shipping.line1,
            line2: dto.shipping.line2,
            city: dto.shipping.city,
            country: dto.shipping.country,
            subtotal: dto.subtotal,
            tax: dto.tax,
            shipping_fee: dto.shipping_fee,
            total: dto.total,
            created_at: dto.created_at,
            items: dto.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    book_id: Uuid,
    title: String,
    quantity: i32,
    unit_price: Decimal,
    line_total: Decimal,
}

impl From<OrderItemDto> for OrderItemResponse {
    fn from(dto: OrderItemDto) -> Self {
        Self {
            book_id: dto.book_id,
            title: dto.title,
            quantity: dto.quantity,
            unit_price: dto.unit_price,
            line_total: dto.line_total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderSummaryResponse {
    id: Uuid,
    number: String,
    status: OrderStatus,
    total: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    order_id: Uuid,
    status: OrderStatus,
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    item_count: i32,
    failures: Vec<ReorderFailureResponse>,
}

#[derive(Debug, Serialize)]
pub struct ReorderFailureResponse {
    book_id: Uuid,
    code: &'static str,
    message: String,
}

pub struct OrderPresenter;

impl Exhaust<Result<OrderDto, OrderRejection>> for OrderPresenter {
    type To = Response;
    fn emit(&self, input: Result<OrderDto, OrderRejection>) -> Self::To {
        match input {
            Ok(order) => {
                // Checkout is the only producer of a full order here.
                let status = if order.status == OrderStatus::Pending {
                    StatusCode::CREATED
                } else {
                    StatusCode::OK
                };
                (status, Json(OrderResponse::from(order))).into_response()
            }
            Err(rejection) => RejectionResponse::from(rejection).into_response(),
        }
    }
}

impl Exhaust<Vec<OrderSummaryDto>> for OrderPresenter {
    type To = Response;
    fn emit(&self, input: Vec<OrderSummaryDto>) -> Self::To {
        let orders: Vec<OrderSummaryResponse> = input
            .into_iter()
            .map(|dto| OrderSummaryResponse {
                id: dto.id,
                number: dto.number,
                status: dto.status,
                total: dto.total,
                created_at: dto.created_at,
            })
            .collect();
        (StatusCode::OK, Json(orders)).into_response()
    }
}

impl Exhaust<Result<OrderStatusDto, OrderRejection>> for OrderPresenter {
    type To = Response;
    fn emit(&self, input: Result<OrderStatusDto, OrderRejection>) -> Self::To {
        match input {
            Ok(status) => (
                StatusCode::OK,
                Json(OrderStatusResponse {
                    order_id: status.order_id,
                    status: status.status,
                }),
            )
                .into_response(),
            Err(rejection) => RejectionResponse::from(rejection).into_response(),
        }
    }
}

impl Exhaust<Result<ReorderedDto, OrderRejection>> for OrderPresenter {
    type To = Response;
    fn emit(&self, input: Result<ReorderedDto, OrderRejection>) -> Self::To {
        match input {
            Ok(reordered) => (
                StatusCode::OK,
                Json(ReorderResponse {
                    item_count: reordered.item_count,
                    failures: reordered
                        .failures
                        .into_iter()
                        .map(|failure| ReorderFailureResponse {
                            book_id: failure.book_id,
                            code: failure.reason.code(),
                            message: failure.reason.to_string(),
                        })
                        .collect(),
                }),
            )
                .into_response(),
            Err(rejection) => RejectionResponse::from(rejection).into_response(),
        }
    }
}
