use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use application::transfer::{CartBadgeDto, CartDto, CartItemDto, MigratedCartDto};
use kernel::interface::outcome::CartRejection;

use crate::controller::Exhaust;
use crate::response::RejectionResponse;

#[derive(Debug, Serialize)]
pub struct CartResponse {
    items: Vec<CartItemResponse>,
    subtotal: Decimal,
    tax: Decimal,
    shipping: Decimal,
    total: Decimal,
    item_count: i32,
    is_empty: bool,
    qualifies_for_free_shipping: bool,
    amount_for_free_shipping: Decimal,
}

impl From<CartDto> for CartResponse {
    fn from(dto: CartDto) -> Self {
        Self {
            items: dto.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal: dto.subtotal,
            tax: dto.tax,
            shipping: dto.shipping,
            total: dto.total,
            item_count: dto.item_count,
            is_empty: dto.is_empty,
            qualifies_for_free_shipping: dto.qualifies_for_free_shipping,
            amount_for_free_shipping: dto.amount_for_free_shipping,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    book_id: Uuid,
    title: String,
    author: String,
    unit_price: Decimal,
    quantity: i32,
    line_total: Decimal,
    in_stock: bool,
    max_quantity: i32,
}

impl From<CartItemDto> for CartItemResponse {
    fn from(dto: CartItemDto) -> Self {
        Self {
            book_id: dto.book_id,
            title: dto.title,
            author: dto.author,
            unit_price: dto.unit_price,
            quantity: dto.quantity,
            line_total: dto.line_total,
            in_stock: dto.in_stock,
            max_quantity: dto.max_quantity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartBadgeResponse {
    item_count: i32,
}

#[derive(Debug, Serialize)]
pub struct MigratedCartResponse {
    migrated: i32,
    item_count: i32,
}

pub struct CartPresenter;

impl Exhaust<Result<CartBadgeDto, CartRejection>> for CartPresenter {
    type To = Response;
    fn emit(&self, input: Result<CartBadgeDto, CartRejection>) -> Self::To {
        match input {
            Ok(badge) => (
                StatusCode::OK,
                Json(CartBadgeResponse {
                    item_count: badge.item_count,
                }),
            )
                .into_response(),
            Err(rejection) => RejectionResponse::from(rejection).into_response(),
        }
    }
}

impl Exhaust<Result<CartDto, CartRejection>> for CartPresenter {
    type To = Response;
    fn emit(&self, input: Result<CartDto, CartRejection>) -> Self::To {
        match input {
            Ok(cart) => (StatusCode::OK, Json(CartResponse::from(cart))).into_response(),
            Err(rejection) => RejectionResponse::from(rejection).into_response(),
        }
    }
}

impl Exhaust<CartDto> for CartPresenter {
    type To = Response;
    fn emit(&self, input: CartDto) -> Self::To {
        (StatusCode::OK, Json(CartResponse::from(input))).into_response()
    }
}

impl Exhaust<CartBadgeDto> for CartPresenter {
    type To = Response;
    fn emit(&self, input: CartBadgeDto) -> Self::To {
        (
            StatusCode::OK,
            Json(CartBadgeResponse {
                item_count: input.item_count,
            }),
        )
            .into_response()
    }
}

impl Exhaust<()> for CartPresenter {
    type To = Response;
    fn emit(&self, _: ()) -> Self::To {
        StatusCode::NO_CONTENT.into_response()
    }
}

impl Exhaust<MigratedCartDto> for CartPresenter {
    type To = Response;
    fn emit(&self, input: MigratedCartDto) -> Self::To {
        (
            StatusCode::OK,
            Json(MigratedCartResponse {
                migrated: input.migrated,
                item_count: input.item_count,
            }),
        )
            .into_response()
    }
}
