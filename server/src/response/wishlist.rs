use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{WishlistDto, WishlistItemDto, WishlistStatusDto};
use kernel::interface::outcome::CartRejection;

use crate::controller::Exhaust;
use crate::response::RejectionResponse;

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    items: Vec<WishlistItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct WishlistItemResponse {
    book_id: Uuid,
    title: String,
    author: String,
    display_price: Decimal,
    in_stock: bool,
    #[serde(with = "time::serde::rfc3339")]
    added_at: OffsetDateTime,
}

impl From<WishlistItemDto> for WishlistItemResponse {
    fn from(dto: WishlistItemDto) -> Self {
        Self {
            book_id: dto.book_id,
            title: dto.title,
            author: dto.author,
            display_price: dto.display_price,
            in_stock: dto.in_stock,
            added_at: dto.added_at,
        }
    }
}

impl From<WishlistDto> for WishlistResponse {
    fn from(dto: WishlistDto) -> Self {
        Self {
            items: dto.items.into_iter().map(WishlistItemResponse::from).collect(),
        }
    }
}

pub struct WishlistPresenter;

impl Exhaust<WishlistDto> for WishlistPresenter {
    type To = Response;
    fn emit(&self, input: WishlistDto) -> Self::To {
        (StatusCode::OK, Json(WishlistResponse::from(input))).into_response()
    }
}

impl Exhaust<WishlistStatusDto> for WishlistPresenter {
    type To = Response;
    fn emit(&self, input: WishlistStatusDto) -> Self::To {
        #[derive(Serialize)]
        struct Body {
            in_wishlist: bool,
        }
        (
            StatusCode::OK,
            Json(Body {
                in_wishlist: input.in_wishlist,
            }),
        )
            .into_response()
    }
}

impl Exhaust<Result<WishlistDto, CartRejection>> for WishlistPresenter {
    type To = Response;
    fn emit(&self, input: Result<WishlistDto, CartRejection>) -> Self::To {
        match input {
            Ok(wishlist) => {
                (StatusCode::OK, Json(WishlistResponse::from(wishlist))).into_response()
            }
            Err(rejection) => RejectionResponse::from(rejection).into_response(),
        }
    }
}
