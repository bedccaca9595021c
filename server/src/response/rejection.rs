use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use kernel::interface::outcome::{CartRejection, OrderRejection};

/// Wire form of a business refusal: a stable code, a human-readable message
/// and whatever structured context the refusal carries, so the front end can
/// word a precise prompt without parsing text.
#[derive(Debug)]
pub struct RejectionResponse {
    status: StatusCode,
    body: RejectionBody,
}

#[derive(Debug, Serialize)]
pub struct RejectionBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    in_cart: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    book_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
}

impl RejectionBody {
    fn new(code: &'static str, message: String) -> Self {
        Self {
            code,
            message,
            available: None,
            in_cart: None,
            limit: None,
            requested: None,
            book_id: None,
            status: None,
        }
    }
}

impl RejectionResponse {
    pub fn invalid_quantity() -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: RejectionBody::new("INVALID_QUANTITY", "Quantity must be at least 1".into()),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: RejectionBody::new("UNAUTHORIZED", "Please sign in first".into()),
        }
    }
}

impl From<CartRejection> for RejectionResponse {
    fn from(rejection: CartRejection) -> Self {
        let mut body = RejectionBody::new(rejection.code(), rejection.to_string());
        let status = match rejection {
            CartRejection::BookNotFound | CartRejection::ItemNotFound => StatusCode::NOT_FOUND,
            CartRejection::BookInactive | CartRejection::OutOfStock => StatusCode::CONFLICT,
            CartRejection::InsufficientStock { available, in_cart } => {
                body.available = Some(available);
                body.in_cart = Some(in_cart);
                StatusCode::CONFLICT
            }
            CartRejection::QuantityLimitExceeded { limit, in_cart } => {
                body.limit = Some(limit);
                body.in_cart = Some(in_cart);
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        Self { status, body }
    }
}

impl From<OrderRejection> for RejectionResponse {
    fn from(rejection: OrderRejection) -> Self {
        let mut body = RejectionBody::new(rejection.code(), rejection.to_string());
        let status = match rejection {
            OrderRejection::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
            OrderRejection::InsufficientStock {
                book_id,
                available,
                requested,
            } => {
                body.book_id = Some(*book_id.as_ref());
                body.available = Some(available);
                body.requested = Some(requested);
                StatusCode::CONFLICT
            }
            OrderRejection::NotFound => StatusCode::NOT_FOUND,
            OrderRejection::NotCancellable { status } => {
                body.status = Some(status.as_str());
                StatusCode::CONFLICT
            }
            OrderRejection::InvalidTransition { from, .. } => {
                body.status = Some(from.as_str());
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        Self { status, body }
    }
}

impl IntoResponse for RejectionResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
