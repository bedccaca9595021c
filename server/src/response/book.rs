use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{BookDto, CategoryDto};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    id: Uuid,
    title: String,
    author: String,
    price: Decimal,
    discount_price: Option<Decimal>,
    display_price: Decimal,
    stock: i32,
    is_active: bool,
    category_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl From<BookDto> for BookResponse {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            author: dto.author,
            price: dto.price,
            discount_price: dto.discount_price,
            display_price: dto.display_price,
            stock: dto.stock,
            is_active: dto.is_active,
            category_id: dto.category_id,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    id: Uuid,
    name: String,
}

pub struct BookPresenter;

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = Response;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        let books: Vec<BookResponse> = input.into_iter().map(BookResponse::from).collect();
        (StatusCode::OK, Json(books)).into_response()
    }
}

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Response;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        match input {
            Some(book) => (StatusCode::OK, Json(BookResponse::from(book))).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

impl Exhaust<BookDto> for BookPresenter {
    type To = Response;
    fn emit(&self, input: BookDto) -> Self::To {
        (StatusCode::CREATED, Json(BookResponse::from(input))).into_response()
    }
}

impl Exhaust<Option<()>> for BookPresenter {
    type To = Response;
    fn emit(&self, input: Option<()>) -> Self::To {
        match input {
            Some(()) => StatusCode::NO_CONTENT.into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

pub struct CategoryPresenter;

impl Exhaust<Vec<CategoryDto>> for CategoryPresenter {
    type To = Response;
    fn emit(&self, input: Vec<CategoryDto>) -> Self::To {
        let categories: Vec<CategoryResponse> = input
            .into_iter()
            .map(|dto| CategoryResponse {
                id: dto.id,
                name: dto.name,
            })
            .collect();
        (StatusCode::OK, Json(categories)).into_response()
    }
}
