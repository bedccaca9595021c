use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CreateBookDto, DeleteBookDto, GetBookDto, ListBooksDto, UpdateBookDto,
};
use kernel::prelude::entity::{SelectLimit, SelectOffset};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct GetAllBookRequest {
    q: Option<String>,
    category: Option<Uuid>,
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: Uuid,
}

impl GetBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    title: String,
    author: String,
    price: Decimal,
    discount_price: Option<Decimal>,
    #[serde(default)]
    stock: i32,
    category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    title: Option<String>,
    author: Option<String>,
    price: Option<Decimal>,
    discount_price: Option<Decimal>,
    stock: Option<i32>,
    is_active: Option<bool>,
    category_id: Option<Uuid>,
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: Uuid,
}

impl DeleteBookRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

impl Intake<GetAllBookRequest> for BookTransformer {
    type To = ListBooksDto;
    fn emit(&self, input: GetAllBookRequest) -> Self::To {
        ListBooksDto {
            keyword: input.q,
            category_id: input.category,
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto { id: input.id }
    }
}

impl Intake<CreateBookRequest> for BookTransformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateBookRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            author: input.author,
            price: input.price,
            discount_price: input.discount_price,
            stock: input.stock,
            category_id: input.category_id,
        }
    }
}

impl Intake<(Uuid, UpdateBookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, input: (Uuid, UpdateBookRequest)) -> Self::To {
        let (id, input) = input;
        UpdateBookDto {
            id,
            title: input.title,
            author: input.author,
            price: input.price,
            discount_price: input.discount_price,
            stock: input.stock,
            is_active: input.is_active,
            category_id: input.category_id,
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto { id: input.id }
    }
}
