use uuid::Uuid;

use application::transfer::{
    AddWishlistItemDto, GetWishlistDto, IsWishlistedDto, RemoveWishlistItemDto,
};
use kernel::prelude::entity::UserId;

use crate::controller::Intake;

pub struct WishlistTransformer;

#[derive(Debug)]
pub struct AddWishlistRequest {
    book_id: Uuid,
}

impl AddWishlistRequest {
    pub fn new(book_id: Uuid) -> Self {
        Self { book_id }
    }
}

#[derive(Debug)]
pub struct RemoveWishlistRequest {
    book_id: Uuid,
}

impl RemoveWishlistRequest {
    pub fn new(book_id: Uuid) -> Self {
        Self { book_id }
    }
}

impl Intake<(UserId, AddWishlistRequest)> for WishlistTransformer {
    type To = AddWishlistItemDto;
    fn emit(&self, input: (UserId, AddWishlistRequest)) -> Self::To {
        let (user_id, input) = input;
        AddWishlistItemDto {
            user_id: user_id.into(),
            book_id: input.book_id,
        }
    }
}

impl Intake<(UserId, RemoveWishlistRequest)> for WishlistTransformer {
    type To = RemoveWishlistItemDto;
    fn emit(&self, input: (UserId, RemoveWishlistRequest)) -> Self::To {
        let (user_id, input) = input;
        RemoveWishlistItemDto {
            user_id: user_id.into(),
            book_id: input.book_id,
        }
    }
}

impl Intake<UserId> for WishlistTransformer {
    type To = GetWishlistDto;
    fn emit(&self, input: UserId) -> Self::To {
        GetWishlistDto {
            user_id: input.into(),
        }
    }
}

#[derive(Debug)]
pub struct IsWishlistedRequest {
    book_id: Uuid,
}

impl IsWishlistedRequest {
    pub fn new(book_id: Uuid) -> Self {
        Self { book_id }
    }
}

impl Intake<(UserId, IsWishlistedRequest)> for WishlistTransformer {
    type To = IsWishlistedDto;
    fn emit(&self, input: (UserId, IsWishlistedRequest)) -> Self::To {
        let (user_id, input) = input;
        IsWishlistedDto {
            user_id: user_id.into(),
            book_id: input.book_id,
        }
    }
}
