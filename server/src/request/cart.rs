use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    AddCartItemDto, AddSessionItemDto, GetCartDto, GetSessionCartDto, MigrateCartDto,
    RemoveCartItemDto, RemoveSessionItemDto, UpdateCartItemDto, UpdateSessionItemDto,
};
use kernel::prelude::entity::{SessionId, UserId};

use crate::controller::Intake;

#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItemRequest {
    pub book_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

pub struct CartTransformer;

impl Intake<(UserId, AddCartItemRequest)> for CartTransformer {
    type To = AddCartItemDto;
    fn emit(&self, input: (UserId, AddCartItemRequest)) -> Self::To {
        let (user_id, input) = input;
        AddCartItemDto {
            user_id: user_id.into(),
            book_id: input.book_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<(SessionId, AddCartItemRequest)> for CartTransformer {
    type To = AddSessionItemDto;
    fn emit(&self, input: (SessionId, AddCartItemRequest)) -> Self::To {
        let (session_id, input) = input;
        AddSessionItemDto {
            session_id: session_id.into(),
            book_id: input.book_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<(UserId, Uuid, UpdateCartItemRequest)> for CartTransformer {
    type To = UpdateCartItemDto;
    fn emit(&self, input: (UserId, Uuid, UpdateCartItemRequest)) -> Self::To {
        let (user_id, book_id, input) = input;
        UpdateCartItemDto {
            user_id: user_id.into(),
            book_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<(SessionId, Uuid, UpdateCartItemRequest)> for CartTransformer {
    type To = UpdateSessionItemDto;
    fn emit(&self, input: (SessionId, Uuid, UpdateCartItemRequest)) -> Self::To {
        let (session_id, book_id, input) = input;
        UpdateSessionItemDto {
            session_id: session_id.into(),
            book_id,
            quantity: input.quantity,
        }
    }
}

impl Intake<(UserId, Uuid)> for CartTransformer {
    type To = RemoveCartItemDto;
    fn emit(&self, input: (UserId, Uuid)) -> Self::To {
        let (user_id, book_id) = input;
        RemoveCartItemDto {
            user_id: user_id.into(),
            book_id,
        }
    }
}

impl Intake<(SessionId, Uuid)> for CartTransformer {
    type To = RemoveSessionItemDto;
    fn emit(&self, input: (SessionId, Uuid)) -> Self::To {
        let (session_id, book_id) = input;
        RemoveSessionItemDto {
            session_id: session_id.into(),
            book_id,
        }
    }
}

impl Intake<UserId> for CartTransformer {
    type To = GetCartDto;
    fn emit(&self, input: UserId) -> Self::To {
        GetCartDto {
            user_id: input.into(),
        }
    }
}

impl Intake<SessionId> for CartTransformer {
    type To = GetSessionCartDto;
    fn emit(&self, input: SessionId) -> Self::To {
        GetSessionCartDto {
            session_id: input.into(),
        }
    }
}

impl Intake<(SessionId, UserId)> for CartTransformer {
    type To = MigrateCartDto;
    fn emit(&self, input: (SessionId, UserId)) -> Self::To {
        let (session_id, user_id) = input;
        MigrateCartDto {
            session_id: session_id.into(),
            user_id: user_id.into(),
        }
    }
}
