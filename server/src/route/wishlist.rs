use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use uuid::Uuid;

use application::service::WishlistService;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity;
use crate::request::{
    AddWishlistRequest, IsWishlistedRequest, RemoveWishlistRequest, WishlistTransformer,
};
use crate::response::{RejectionResponse, WishlistPresenter};

pub trait WishlistRouter {
    fn route_wishlist(self) -> Self;
}

impl WishlistRouter for Router<AppModule> {
    fn route_wishlist(self) -> Self {
        self.route(
            "/wishlist",
            get(
                |State(module): State<AppModule>, headers: HeaderMap| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake(user)
                        .handle(|dto| module.get_wishlist(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/wishlist/:book_id",
            get(
                |State(module): State<AppModule>, Path(book_id): Path<Uuid>, headers: HeaderMap| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake((user, IsWishlistedRequest::new(book_id)))
                        .handle(|dto| module.is_wishlisted(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            )
            .put(
                |State(module): State<AppModule>, Path(book_id): Path<Uuid>, headers: HeaderMap| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake((user, AddWishlistRequest::new(book_id)))
                        .handle(|dto| module.add_to_wishlist(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(book_id): Path<Uuid>, headers: HeaderMap| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(WishlistTransformer, WishlistPresenter)
                        .intake((user, RemoveWishlistRequest::new(book_id)))
                        .handle(|dto| module.remove_from_wishlist(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
    }
}
