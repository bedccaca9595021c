use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use application::service::{CartService, MigrateCartService, SessionCartService};
use application::transfer::{GetCartDto, MigratedCartDto};
use kernel::prelude::entity::CartOwner;

use crate::controller::{Controller, Exhaust};
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity;
use crate::request::{AddCartItemRequest, CartTransformer, UpdateCartItemRequest};
use crate::response::{CartPresenter, RejectionResponse};

pub trait CartRouter {
    fn route_cart(self) -> Self;
}

impl CartRouter for Router<AppModule> {
    fn route_cart(self) -> Self {
        self.route(
            "/cart",
            get(
                |State(module): State<AppModule>, headers: HeaderMap, jar: CookieJar| async move {
                    let (owner, minted) = identity::resolve(&headers, &jar);
                    let result = match owner {
                        CartOwner::User(user) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake(user)
                                .handle(|dto| module.get_cart(dto))
                                .await
                        }
                        CartOwner::Session(session) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake(session)
                                .handle(|dto| module.get_session_cart(dto))
                                .await
                        }
                    };
                    match result {
                        Ok(response) => identity::with_session_cookie(response, minted),
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            )
            .delete(
                |State(module): State<AppModule>, headers: HeaderMap, jar: CookieJar| async move {
                    let (owner, minted) = identity::resolve(&headers, &jar);
                    let result = match owner {
                        CartOwner::User(user) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake(user)
                                .handle(|dto| module.clear_cart(dto))
                                .await
                        }
                        CartOwner::Session(session) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake(session)
                                .handle(|dto| module.clear_session_cart(dto))
                                .await
                        }
                    };
                    match result {
                        Ok(response) => identity::with_session_cookie(response, minted),
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/cart/count",
            get(
                |State(module): State<AppModule>, headers: HeaderMap, jar: CookieJar| async move {
                    let (owner, minted) = identity::resolve(&headers, &jar);
                    let result = match owner {
                        CartOwner::User(user) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake(user)
                                .handle(|dto| module.get_item_count(dto))
                                .await
                        }
                        CartOwner::Session(session) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake(session)
                                .handle(|dto| module.get_session_item_count(dto))
                                .await
                        }
                    };
                    match result {
                        Ok(response) => identity::with_session_cookie(response, minted),
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/cart/items",
            post(
                |State(module): State<AppModule>,
                 headers: HeaderMap,
                 jar: CookieJar,
                 Json(req): Json<AddCartItemRequest>| async move {
                    if req.quantity < 1 {
                        return RejectionResponse::invalid_quantity().into_response();
                    }
                    let (owner, minted) = identity::resolve(&headers, &jar);
                    let result = match owner {
                        CartOwner::User(user) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake((user, req))
                                .handle(|dto| module.add_item(dto))
                                .await
                        }
                        CartOwner::Session(session) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake((session, req))
                                .handle(|dto| module.add_session_item(dto))
                                .await
                        }
                    };
                    match result {
                        Ok(response) => identity::with_session_cookie(response, minted),
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/cart/items/:book_id",
            axum::routing::patch(
                |State(module): State<AppModule>,
                 Path(book_id): Path<Uuid>,
                 headers: HeaderMap,
                 jar: CookieJar,
                 Json(req): Json<UpdateCartItemRequest>| async move {
                    let (owner, minted) = identity::resolve(&headers, &jar);
                    let result = match owner {
                        CartOwner::User(user) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake((user, book_id, req))
                                .handle(|dto| module.update_item(dto))
                                .await
                        }
                        CartOwner::Session(session) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake((session, book_id, req))
                                .handle(|dto| module.update_session_item(dto))
                                .await
                        }
                    };
                    match result {
                        Ok(response) => identity::with_session_cookie(response, minted),
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Path(book_id): Path<Uuid>,
                 headers: HeaderMap,
                 jar: CookieJar| async move {
                    let (owner, minted) = identity::resolve(&headers, &jar);
                    let result = match owner {
                        CartOwner::User(user) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake((user, book_id))
                                .handle(|dto| module.remove_item(dto))
                                .await
                        }
                        CartOwner::Session(session) => {
                            Controller::new(CartTransformer, CartPresenter)
                                .intake((session, book_id))
                                .handle(|dto| module.remove_session_item(dto))
                                .await
                        }
                    };
                    match result {
                        Ok(response) => identity::with_session_cookie(response, minted),
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/cart/migrate",
            post(
                |State(module): State<AppModule>, headers: HeaderMap, jar: CookieJar| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    let Some(session) = identity::session_id(&jar) else {
                        // Nothing browsed anonymously; report the badge as is.
                        return match module
                            .get_item_count(GetCartDto {
                                user_id: user.into(),
                            })
                            .await
                        {
                            Ok(badge) => CartPresenter.emit(MigratedCartDto {
                                migrated: 0,
                                item_count: badge.item_count,
                            }),
                            Err(report) => ErrorStatus::from(report).into_response(),
                        };
                    };
                    match Controller::new(CartTransformer, CartPresenter)
                        .intake((session, user))
                        .handle(|dto| module.migrate_to_user(dto))
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
