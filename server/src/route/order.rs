use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::OrderService;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity;
use crate::request::{
    CancelOrderRequest, CheckoutRequest, GetOrdersRequest, OrderTransformer, ReorderRequest,
    UpdateOrderStatusRequest,
};
use crate::response::{OrderPresenter, RejectionResponse};

pub trait OrderRouter {
    fn route_order(self) -> Self;
}

impl OrderRouter for Router<AppModule> {
    fn route_order(self) -> Self {
        self.route(
            "/orders",
            get(
                |State(module): State<AppModule>,
                 headers: HeaderMap,
                 Query(req): Query<GetOrdersRequest>| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(OrderTransformer, OrderPresenter)
                        .intake((user, req))
                        .handle(|dto| module.get_user_orders(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            )
            .post(
                |State(module): State<AppModule>,
                 headers: HeaderMap,
                 Json(req): Json<CheckoutRequest>| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(OrderTransformer, OrderPresenter)
                        .intake((user, req))
                        .handle(|dto| module.create_order(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/orders/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>, headers: HeaderMap| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(OrderTransformer, OrderPresenter)
                        .intake((user, id))
                        .handle(|dto| module.get_order(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/orders/:id/cancel",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>, headers: HeaderMap| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(OrderTransformer, OrderPresenter)
                        .intake((user, CancelOrderRequest::new(id)))
                        .handle(|dto| module.cancel_order(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            "/orders/:id/reorder",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>, headers: HeaderMap| async move {
                    let Some(user) = identity::authenticated_user(&headers) else {
                        return RejectionResponse::unauthorized().into_response();
                    };
                    match Controller::new(OrderTransformer, OrderPresenter)
                        .intake((user, ReorderRequest::new(id)))
                        .handle(|dto| module.reorder(dto))
                        .await
                    {
                        Ok(response) => response,
                        Err(report) => ErrorStatus::from(report).into_response(),
                    }
                },
            ),
        )
        .route(
            // Back-office lifecycle control; the admin gate sits in front of
            // this service.
            "/orders/:id/status",
            patch(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateOrderStatusRequest>| async move {
                    Controller::new(OrderTransformer, OrderPresenter)
                        .intake((id, req))
                        .handle(|dto| module.update_order_status(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
