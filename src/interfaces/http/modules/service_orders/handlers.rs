//! Service order API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateServiceOrderRequest, CreatedServiceOrderDto, ListServiceOrdersParams,
    ServiceOrderDetailDto, ServiceOrderDto, ServiceOrderListResponse, UpdateServiceOrderRequest,
};
use crate::application::ServiceOrderService;
use crate::interfaces::http::common::{ErrorBody, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ServiceOrderHandlerState {
    pub service_orders: Arc<ServiceOrderService>,
}

#[utoipa::path(
    get,
    path = "/service-orders",
    tag = "Service Orders",
    security(("bearer_auth" = [])),
    params(ListServiceOrdersParams),
    responses(
        (status = 200, description = "Page of service orders, newest first", body = ServiceOrderListResponse),
        (status = 400, description = "Invalid pagination", body = ErrorBody)
    )
)]
pub async fn list_service_orders(
    State(state): State<ServiceOrderHandlerState>,
    Query(params): Query<ListServiceOrdersParams>,
) -> ApiResult<Json<ServiceOrderListResponse>> {
    let page = state.service_orders.list(params.into()).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/service-orders",
    tag = "Service Orders",
    security(("bearer_auth" = [])),
    request_body = CreateServiceOrderRequest,
    responses(
        (status = 201, description = "Service order created", body = CreatedServiceOrderDto),
        (status = 400, description = "Invalid input or template", body = ErrorBody)
    )
)]
pub async fn create_service_order(
    State(state): State<ServiceOrderHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateServiceOrderRequest>,
) -> ApiResult<(StatusCode, Json<CreatedServiceOrderDto>)> {
    let created = state
        .service_orders
        .create(request.into(), &user.actor())
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/service-orders/{id}",
    tag = "Service Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Service order with checklist detail", body = ServiceOrderDetailDto),
        (status = 404, description = "Service order not found", body = ErrorBody)
    )
)]
pub async fn get_service_order(
    State(state): State<ServiceOrderHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ServiceOrderDetailDto>> {
    let order = state.service_orders.get(&id).await?;
    Ok(Json(order.into()))
}

#[utoipa::path(
    put,
    path = "/service-orders/{id}",
    tag = "Service Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    request_body = UpdateServiceOrderRequest,
    responses(
        (status = 200, description = "Service order updated", body = ServiceOrderDto),
        (status = 400, description = "Status regression or invalid title", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Service order not found", body = ErrorBody)
    )
)]
pub async fn update_service_order(
    State(state): State<ServiceOrderHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateServiceOrderRequest>,
) -> ApiResult<Json<ServiceOrderDto>> {
    let updated = state
        .service_orders
        .update(&id, request.into(), &user.actor())
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/service-orders/{id}",
    tag = "Service Orders",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    responses(
        (status = 204, description = "Service order deleted"),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Service order not found", body = ErrorBody)
    )
)]
pub async fn delete_service_order(
    State(state): State<ServiceOrderHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service_orders.remove(&id, &user.actor()).await?;
    Ok(StatusCode::NO_CONTENT)
}
