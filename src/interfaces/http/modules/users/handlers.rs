//! User registration handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{RegisterRequest, UserDto};
use crate::application::{RegisterUser, UserService};
use crate::interfaces::http::common::{ErrorBody, ValidatedJson};
use crate::interfaces::http::error::ApiResult;

#[derive(Clone)]
pub struct UserHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let user = state
        .users
        .register(RegisterUser {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role.map(Into::into),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}
