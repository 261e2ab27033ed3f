//! Checklist API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    ChecklistAnswerDto, ChecklistDetailDto, ChecklistInstanceDto, CreateTemplateRequest,
    PatchAnswersRequest, StartChecklistRequest, TemplateDto, TemplateWithItemsDto,
};
use crate::application::ChecklistService;
use crate::interfaces::http::common::{ErrorBody, ValidatedJson};
use crate::interfaces::http::error::ApiResult;
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ChecklistHandlerState {
    pub checklists: Arc<ChecklistService>,
}

#[utoipa::path(
    get,
    path = "/checklist/templates",
    tag = "Checklist",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All templates, by name", body = Vec<TemplateDto>)
    )
)]
pub async fn list_templates(
    State(state): State<ChecklistHandlerState>,
) -> ApiResult<Json<Vec<TemplateDto>>> {
    let templates = state.checklists.list_templates().await?;
    Ok(Json(templates.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/checklist/templates",
    tag = "Checklist",
    security(("bearer_auth" = [])),
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateWithItemsDto),
        (status = 400, description = "Invalid template", body = ErrorBody)
    )
)]
pub async fn create_template(
    State(state): State<ChecklistHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateTemplateRequest>,
) -> ApiResult<(StatusCode, Json<TemplateWithItemsDto>)> {
    let created = state.checklists.create_template(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/checklist/service-orders/{id}",
    tag = "Checklist",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Checklist detail, or null when not started", body = ChecklistDetailDto)
    )
)]
pub async fn get_for_service_order(
    State(state): State<ChecklistHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<ChecklistDetailDto>>> {
    let detail = state.checklists.get_detail_for_so(&id).await?;
    Ok(Json(detail.map(Into::into)))
}

#[utoipa::path(
    post,
    path = "/checklist/service-orders/{id}/start",
    tag = "Checklist",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    request_body = StartChecklistRequest,
    responses(
        (status = 200, description = "Checklist started", body = ChecklistInstanceDto),
        (status = 400, description = "Already started or empty template", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Service order not found", body = ErrorBody)
    )
)]
pub async fn start(
    State(state): State<ChecklistHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<StartChecklistRequest>,
) -> ApiResult<Json<ChecklistInstanceDto>> {
    let instance = state
        .checklists
        .start(&id, &request.template_id, &user.actor())
        .await?;
    Ok(Json(instance.into()))
}

#[utoipa::path(
    patch,
    path = "/checklist/service-orders/{id}/answers",
    tag = "Checklist",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    request_body = PatchAnswersRequest,
    responses(
        (status = 200, description = "Answers written", body = Vec<ChecklistAnswerDto>),
        (status = 400, description = "Foreign item, not started or finished", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody)
    )
)]
pub async fn patch_answers(
    State(state): State<ChecklistHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<PatchAnswersRequest>,
) -> ApiResult<Json<Vec<ChecklistAnswerDto>>> {
    let inputs = request.inputs.into_iter().map(Into::into).collect();
    let answers = state
        .checklists
        .patch_answers(&id, inputs, &user.actor())
        .await?;
    Ok(Json(answers.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/checklist/service-orders/{id}/finish",
    tag = "Checklist",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Checklist finished", body = ChecklistInstanceDto),
        (status = 400, description = "Required items missing", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody)
    )
)]
pub async fn finish(
    State(state): State<ChecklistHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChecklistInstanceDto>> {
    let instance = state.checklists.finish(&id, &user.actor()).await?;
    Ok(Json(instance.into()))
}
