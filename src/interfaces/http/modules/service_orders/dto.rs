//! Service order DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{CreateServiceOrder, ServiceOrderQuery};
use crate::domain::service_order::CreatedServiceOrder;
use crate::domain::{
    ServiceOrder, ServiceOrderChanges, ServiceOrderStatus, ServiceOrderWithChecklist,
};
use crate::interfaces::http::modules::checklist::{
    ChecklistDetailDto, ChecklistInstanceDto, CreateTemplateRequest,
};
use crate::shared::PaginatedResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusDto {
    Open,
    InProgress,
    Done,
}

impl From<ServiceOrderStatus> for StatusDto {
    fn from(status: ServiceOrderStatus) -> Self {
        match status {
            ServiceOrderStatus::Open => Self::Open,
            ServiceOrderStatus::InProgress => Self::InProgress,
            ServiceOrderStatus::Done => Self::Done,
        }
    }
}

impl From<StatusDto> for ServiceOrderStatus {
    fn from(status: StatusDto) -> Self {
        match status {
            StatusDto::Open => Self::Open,
            StatusDto::InProgress => Self::InProgress,
            StatusDto::Done => Self::Done,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: StatusDto,
    pub created_by_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceOrder> for ServiceOrderDto {
    fn from(o: ServiceOrder) -> Self {
        Self {
            id: o.id,
            title: o.title,
            description: o.description,
            status: o.status.into(),
            created_by_id: o.created_by_id,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// A newly created order and the checklist started with it, if any
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedServiceOrderDto {
    #[serde(flatten)]
    pub order: ServiceOrderDto,
    pub checklist: Option<ChecklistInstanceDto>,
}

impl From<CreatedServiceOrder> for CreatedServiceOrderDto {
    fn from(c: CreatedServiceOrder) -> Self {
        Self {
            order: c.order.into(),
            checklist: c.checklist.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderDetailDto {
    #[serde(flatten)]
    pub order: ServiceOrderDto,
    pub checklist: Option<ChecklistDetailDto>,
}

impl From<ServiceOrderWithChecklist> for ServiceOrderDetailDto {
    fn from(d: ServiceOrderWithChecklist) -> Self {
        Self {
            order: d.order.into(),
            checklist: d.checklist.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceOrderListResponse {
    pub total: u64,
    pub data: Vec<ServiceOrderDto>,
}

impl From<PaginatedResult<ServiceOrder>> for ServiceOrderListResponse {
    fn from(page: PaginatedResult<ServiceOrder>) -> Self {
        Self {
            total: page.total,
            data: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListServiceOrdersParams {
    /// Exact status match
    pub status: Option<StatusDto>,
    /// Case-insensitive substring of title or description
    pub q: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size, 1-100 (default 10)
    pub limit: Option<u64>,
}

impl From<ListServiceOrdersParams> for ServiceOrderQuery {
    fn from(p: ListServiceOrdersParams) -> Self {
        Self {
            status: p.status.map(Into::into),
            q: p.q,
            page: p.page,
            limit: p.limit,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceOrderRequest {
    pub title: String,
    pub description: Option<String>,
    /// Start a checklist from this existing template
    pub template_id: Option<String>,
    /// Create a template inline and start a checklist from it
    pub new_checklist: Option<CreateTemplateRequest>,
}

impl From<CreateServiceOrderRequest> for CreateServiceOrder {
    fn from(r: CreateServiceOrderRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            template_id: r.template_id,
            new_checklist: r.new_checklist.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceOrderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<StatusDto>,
}

impl From<UpdateServiceOrderRequest> for ServiceOrderChanges {
    fn from(r: UpdateServiceOrderRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            status: r.status.map(Into::into),
        }
    }
}
