//! Checklist DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{
    AnswerInput, ChecklistAnswer, ChecklistDetail, ChecklistInstance, ChecklistItem,
    ChecklistTemplate, NewChecklistItem, NewChecklistTemplate, TemplateWithItems,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateDto {
    pub id: String,
    pub name: String,
}

impl From<ChecklistTemplate> for TemplateDto {
    fn from(t: ChecklistTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemDto {
    pub id: String,
    pub template_id: String,
    pub label: String,
    pub required: bool,
    pub position: i32,
}

impl From<ChecklistItem> for ChecklistItemDto {
    fn from(i: ChecklistItem) -> Self {
        Self {
            id: i.id,
            template_id: i.template_id,
            label: i.label,
            required: i.required,
            position: i.position,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateWithItemsDto {
    pub id: String,
    pub name: String,
    pub items: Vec<ChecklistItemDto>,
}

impl From<TemplateWithItems> for TemplateWithItemsDto {
    fn from(t: TemplateWithItems) -> Self {
        Self {
            id: t.template.id,
            name: t.template.name,
            items: t.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewChecklistItemRequest {
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

/// Body of `POST /checklist/templates`, also accepted inline as
/// `newChecklist` when creating a service order.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[validate(length(min = 1, message = "at least one item is required"))]
    pub items: Vec<NewChecklistItemRequest>,
}

impl From<CreateTemplateRequest> for NewChecklistTemplate {
    fn from(req: CreateTemplateRequest) -> Self {
        Self {
            name: req.name,
            items: req
                .items
                .into_iter()
                .map(|i| NewChecklistItem {
                    label: i.label,
                    required: i.required,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistInstanceDto {
    pub id: String,
    pub service_order_id: String,
    pub template_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<ChecklistInstance> for ChecklistInstanceDto {
    fn from(i: ChecklistInstance) -> Self {
        Self {
            id: i.id,
            service_order_id: i.service_order_id,
            template_id: i.template_id,
            started_at: i.started_at,
            finished_at: i.finished_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistAnswerDto {
    pub id: String,
    pub so_checklist_id: String,
    pub item_id: String,
    pub bool_value: Option<bool>,
    pub text_value: Option<String>,
    pub note: Option<String>,
}

impl From<ChecklistAnswer> for ChecklistAnswerDto {
    fn from(a: ChecklistAnswer) -> Self {
        Self {
            id: a.id,
            so_checklist_id: a.so_checklist_id,
            item_id: a.item_id,
            bool_value: a.bool_value,
            text_value: a.text_value,
            note: a.note,
        }
    }
}

/// A started checklist together with its template, items and answers
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetailDto {
    pub id: String,
    pub service_order_id: String,
    pub template_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub template: TemplateDto,
    pub items: Vec<ChecklistItemDto>,
    pub answers: Vec<ChecklistAnswerDto>,
}

impl From<ChecklistDetail> for ChecklistDetailDto {
    fn from(d: ChecklistDetail) -> Self {
        Self {
            id: d.instance.id,
            service_order_id: d.instance.service_order_id,
            template_id: d.instance.template_id,
            started_at: d.instance.started_at,
            finished_at: d.instance.finished_at,
            template: d.template.into(),
            items: d.items.into_iter().map(Into::into).collect(),
            answers: d.answers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartChecklistRequest {
    #[validate(length(min = 1, message = "templateId is required"))]
    pub template_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInputDto {
    pub item_id: String,
    pub bool_value: Option<bool>,
    pub text_value: Option<String>,
    pub note: Option<String>,
}

impl From<AnswerInputDto> for AnswerInput {
    fn from(a: AnswerInputDto) -> Self {
        Self {
            item_id: a.item_id,
            bool_value: a.bool_value,
            text_value: a.text_value,
            note: a.note,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PatchAnswersRequest {
    pub inputs: Vec<AnswerInputDto>,
}
