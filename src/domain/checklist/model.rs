//! Checklist templates, instances and answers
//!
//! A template is shared reference data. An instance binds one template to one
//! service order and moves through `NotStarted -> InProgress -> Finished`;
//! `NotStarted` is represented by the absence of an instance.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistTemplate {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: String,
    pub template_id: String,
    pub label: String,
    pub required: bool,
    pub position: i32,
}

/// Template metadata with its items in `position` order
#[derive(Clone, Debug)]
pub struct TemplateWithItems {
    pub template: ChecklistTemplate,
    pub items: Vec<ChecklistItem>,
}

#[derive(Clone, Debug)]
pub struct NewChecklistItem {
    pub label: String,
    pub required: bool,
}

#[derive(Clone, Debug)]
pub struct NewChecklistTemplate {
    pub name: String,
    pub items: Vec<NewChecklistItem>,
}

/// How a service order gets its checklist at creation time
#[derive(Clone, Debug)]
pub enum ChecklistBootstrap {
    Existing { template_id: String },
    Create(NewChecklistTemplate),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistInstance {
    pub id: String,
    pub service_order_id: String,
    pub template_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ChecklistInstance {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistAnswer {
    pub id: String,
    pub so_checklist_id: String,
    pub item_id: String,
    pub bool_value: Option<bool>,
    pub text_value: Option<String>,
    pub note: Option<String>,
}

impl ChecklistAnswer {
    /// `bool_value == Some(false)` alone is not an answer.
    pub fn is_answered(&self) -> bool {
        self.bool_value == Some(true) || self.text_value.is_some()
    }
}

/// One answer in a patch batch. Omitted fields are written as null.
#[derive(Clone, Debug, Default)]
pub struct AnswerInput {
    pub item_id: String,
    pub bool_value: Option<bool>,
    pub text_value: Option<String>,
    pub note: Option<String>,
}

/// Read projection of a service order's checklist
#[derive(Clone, Debug)]
pub struct ChecklistDetail {
    pub instance: ChecklistInstance,
    pub template: ChecklistTemplate,
    pub items: Vec<ChecklistItem>,
    pub answers: Vec<ChecklistAnswer>,
}

/// Input item ids that are not part of `items`, in input order.
pub fn foreign_items<'a>(items: &[ChecklistItem], inputs: &'a [AnswerInput]) -> Vec<&'a str> {
    let known: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    inputs
        .iter()
        .map(|a| a.item_id.as_str())
        .filter(|id| !known.contains(id))
        .collect()
}

/// Required items with no qualifying answer.
pub fn missing_required_items<'a>(
    items: &'a [ChecklistItem],
    answers: &[ChecklistAnswer],
) -> Vec<&'a ChecklistItem> {
    let answered: HashSet<&str> = answers
        .iter()
        .filter(|a| a.is_answered())
        .map(|a| a.item_id.as_str())
        .collect();
    items
        .iter()
        .filter(|i| i.required && !answered.contains(i.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, required: bool) -> ChecklistItem {
        ChecklistItem {
            id: id.into(),
            template_id: "tpl".into(),
            label: id.into(),
            required,
            position: 0,
        }
    }

    fn answer(item_id: &str, bool_value: Option<bool>, text_value: Option<&str>) -> ChecklistAnswer {
        ChecklistAnswer {
            id: format!("ans-{}", item_id),
            so_checklist_id: "inst".into(),
            item_id: item_id.into(),
            bool_value,
            text_value: text_value.map(String::from),
            note: None,
        }
    }

    #[test]
    fn false_bool_is_not_an_answer() {
        assert!(!answer("a", Some(false), None).is_answered());
        assert!(!answer("a", None, None).is_answered());
        assert!(answer("a", Some(true), None).is_answered());
        assert!(answer("a", Some(false), Some("")).is_answered());
    }

    #[test]
    fn missing_required_ignores_optional_items() {
        let items = vec![item("start", true), item("validate", true), item("notes", false)];
        let answers = vec![answer("start", Some(true), None)];

        let missing = missing_required_items(&items, &answers);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].id, "validate");
    }

    #[test]
    fn no_required_items_means_nothing_missing() {
        let items = vec![item("notes", false)];
        assert!(missing_required_items(&items, &[]).is_empty());
    }

    #[test]
    fn foreign_items_reports_unknown_ids() {
        let items = vec![item("a", true), item("b", false)];
        let inputs = vec![
            AnswerInput {
                item_id: "a".into(),
                ..Default::default()
            },
            AnswerInput {
                item_id: "zzz".into(),
                ..Default::default()
            },
        ];
        assert_eq!(foreign_items(&items, &inputs), vec!["zzz"]);
    }

    #[test]
    fn finished_follows_finished_at() {
        let mut inst = ChecklistInstance {
            id: "i".into(),
            service_order_id: "so".into(),
            template_id: "tpl".into(),
            started_at: Utc::now(),
            finished_at: None,
        };
        assert!(!inst.is_finished());
        inst.finished_at = Some(Utc::now());
        assert!(inst.is_finished());
    }
}
