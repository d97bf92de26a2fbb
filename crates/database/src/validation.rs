use crate::error::{ServiceError, ServiceResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field-level validation messages, keyed by the submitted field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub const MAX_STRING_LENGTH: usize = 255;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Records a message when `value` is blank, and checks its length otherwise
    pub fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("The {} field is required.", label(field)));
        } else {
            self.max_length(field, value);
        }
    }

    pub fn max_length(&mut self, field: &str, value: &str) {
        if value.chars().count() > Self::MAX_STRING_LENGTH {
            self.add(
                field,
                format!(
                    "The {} field must not be greater than {} characters.",
                    label(field),
                    Self::MAX_STRING_LENGTH
                ),
            );
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> ServiceResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }
}

/// "branch_id" reads as "branch id" in messages
fn label(field: &str) -> String {
    field.trim_end_matches("_id").replace('_', " ")
}
