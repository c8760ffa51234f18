use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

pub mod listing;
pub mod login;

/// Key under which struct-level rules report their errors.
const SCHEMA_KEY: &str = "__all__";

/// A single reported problem: struct field name, rule code, message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FieldMessage {
    pub key: String,
    pub code: String,
    pub message: String,
}

impl FieldMessage {
    pub fn is_schema_level(&self) -> bool {
        self.key == SCHEMA_KEY
    }
}

/// First message recorded per field; struct-level rules come last so that a
/// field's own rule takes precedence.
pub(crate) fn first_messages(errors: &ValidationErrors) -> Vec<FieldMessage> {
    let mut messages: Vec<FieldMessage> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let key: &str = field.as_ref();
            let key = key.to_string();
            let per_rule: Vec<FieldMessage> = if key == SCHEMA_KEY {
                errs.iter().map(|err| to_message(&key, err)).collect()
            } else {
                errs.first().map(|err| to_message(&key, err)).into_iter().collect()
            };
            per_rule
        })
        .collect();
    messages.sort_by_key(|m| m.is_schema_level());
    messages
}

fn to_message(key: &str, err: &ValidationError) -> FieldMessage {
    let message = err
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string());
    FieldMessage {
        key: key.to_string(),
        code: err.code.to_string(),
        message,
    }
}

pub(crate) fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
