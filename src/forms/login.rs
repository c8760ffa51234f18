use std::collections::BTreeMap;

use serde::Deserialize;
use validator::Validate;

use crate::forms::first_messages;

/// Credentials entered on the login page.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(
        length(min = 1, message = "Email is required."),
        email(message = "Invalid email address.")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl LoginForm {
    /// Validate every field, returning one message per failing field.
    pub fn check(&self) -> Result<(), BTreeMap<String, String>> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) => Err(first_messages(&errors)
                .into_iter()
                .map(|entry| (entry.key, entry.message))
                .collect()),
        }
    }
}
