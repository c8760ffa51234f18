use serde::{Deserialize, Serialize};

use crate::dto::LoginResponse;

/// Identity captured after a successful login exchange.
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub access_token: String,
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AuthenticatedUser {
    /// Build the session identity; a response without a token is not a login.
    pub fn from_login(response: LoginResponse) -> Option<Self> {
        let token = response.token.filter(|t| !t.is_empty())?;
        Some(Self {
            id: response.id.unwrap_or_default(),
            name: response.name.unwrap_or_default(),
            email: response.email.unwrap_or_default(),
            access_token: token,
        })
    }
}
