use std::sync::OnceLock;

use reqwest::Client;

use crate::dto::{LoginRequest, LoginResponse};
use crate::forms::login::LoginForm;
use crate::models::auth::AuthenticatedUser;
use crate::services::LoginError;

/// Supplies the bearer credential a submission should carry.
pub trait CredentialSource {
    fn credential(&self) -> Option<String>;
}

impl CredentialSource for Option<String> {
    fn credential(&self) -> Option<String> {
        self.clone()
    }
}

impl CredentialSource for str {
    fn credential(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Session identity, written once after login and read on every submission.
#[derive(Debug, Default)]
pub struct SessionStore {
    user: OnceLock<AuthenticatedUser>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn establish(&self, user: AuthenticatedUser) -> Result<(), LoginError> {
        self.user
            .set(user)
            .map_err(|_| LoginError::AlreadyAuthenticated)
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.get().is_some()
    }
}

impl CredentialSource for SessionStore {
    fn credential(&self) -> Option<String> {
        self.user.get().map(|user| user.access_token.clone())
    }
}

/// Exchanges email and password for a session identity.
#[derive(Clone, Debug)]
pub struct LoginClient {
    client: Client,
    login_url: String,
}

impl LoginClient {
    pub fn new(client: Client, login_url: String) -> Self {
        Self { client, login_url }
    }

    pub async fn login(
        &self,
        form: &LoginForm,
        session: &SessionStore,
    ) -> Result<AuthenticatedUser, LoginError> {
        form.check().map_err(LoginError::Validation)?;
        if session.is_authenticated() {
            return Err(LoginError::AlreadyAuthenticated);
        }

        let response = self
            .client
            .post(&self.login_url)
            .json(&LoginRequest {
                email: &form.email,
                password: &form.password,
            })
            .send()
            .await
            .map_err(LoginError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Login rejected with status {}", status);
            return Err(LoginError::InvalidCredentials);
        }

        let body: LoginResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                log::warn!("Login response is not a user record: {err}");
                return Err(LoginError::InvalidCredentials);
            }
        };

        let user = AuthenticatedUser::from_login(body).ok_or(LoginError::InvalidCredentials)?;
        session.establish(user.clone())?;
        log::info!("Logged in as {}", user.email);
        Ok(user)
    }
}
