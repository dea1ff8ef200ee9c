use tracing::info;

use crate::domain::entities::Session;
use crate::domain::errors::ApiError;
use crate::interface_adapters::endpoints;
use crate::interface_adapters::http::RestClient;
use crate::interface_adapters::protocol::{
    AccountDto, LoginRequest, LoginResponse, RegisterRequest,
};

/// Authentication operations plus the remember-me bookkeeping around them.
#[derive(Clone)]
pub struct AuthService {
    rest: RestClient,
}

impl AuthService {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Logs in and persists the session: durable storage when `remember`
    /// holds, per-tab storage otherwise. The login email is remembered or
    /// forgotten along with the choice.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<Session, ApiError> {
        let response: LoginResponse = self
            .rest
            .post_json(
                endpoints::AUTH_LOGIN,
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let session = Session {
            token: response.token,
            role: response.user.role,
            user_id: response.user.id,
            display_name: response.user.display_name.unwrap_or_default(),
        };
        let vault = self.rest.vault();
        vault.set(&session, remember);
        vault.set_remembered_email(remember.then_some(email));
        info!(user_id = %session.user_id, role = ?session.role, "logged in");
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AccountDto, ApiError> {
        self.rest
            .post_json(endpoints::AUTH_REGISTER, request)
            .await
    }

    /// Asks the backend whether the stored token is still good. A 401 runs
    /// the global session-expiry path.
    pub async fn validate_token(&self) -> Result<AccountDto, ApiError> {
        self.rest.get_json(endpoints::AUTH_VALIDATE).await
    }

    pub fn logout(&self) {
        info!("logging out; clearing session");
        self.rest.vault().clear();
    }

    /// Login-form prefill from the last remembered login.
    pub fn remembered_email(&self) -> Option<String> {
        self.rest.vault().remembered_email()
    }
}
