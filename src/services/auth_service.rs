use tracing::info;

use super::UserService;
use crate::api::AuthRequest;
use crate::auth::{Principal, TokenService};
use crate::error::ApiError;

/// Credential check followed by token issue.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: UserService, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// The authenticated principal and a freshly signed token for it.
    pub async fn login(&self, request: AuthRequest) -> Result<(Principal, String), ApiError> {
        let user = self.users.authenticate(request).await?;
        let principal = Principal {
            auth_user_id: user.id,
            auth_user_role: user.role.role_name,
        };
        let token = self.tokens.generate_token(&principal)?;
        info!("Issued token for user {}", principal.auth_user_id);
        Ok((principal, token))
    }
}
