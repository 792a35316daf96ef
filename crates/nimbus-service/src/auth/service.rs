//! Session lifecycle.

use tracing::{info, warn};

use nimbus_core::error::{AppError, ErrorKind};
use nimbus_entity::{AuthSession, LoginRequest, RegisterRequest, UserProfile};

use crate::context::ServiceContext;

/// Signs users in and out and keeps the gateway token in step with the
/// stored session.
#[derive(Debug, Clone)]
pub struct AuthService {
    ctx: ServiceContext,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sign in with email and password.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AppError> {
        request.validate()?;
        let session = self.ctx.gateway.login(&request).await?;
        self.adopt(session.clone()).await?;
        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Create an account and sign in with it.
    pub async fn register(
        &self,
        request: RegisterRequest,
        confirm_password: &str,
    ) -> Result<AuthSession, AppError> {
        request.validate(confirm_password)?;
        let session = self.ctx.gateway.register(&request).await?;
        self.adopt(session.clone()).await?;
        info!(user_id = %session.user.id, "Registered and signed in");
        Ok(session)
    }

    /// Forget the session locally. The server keeps no session to end.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.ctx.gateway.set_bearer_token(None).await;
        let mut state = self.ctx.state.write().await;
        state.reset_on_logout()?;
        info!("Signed out");
        Ok(())
    }

    /// Re-attach a stored session at startup.
    ///
    /// The token is checked against `GET /auth/me`. A rejected token signs
    /// the user out; a network failure keeps the stored session so the
    /// next call can try again.
    pub async fn restore(&self) -> Result<Option<UserProfile>, AppError> {
        let token = {
            let state = self.ctx.state.read().await;
            match state.session() {
                Some(session) => session.token.clone(),
                None => return Ok(None),
            }
        };
        self.ctx.gateway.set_bearer_token(Some(token)).await;

        match self.ctx.gateway.current_user().await {
            Ok(user) => {
                self.ctx.state.write().await.update_user(user.clone())?;
                info!(user_id = %user.id, "Session restored");
                Ok(Some(user))
            }
            Err(e) if e.kind == ErrorKind::Authentication => {
                warn!("Stored session was rejected, signing out");
                self.logout().await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Refresh and return the signed-in user's profile.
    pub async fn me(&self) -> Result<UserProfile, AppError> {
        self.require_session().await?;
        let user = self.ctx.gateway.current_user().await?;
        self.ctx.state.write().await.update_user(user.clone())?;
        Ok(user)
    }

    /// The current session, if any.
    pub async fn session(&self) -> Option<AuthSession> {
        self.ctx.state.read().await.session().cloned()
    }

    async fn require_session(&self) -> Result<(), AppError> {
        if self.ctx.state.read().await.is_signed_in() {
            Ok(())
        } else {
            Err(AppError::authentication("Please sign in first"))
        }
    }

    async fn adopt(&self, session: AuthSession) -> Result<(), AppError> {
        self.ctx
            .gateway
            .set_bearer_token(Some(session.token.clone()))
            .await;
        let mut state = self.ctx.state.write().await;
        if state.session().is_some_and(|s| s.user.id != session.user.id) {
            state.reset_on_logout()?;
        }
        state.set_session(session)
    }
}
