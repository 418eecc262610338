//! Sign-in, sign-up, and sign-out.
//!
//! Forms are validated before the identity provider is called. Provider
//! rejections reach the caller with the provider's own message.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::IdentityProvider;
use super::store_errors::from_identity;
use super::{Error, Registration, SessionUser, SignInCredentials};

/// Authentication use-cases over an [`IdentityProvider`].
pub struct AuthService<I: ?Sized> {
    identity: Arc<I>,
}

impl<I: ?Sized> AuthService<I> {
    /// Create the service.
    pub fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }
}

impl<I> AuthService<I>
where
    I: IdentityProvider + ?Sized,
{
    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<SessionUser> {
        self.identity.current_user()
    }

    /// Sign in with raw form input.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, Error> {
        let credentials = SignInCredentials::try_from_parts(email, password)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let user = self
            .identity
            .sign_in(&credentials)
            .await
            .map_err(|err| {
                warn!(error = %err, "sign-in rejected");
                from_identity(err)
            })?;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Create an account, then set its display name.
    ///
    /// A confirmation mismatch is reported as "Passwords do not match"
    /// without contacting the provider.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<SessionUser, Error> {
        let registration = Registration::try_from_parts(name, email, password, confirm_password)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let created = self
            .identity
            .sign_up(registration.credentials())
            .await
            .map_err(|err| {
                warn!(error = %err, "sign-up rejected");
                from_identity(err)
            })?;
        info!(user_id = %created.id, "account created");
        self.identity
            .update_display_name(registration.name())
            .await
            .map_err(|err| {
                warn!(user_id = %created.id, error = %err, "display name update failed");
                from_identity(err)
            })
    }

    /// End the session.
    pub async fn sign_out(&self) -> Result<(), Error> {
        self.identity.sign_out().await.map_err(from_identity)?;
        info!("signed out");
        Ok(())
    }
}
