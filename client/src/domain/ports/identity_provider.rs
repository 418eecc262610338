//! Port for the hosted identity provider.
//!
//! The provider owns the session: adapters remember the signed-in user
//! after a successful sign-in or sign-up and forget it on sign-out.

use async_trait::async_trait;

use crate::domain::{SessionUser, SignInCredentials};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity adapters.
    pub enum IdentityProviderError {
        /// The provider refused the request; the message is shown verbatim.
        Rejected { message: String } => "{message}",
        /// The provider could not be reached.
        Connection { message: String } => "identity provider unreachable: {message}",
        /// No user is signed in.
        NotSignedIn => "no user is signed in",
    }
}

/// Port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<SessionUser>;

    /// Sign in with email and password.
    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionUser, IdentityProviderError>;

    /// Create an account and sign into it.
    async fn sign_up(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionUser, IdentityProviderError>;

    /// Set the signed-in user's display name.
    async fn update_display_name(&self, name: &str)
    -> Result<SessionUser, IdentityProviderError>;

    /// End the session.
    async fn sign_out(&self) -> Result<(), IdentityProviderError>;
}
