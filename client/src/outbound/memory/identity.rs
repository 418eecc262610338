//! In-memory identity provider.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{SessionUser, SignInCredentials, UserId};

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    user: SessionUser,
    password: Zeroizing<String>,
}

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, Account>,
    current: Option<SessionUser>,
    next_id: u64,
}

/// Process-local accounts with the hosted provider's rejection messages.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<Accounts>,
}

impl InMemoryIdentityProvider {
    /// Provider with `user` already signed in.
    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            accounts: Mutex::new(Accounts {
                current: Some(user),
                ..Accounts::default()
            }),
        }
    }

    fn accounts(&self) -> MutexGuard<'_, Accounts> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    fn current_user(&self) -> Option<SessionUser> {
        self.accounts().current.clone()
    }

    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionUser, IdentityProviderError> {
        let mut accounts = self.accounts();
        let user = accounts
            .by_email
            .get(credentials.email())
            .filter(|account| account.password.as_str() == credentials.password())
            .map(|account| account.user.clone())
            .ok_or_else(|| IdentityProviderError::rejected("INVALID_LOGIN_CREDENTIALS"))?;
        accounts.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_up(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionUser, IdentityProviderError> {
        let mut accounts = self.accounts();
        if accounts.by_email.contains_key(credentials.email()) {
            return Err(IdentityProviderError::rejected("EMAIL_EXISTS"));
        }
        if credentials.password().chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityProviderError::rejected(
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }
        accounts.next_id += 1;
        let id = UserId::new(format!("local-{}", accounts.next_id))
            .map_err(|err| IdentityProviderError::rejected(err.to_string()))?;
        let user = SessionUser::new(id, None, Some(credentials.email().to_owned()));
        accounts.by_email.insert(
            credentials.email().to_owned(),
            Account {
                user: user.clone(),
                password: Zeroizing::new(credentials.password().to_owned()),
            },
        );
        accounts.current = Some(user.clone());
        Ok(user)
    }

    async fn update_display_name(
        &self,
        name: &str,
    ) -> Result<SessionUser, IdentityProviderError> {
        let mut accounts = self.accounts();
        let current = accounts
            .current
            .clone()
            .ok_or_else(IdentityProviderError::not_signed_in)?;
        let user = SessionUser::new(current.id, Some(name.to_owned()), current.email);
        if let Some(email) = user.email.clone() {
            if let Some(account) = accounts.by_email.get_mut(&email) {
                account.user = user.clone();
            }
        }
        accounts.current = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.accounts().current = None;
        Ok(())
    }
}
