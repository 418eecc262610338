//! Reqwest-backed Identity Toolkit adapter.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::dto::{AccountDto, ErrorEnvelopeDto, PasswordRequest, UpdateProfileRequest};
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{SessionUser, SignInCredentials, UserId};

const SIGN_IN: &str = "accounts:signInWithPassword";
const SIGN_UP: &str = "accounts:signUp";
const UPDATE: &str = "accounts:update";

struct Session {
    user: SessionUser,
    id_token: Zeroizing<String>,
}

/// Identity provider speaking the Identity Toolkit REST dialect.
///
/// The adapter keeps the signed-in user and their id token in memory; a
/// fresh process starts signed out.
pub struct IdentityToolkitProvider {
    client: Client,
    base: Url,
    api_key: Option<String>,
    session: Mutex<Option<Session>>,
}

impl IdentityToolkitProvider {
    /// Build an adapter rooted at `base`, e.g.
    /// `https://identitytoolkit.googleapis.com/v1/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
            api_key,
            session: Mutex::new(None),
        })
    }

    fn session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<AccountDto, IdentityProviderError> {
        let url = endpoint(&self.base, method, self.api_key.as_deref())?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let error = map_status_error(status, bytes.as_ref());
            warn!(method, status = status.as_u16(), error = %error, "identity request failed");
            return Err(error);
        }
        serde_json::from_slice(bytes.as_ref()).map_err(|err| {
            IdentityProviderError::connection(format!("invalid {method} response: {err}"))
        })
    }

    fn remember(
        &self,
        dto: AccountDto,
        fallback_token: Option<Zeroizing<String>>,
    ) -> Result<SessionUser, IdentityProviderError> {
        let user = session_user(&dto)?;
        let id_token = dto
            .id_token
            .map(Zeroizing::new)
            .or(fallback_token)
            .ok_or_else(|| IdentityProviderError::connection("response carried no id token"))?;
        *self.session() = Some(Session {
            user: user.clone(),
            id_token,
        });
        Ok(user)
    }

    async fn password_call(
        &self,
        method: &str,
        credentials: &SignInCredentials,
    ) -> Result<SessionUser, IdentityProviderError> {
        let body = PasswordRequest {
            email: credentials.email(),
            password: credentials.password(),
            return_secure_token: true,
        };
        let dto = self.post(method, &body).await?;
        let user = self.remember(dto, None)?;
        debug!(user_id = %user.id, method, "identity session established");
        Ok(user)
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// `accounts:*` segments must be joined as `./accounts:…`; a bare colon
/// segment would parse as a URL scheme.
fn endpoint(
    base: &Url,
    method: &str,
    api_key: Option<&str>,
) -> Result<Url, IdentityProviderError> {
    let mut url = base
        .join(&format!("./{method}"))
        .map_err(|err| IdentityProviderError::connection(format!("invalid endpoint: {err}")))?;
    if let Some(key) = api_key {
        url.query_pairs_mut().append_pair("key", key);
    }
    Ok(url)
}

fn session_user(dto: &AccountDto) -> Result<SessionUser, IdentityProviderError> {
    let id = UserId::new(dto.local_id.clone())
        .map_err(|err| IdentityProviderError::connection(err.to_string()))?;
    Ok(SessionUser::new(
        id,
        dto.display_name.clone(),
        dto.email.clone(),
    ))
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::connection(format!("request timed out: {error}"))
    } else {
        IdentityProviderError::connection(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match serde_json::from_slice::<ErrorEnvelopeDto>(body) {
        Ok(envelope) => IdentityProviderError::rejected(envelope.error.message),
        Err(_) if status.is_server_error() => {
            IdentityProviderError::connection(format!("status {}", status.as_u16()))
        }
        Err(_) => IdentityProviderError::rejected(format!(
            "request rejected with status {}",
            status.as_u16()
        )),
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    fn current_user(&self) -> Option<SessionUser> {
        self.session().as_ref().map(|session| session.user.clone())
    }

    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionUser, IdentityProviderError> {
        self.password_call(SIGN_IN, credentials).await
    }

    async fn sign_up(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<SessionUser, IdentityProviderError> {
        self.password_call(SIGN_UP, credentials).await
    }

    async fn update_display_name(
        &self,
        name: &str,
    ) -> Result<SessionUser, IdentityProviderError> {
        let token = self
            .session()
            .as_ref()
            .map(|session| session.id_token.clone())
            .ok_or_else(IdentityProviderError::not_signed_in)?;
        let body = UpdateProfileRequest {
            id_token: token.as_str(),
            display_name: name,
            return_secure_token: true,
        };
        let dto = self.post(UPDATE, &body).await?;
        self.remember(dto, Some(token))
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        *self.session() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://id.example/v1", Some("k"), "https://id.example/v1/accounts:signUp?key=k")]
    #[case("https://id.example/v1/", None, "https://id.example/v1/accounts:signUp")]
    fn endpoints_keep_the_colon_segment(
        #[case] base: &str,
        #[case] key: Option<&str>,
        #[case] expected: &str,
    ) {
        let base = with_trailing_slash(Url::parse(base).expect("url"));
        let url = endpoint(&base, SIGN_UP, key).expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case(
        StatusCode::BAD_REQUEST,
        br#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#.as_slice(),
        IdentityProviderError::rejected("EMAIL_EXISTS")
    )]
    #[case(
        StatusCode::BAD_GATEWAY,
        b"<html>".as_slice(),
        IdentityProviderError::connection("status 502")
    )]
    #[case(
        StatusCode::FORBIDDEN,
        b"".as_slice(),
        IdentityProviderError::rejected("request rejected with status 403")
    )]
    fn status_errors_surface_the_provider_message(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: IdentityProviderError,
    ) {
        assert_eq!(map_status_error(status, body), expected);
    }

    #[rstest]
    fn blank_local_ids_are_rejected() {
        let dto = AccountDto {
            local_id: " ".into(),
            email: None,
            display_name: None,
            id_token: None,
        };
        assert!(matches!(
            session_user(&dto),
            Err(IdentityProviderError::Connection { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn updating_the_name_requires_a_session() {
        let provider = IdentityToolkitProvider::new(
            Url::parse("https://id.example/v1/").expect("url"),
            None,
            Duration::from_secs(1),
        )
        .expect("client");
        assert_eq!(provider.current_user(), None);
        let err = provider
            .update_display_name("Ada")
            .await
            .expect_err("signed out");
        assert_eq!(err, IdentityProviderError::NotSignedIn);
    }
}
