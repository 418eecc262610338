//! Signed-in users and authentication inputs.
//!
//! Credentials are validated locally before the identity provider is
//! contacted, so a mismatched confirmation never leaves the client.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Author label used when a user has neither a display name nor an email.
pub const FALLBACK_AUTHOR: &str = "User";

/// Validation errors for user identifiers and authentication forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Identity provider returned a blank user id.
    EmptyUserId,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
    /// Display name was missing or blank once trimmed.
    EmptyName,
    /// Password and confirmation differ.
    PasswordMismatch,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::PasswordMismatch => write!(f, "Passwords do not match"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Identity-provider user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, AuthValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AuthValidationError::EmptyUserId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = AuthValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// The currently signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl SessionUser {
    /// Build a session user, treating blank names and emails as absent.
    pub fn new(id: UserId, display_name: Option<String>, email: Option<String>) -> Self {
        Self {
            id,
            display_name: display_name.filter(|name| !name.trim().is_empty()),
            email: email.filter(|email| !email.trim().is_empty()),
        }
    }

    /// Label recorded as the author of questions and answers.
    ///
    /// # Examples
    /// ```
    /// use stackit_client::domain::{SessionUser, UserId};
    ///
    /// let id = UserId::new("u1").expect("id");
    /// let anonymous = SessionUser::new(id.clone(), None, None);
    /// assert_eq!(anonymous.author_name(), "User");
    /// let mailed = SessionUser::new(id, None, Some("ada@example.com".into()));
    /// assert_eq!(mailed.author_name(), "ada@example.com");
    /// ```
    pub fn author_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(FALLBACK_AUTHOR)
    }
}

/// Validated sign-in form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw form inputs.
    ///
    /// The email is trimmed; the password keeps caller-provided whitespace.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    credentials: SignInCredentials,
}

impl Registration {
    /// Construct a registration from raw form inputs.
    ///
    /// # Examples
    /// ```
    /// use stackit_client::domain::{AuthValidationError, Registration};
    ///
    /// let err = Registration::try_from_parts("Ada", "ada@example.com", "one", "two")
    ///     .expect_err("mismatch");
    /// assert_eq!(err, AuthValidationError::PasswordMismatch);
    /// assert_eq!(err.to_string(), "Passwords do not match");
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, AuthValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthValidationError::EmptyName);
        }
        let credentials = SignInCredentials::try_from_parts(email, password)?;
        if password != confirm_password {
            return Err(AuthValidationError::PasswordMismatch);
        }
        Ok(Self {
            name: name.to_owned(),
            credentials,
        })
    }

    /// Display name to set after the account is created.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email and password for account creation.
    pub fn credentials(&self) -> &SignInCredentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn id() -> UserId {
        UserId::new("uid-1").expect("id")
    }

    #[rstest]
    #[case(Some("Ada"), Some("ada@example.com"), "Ada")]
    #[case(None, Some("ada@example.com"), "ada@example.com")]
    #[case(Some("  "), Some("ada@example.com"), "ada@example.com")]
    #[case(None, None, "User")]
    fn author_name_falls_back(
        #[case] display_name: Option<&str>,
        #[case] email: Option<&str>,
        #[case] expected: &str,
    ) {
        let user = SessionUser::new(id(), display_name.map(Into::into), email.map(Into::into));
        assert_eq!(user.author_name(), expected);
    }

    #[rstest]
    #[case("", "pw", AuthValidationError::EmptyEmail)]
    #[case("   ", "pw", AuthValidationError::EmptyEmail)]
    #[case("a@b.c", "", AuthValidationError::EmptyPassword)]
    fn invalid_sign_in(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err = SignInCredentials::try_from_parts(email, password).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn sign_in_trims_email_but_not_password() {
        let creds = SignInCredentials::try_from_parts(" a@b.c ", " pw ").expect("valid");
        assert_eq!(creds.email(), "a@b.c");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case("", "a@b.c", "pw", "pw", AuthValidationError::EmptyName)]
    #[case("Ada", "", "pw", "pw", AuthValidationError::EmptyEmail)]
    #[case("Ada", "a@b.c", "", "", AuthValidationError::EmptyPassword)]
    #[case("Ada", "a@b.c", "pw", "pw2", AuthValidationError::PasswordMismatch)]
    fn invalid_registration(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] confirm: &str,
        #[case] expected: AuthValidationError,
    ) {
        let err =
            Registration::try_from_parts(name, email, password, confirm).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn registration_keeps_name_and_credentials() {
        let registration =
            Registration::try_from_parts(" Ada ", "a@b.c", "pw", "pw").expect("valid");
        assert_eq!(registration.name(), "Ada");
        assert_eq!(registration.credentials().email(), "a@b.c");
    }

    #[rstest]
    fn blank_user_id_is_rejected() {
        assert_eq!(UserId::new(" "), Err(AuthValidationError::EmptyUserId));
    }
}
