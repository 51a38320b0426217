use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Account role. Roles this client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Agency,
    Admin,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Agency => "agency",
            Role::Admin => "admin",
            Role::Other(name) => name,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            "agency" => Role::Agency,
            "admin" => Role::Admin,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl FromStr for Role {
    type Err = String;

    /// Strict parse for user input: only the known roles are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Role::from(s.to_ascii_lowercase()) {
            Role::Other(other) => Err(format!(
                "unknown role '{}' (expected user, agency or admin)",
                other
            )),
            role => Ok(role),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

/// Token pair issued on login and registration.
#[derive(Debug, Deserialize)]
pub struct AuthTokens {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Login/registration response.
#[derive(Debug, Deserialize)]
pub struct AuthSession {
    pub user: UserSummary,
    pub tokens: AuthTokens,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: UserSummary,
}

/// Body of a successful `/auth/refresh`.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Present when the server rotates refresh tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

fn expose<S: Serializer>(secret: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn check_present(secret: &Secret<String>, code: &'static str) -> Result<(), ValidationError> {
    if secret.expose_secret().is_empty() {
        return Err(ValidationError::new(code));
    }
    Ok(())
}

fn check_strength(secret: &Secret<String>) -> Result<(), ValidationError> {
    if secret.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new("password_too_short"));
    }
    Ok(())
}

// Secret fields are checked at struct level: field rules require a
// `Serialize` value. Errors land under `__all__`.
fn login_password(request: &LoginRequest) -> Result<(), ValidationError> {
    check_present(&request.password, "password_required")
}

fn register_password(request: &RegisterRequest) -> Result<(), ValidationError> {
    check_strength(&request.password)
}

fn change_password_fields(request: &ChangePasswordRequest) -> Result<(), ValidationError> {
    check_present(&request.old_password, "current_password_required")?;
    check_strength(&request.new_password)
}

#[derive(Debug, Serialize, Validate)]
#[validate(schema(function = "login_password", skip_on_field_errors = false))]
pub struct LoginRequest {
    /// Username or email.
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(serialize_with = "expose")]
    pub password: Secret<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
        }
    }
}

#[derive(Debug, Serialize, Validate)]
#[validate(schema(function = "register_password", skip_on_field_errors = false))]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 80))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Serialize, Validate)]
#[validate(schema(function = "change_password_fields", skip_on_field_errors = false))]
pub struct ChangePasswordRequest {
    #[serde(serialize_with = "expose")]
    pub old_password: Secret<String>,
    #[serde(serialize_with = "expose")]
    pub new_password: Secret<String>,
}
