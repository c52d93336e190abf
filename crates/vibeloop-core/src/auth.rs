//! Backend authentication client: password login, Google login, OTP
//! send/verify, and account registration.
//!
//! Validation errors (empty fields, malformed phone/OTP) are raised
//! locally and never reach the network.

use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http::{build_client, check_response, normalize_base_url};
use crate::models::UserRef;
use crate::session::Session;
use crate::util::is_digits;

const PHONE_DIGITS: usize = 10;
const OTP_DIGITS: usize = 6;

/// Where a one-time passcode is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpChannel {
    Email(String),
    Phone(String),
}

impl OtpChannel {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Email(email) => validate_email(email),
            Self::Phone(phone) => {
                if is_digits(phone.trim(), PHONE_DIGITS) {
                    Ok(())
                } else {
                    Err(Error::Validation(format!(
                        "phone number must be exactly {PHONE_DIGITS} digits"
                    )))
                }
            }
        }
    }

    fn payload(&self, code: Option<&str>) -> serde_json::Value {
        let mut payload = match self {
            Self::Email(email) => serde_json::json!({ "email": email.trim() }),
            Self::Phone(phone) => serde_json::json!({ "phone": phone.trim() }),
        };
        if let Some(code) = code {
            payload["otp"] = serde_json::Value::String(code.to_string());
        }
        payload
    }
}

/// Details collected by the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Outcome of a successful registration.
///
/// The backend may sign the account in directly; otherwise the caller
/// routes the user to the login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    SignedIn(Session),
    LoginRequired,
}

/// HTTP client for the backend's auth surface.
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    client: Client,
}

impl AuthClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            client: build_client()?,
        })
    }

    /// Email + password login. Returns the session to store.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validate_email(email)?;
        if password.trim().is_empty() {
            return Err(Error::Validation("password is required".into()));
        }

        let payload = serde_json::json!({
            "email": email.trim(),
            "password": password,
        });
        let response = self
            .client
            .post(format!("{}/users/login", self.base_url))
            .json(&payload)
            .send()
            .await?;
        let payload = check_response(response)
            .await?
            .json::<LoginResponse>()
            .await?;
        payload.into_session()
    }

    /// Login with a Google-issued identity token.
    pub async fn google_login(&self, id_token: &str) -> Result<Session> {
        if id_token.trim().is_empty() {
            return Err(Error::Validation("Google credential is required".into()));
        }

        let payload = serde_json::json!({ "token": id_token });
        let response = self
            .client
            .post(format!("{}/users/google-login", self.base_url))
            .json(&payload)
            .send()
            .await?;
        let payload = check_response(response)
            .await?
            .json::<LoginResponse>()
            .await?;
        payload.into_session()
    }

    /// Request a one-time passcode on the given channel.
    pub async fn send_otp(&self, channel: &OtpChannel) -> Result<()> {
        channel.validate()?;

        let response = self
            .client
            .post(format!("{}/users/send-otp", self.base_url))
            .json(&channel.payload(None))
            .send()
            .await?;
        let ack = check_response(response).await?.json::<Ack>().await?;
        ack.into_result("failed to send OTP")
    }

    /// Verify a 6-digit passcode previously sent on the channel.
    pub async fn verify_otp(&self, channel: &OtpChannel, code: &str) -> Result<()> {
        channel.validate()?;
        let code = code.trim();
        if !is_digits(code, OTP_DIGITS) {
            return Err(Error::Validation(format!(
                "OTP must be exactly {OTP_DIGITS} digits"
            )));
        }

        let response = self
            .client
            .post(format!("{}/users/verify-otp", self.base_url))
            .json(&channel.payload(Some(code)))
            .send()
            .await?;
        let ack = check_response(response).await?.json::<Ack>().await?;
        ack.into_result("invalid OTP")
    }

    /// Create the account after OTP verification.
    pub async fn register(&self, account: &NewAccount) -> Result<RegisterOutcome> {
        validate_account(account)?;

        let payload = serde_json::json!({
            "name": account.name.trim(),
            "email": account.email.trim(),
            "password": account.password,
        });
        let response = self
            .client
            .post(format!("{}/users/register", self.base_url))
            .json(&payload)
            .send()
            .await?;
        let payload = check_response(response)
            .await?
            .json::<RegisterResponse>()
            .await?;

        if !payload.success {
            return Err(Error::Api(
                payload
                    .message
                    .unwrap_or_else(|| "registration failed".to_string()),
            ));
        }
        match (payload.token, payload.user) {
            (Some(token), Some(user)) => Ok(RegisterOutcome::SignedIn(Session { token, user })),
            _ => Ok(RegisterOutcome::LoginRequired),
        }
    }
}

/// Validate registration details locally, including password confirmation.
pub fn validate_registration(account: &NewAccount, confirm_password: &str) -> Result<()> {
    validate_account(account)?;
    if account.password != confirm_password {
        return Err(Error::Validation("passwords do not match".into()));
    }
    Ok(())
}

fn validate_account(account: &NewAccount) -> Result<()> {
    if account.name.trim().is_empty() {
        return Err(Error::Validation("name is required".into()));
    }
    validate_email(&account.email)?;
    if account.password.trim().is_empty() {
        return Err(Error::Validation("password is required".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::Validation("email is required".into()));
    }
    if !email.contains('@') {
        return Err(Error::Validation("email address is malformed".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: UserRef,
}

impl LoginResponse {
    fn into_session(self) -> Result<Session> {
        let token = self.token.trim().to_string();
        if token.is_empty() {
            return Err(Error::Api(
                "login response did not include a token".to_string(),
            ));
        }
        Ok(Session {
            token,
            user: self.user,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Ack {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

impl Ack {
    fn into_result(self, fallback: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Api(
                self.message.unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserRef>,
}
