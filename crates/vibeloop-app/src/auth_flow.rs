//! Sign-in, registration, and phone-verification flows.
//!
//! These are the only writers of the session store. Each flow validates
//! its form locally before touching the network and records the session
//! only on a confirmed success.

use std::sync::{Mutex, MutexGuard, PoisonError};

use vibeloop_core::auth::{validate_registration, NewAccount, OtpChannel, RegisterOutcome};
use vibeloop_core::session::SessionPersistence;
use vibeloop_core::util::is_digits;
use vibeloop_core::{Error, Result, Session, SessionStore};

use crate::backend::AuthApi;
use crate::notify::NoticeQueue;

const OTP_DIGITS: usize = 6;
const PHONE_DIGITS: usize = 10;

/// Email/password and Google sign-in plus sign-out.
pub struct SignInFlow<A, P: SessionPersistence> {
    auth: A,
    session: SessionStore<P>,
    notices: NoticeQueue,
}

impl<A: AuthApi, P: SessionPersistence> SignInFlow<A, P> {
    pub fn new(auth: A, session: SessionStore<P>, notices: NoticeQueue) -> Self {
        Self {
            auth,
            session,
            notices,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        match self.auth.login(email, password).await {
            Ok(session) => {
                self.session.sign_in(session.clone())?;
                self.notices.success("Signed in");
                Ok(session)
            }
            Err(error) => {
                if !matches!(error, Error::Validation(_)) {
                    self.notices.error("Sign-in failed");
                }
                Err(error)
            }
        }
    }

    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<Session> {
        match self.auth.google_login(id_token).await {
            Ok(session) => {
                self.session.sign_in(session.clone())?;
                self.notices.success("Signed in");
                Ok(session)
            }
            Err(error) => {
                self.notices.error("Google sign-in failed");
                Err(error)
            }
        }
    }

    pub fn sign_out(&self) -> Result<()> {
        self.session.sign_out()?;
        self.notices.info("Signed out");
        Ok(())
    }
}

/// Where the registration form currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegistrationStage {
    #[default]
    Details,
    OtpSent,
    Complete,
}

#[derive(Default)]
struct RegistrationState {
    account: Option<NewAccount>,
    stage: RegistrationStage,
}

/// Three-step registration: details, emailed OTP, account creation.
pub struct RegistrationFlow<A, P: SessionPersistence> {
    auth: A,
    session: SessionStore<P>,
    notices: NoticeQueue,
    state: Mutex<RegistrationState>,
}

impl<A: AuthApi, P: SessionPersistence> RegistrationFlow<A, P> {
    pub fn new(auth: A, session: SessionStore<P>, notices: NoticeQueue) -> Self {
        Self {
            auth,
            session,
            notices,
            state: Mutex::new(RegistrationState::default()),
        }
    }

    #[must_use]
    pub fn stage(&self) -> RegistrationStage {
        self.lock().stage.clone()
    }

    /// Validate the form and send the OTP to the account email. A
    /// validation or send failure leaves the flow on the details step.
    pub async fn submit_details(
        &self,
        account: NewAccount,
        confirm_password: &str,
    ) -> Result<()> {
        {
            let state = self.lock();
            if state.stage != RegistrationStage::Details {
                return Err(Error::Validation("details were already submitted".into()));
            }
        }
        validate_registration(&account, confirm_password)?;

        let channel = OtpChannel::Email(account.email.clone());
        if let Err(error) = self.auth.send_otp(&channel).await {
            self.notices.error("Couldn't send the verification code");
            return Err(error);
        }

        let mut state = self.lock();
        state.account = Some(account);
        state.stage = RegistrationStage::OtpSent;
        Ok(())
    }

    /// Send a fresh OTP to the address already on file.
    pub async fn resend_otp(&self) -> Result<()> {
        let email = {
            let state = self.lock();
            match (&state.stage, &state.account) {
                (RegistrationStage::OtpSent, Some(account)) => account.email.clone(),
                _ => return Err(Error::Validation("no code has been requested".into())),
            }
        };
        self.auth.send_otp(&OtpChannel::Email(email)).await
    }

    /// Verify the 6-digit code, then create the account. A backend that
    /// returns a session signs the user straight in.
    pub async fn confirm_otp(&self, code: &str) -> Result<RegisterOutcome> {
        let code = code.trim();
        if !is_digits(code, OTP_DIGITS) {
            return Err(Error::Validation(format!(
                "OTP must be exactly {OTP_DIGITS} digits"
            )));
        }
        let account = {
            let state = self.lock();
            match (&state.stage, &state.account) {
                (RegistrationStage::OtpSent, Some(account)) => account.clone(),
                _ => return Err(Error::Validation("no code has been requested".into())),
            }
        };

        let channel = OtpChannel::Email(account.email.clone());
        if let Err(error) = self.auth.verify_otp(&channel, code).await {
            self.notices.error("That code didn't match");
            return Err(error);
        }

        let outcome = self.auth.register(&account).await?;
        if let RegisterOutcome::SignedIn(session) = &outcome {
            self.session.sign_in(session.clone())?;
        }
        self.lock().stage = RegistrationStage::Complete;
        self.notices.success("Account created");
        Ok(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, RegistrationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Standalone phone-number verification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PhoneStage {
    #[default]
    EnterPhone,
    CodeSent(String),
    Verified(String),
}

pub struct PhoneVerification<A> {
    auth: A,
    stage: Mutex<PhoneStage>,
}

impl<A: AuthApi> PhoneVerification<A> {
    pub fn new(auth: A) -> Self {
        Self {
            auth,
            stage: Mutex::new(PhoneStage::EnterPhone),
        }
    }

    #[must_use]
    pub fn stage(&self) -> PhoneStage {
        self.lock().clone()
    }

    /// Send a code to a 10-digit number. Also used to resend.
    pub async fn request_code(&self, phone: &str) -> Result<()> {
        let phone = phone.trim();
        if !is_digits(phone, PHONE_DIGITS) {
            return Err(Error::Validation(format!(
                "phone number must be exactly {PHONE_DIGITS} digits"
            )));
        }
        self.auth
            .send_otp(&OtpChannel::Phone(phone.to_string()))
            .await?;
        *self.lock() = PhoneStage::CodeSent(phone.to_string());
        Ok(())
    }

    pub async fn verify(&self, code: &str) -> Result<()> {
        let code = code.trim();
        if !is_digits(code, OTP_DIGITS) {
            return Err(Error::Validation(format!(
                "OTP must be exactly {OTP_DIGITS} digits"
            )));
        }
        let phone = match &*self.lock() {
            PhoneStage::CodeSent(phone) => phone.clone(),
            _ => return Err(Error::Validation("no code has been requested".into())),
        };
        self.auth
            .verify_otp(&OtpChannel::Phone(phone.clone()), code)
            .await?;
        *self.lock() = PhoneStage::Verified(phone);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, PhoneStage> {
        self.stage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
