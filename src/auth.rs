//! Local authentication gate for journal access.
//!
//! PINs are never stored in the clear: enrollment keeps a salted SHA-256
//! digest. There is no built-in default PIN; a gate set to [`AuthMethod::Pin`]
//! stays closed until a PIN has been enrolled.
use crate::state::AppState;
use crate::util::sha256_hex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Wrong PINs allowed before the gate locks.
pub const MAX_PIN_ATTEMPTS: u32 = 5;
const PIN_LENGTHS: std::ops::RangeInclusive<usize> = 4..=6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Pin,
    Biometric,
    #[default]
    None,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthMethod::Pin => "pin",
            AuthMethod::Biometric => "biometric",
            AuthMethod::None => "none",
        })
    }
}

impl FromStr for AuthMethod {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pin" => Ok(AuthMethod::Pin),
            "biometric" => Ok(AuthMethod::Biometric),
            "none" => Ok(AuthMethod::None),
            other => Err(anyhow::anyhow!("unknown auth method {other:?}")),
        }
    }
}

/// Which unlock methods have been set up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(default)]
    pub pin: bool,
    #[serde(default)]
    pub biometric: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential enrolled for this unlock method")]
    NotEnrolled,
    #[error("PIN must be 4 to 6 digits")]
    InvalidPin,
    #[error("incorrect PIN, {remaining} attempts remaining")]
    Mismatch { remaining: u32 },
    #[error("too many incorrect attempts; enroll a new PIN to unlock")]
    LockedOut,
    #[error("biometric authentication is not available on this device")]
    BiometricUnavailable,
    #[error("biometric authentication was rejected")]
    BiometricRejected,
}

/// Checks a presented secret against a stored credential.
pub trait CredentialVerifier {
    fn verify(&self, secret: &str) -> bool;
}

/// Salted digest of an enrolled PIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinCredential {
    pub salt: String,
    pub digest: String,
}

impl PinCredential {
    pub fn enroll(pin: &str) -> Result<Self, AuthError> {
        validate_pin(pin)?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or(0);
        let seed = format!("{nanos}:{}", std::process::id());
        let salt = sha256_hex(seed.as_bytes())[..32].to_string();
        Ok(Self::with_salt(pin, salt))
    }

    fn with_salt(pin: &str, salt: String) -> Self {
        let digest = pin_digest(&salt, pin);
        Self { salt, digest }
    }
}

impl CredentialVerifier for PinCredential {
    fn verify(&self, secret: &str) -> bool {
        constant_time_eq(
            pin_digest(&self.salt, secret).as_bytes(),
            self.digest.as_bytes(),
        )
    }
}

fn pin_digest(salt: &str, pin: &str) -> String {
    sha256_hex(format!("{salt}:{pin}").as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn validate_pin(pin: &str) -> Result<(), AuthError> {
    if PIN_LENGTHS.contains(&pin.len()) && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AuthError::InvalidPin)
    }
}

/// Platform biometric capability.
pub trait BiometricAuthenticator {
    fn available(&self) -> bool;
    /// Prompt the user; `Ok(true)` when they were recognized.
    fn authenticate(&self, reason: &str) -> Result<bool, AuthError>;
}

/// Used where the platform offers no biometric hardware.
#[derive(Debug, Default)]
pub struct UnavailableBiometric;

impl BiometricAuthenticator for UnavailableBiometric {
    fn available(&self) -> bool {
        false
    }

    fn authenticate(&self, _reason: &str) -> Result<bool, AuthError> {
        Err(AuthError::BiometricUnavailable)
    }
}

/// What the user presents to unlock.
pub enum Credential<'a> {
    Pin(&'a str),
    Biometric(&'a dyn BiometricAuthenticator),
}

/// Enroll (or replace) the PIN, clearing any lockout.
pub fn enroll_pin(state: &mut AppState, pin: &str) -> Result<(), AuthError> {
    state.pin_credential = Some(PinCredential::enroll(pin)?);
    state.enrollment.pin = true;
    state.failed_attempts = 0;
    if state.auth_method == AuthMethod::None {
        state.auth_method = AuthMethod::Pin;
    }
    tracing::info!("PIN enrolled");
    Ok(())
}

pub fn enroll_biometric(
    state: &mut AppState,
    biometric: &dyn BiometricAuthenticator,
) -> Result<(), AuthError> {
    if !biometric.available() {
        return Err(AuthError::BiometricUnavailable);
    }
    if !biometric.authenticate("Enable biometric unlock for your journal")? {
        return Err(AuthError::BiometricRejected);
    }
    state.enrollment.biometric = true;
    Ok(())
}

/// Select the preferred unlock method; it must already be enrolled.
pub fn set_method(state: &mut AppState, method: AuthMethod) -> Result<(), AuthError> {
    let enrolled = match method {
        AuthMethod::Pin => state.enrollment.pin && state.pin_credential.is_some(),
        AuthMethod::Biometric => state.enrollment.biometric,
        AuthMethod::None => true,
    };
    if !enrolled {
        return Err(AuthError::NotEnrolled);
    }
    state.auth_method = method;
    Ok(())
}

/// Try to open the gate. Failed PIN attempts are counted in `state`.
pub fn unlock(state: &mut AppState, credential: Credential<'_>) -> Result<(), AuthError> {
    match (state.auth_method, credential) {
        (AuthMethod::None, _) => Ok(()),
        (AuthMethod::Biometric, Credential::Biometric(biometric)) => {
            if !state.enrollment.biometric {
                return Err(AuthError::NotEnrolled);
            }
            if !biometric.available() {
                return Err(AuthError::BiometricUnavailable);
            }
            if biometric.authenticate("Unlock your journal")? {
                Ok(())
            } else {
                Err(AuthError::BiometricRejected)
            }
        }
        // A PIN is always accepted as the backup for biometric unlock.
        (AuthMethod::Pin | AuthMethod::Biometric, Credential::Pin(pin)) => {
            unlock_with_pin(state, pin)
        }
        (AuthMethod::Pin, Credential::Biometric(_)) => Err(AuthError::NotEnrolled),
    }
}

fn unlock_with_pin(state: &mut AppState, pin: &str) -> Result<(), AuthError> {
    let Some(credential) = state.pin_credential.as_ref().filter(|_| state.enrollment.pin) else {
        return Err(AuthError::NotEnrolled);
    };
    if state.failed_attempts >= MAX_PIN_ATTEMPTS {
        return Err(AuthError::LockedOut);
    }
    validate_pin(pin)?;
    if credential.verify(pin) {
        state.failed_attempts = 0;
        tracing::info!("journal unlocked");
        return Ok(());
    }
    state.failed_attempts += 1;
    let remaining = MAX_PIN_ATTEMPTS - state.failed_attempts;
    tracing::warn!(remaining, "incorrect PIN");
    if remaining == 0 {
        Err(AuthError::LockedOut)
    } else {
        Err(AuthError::Mismatch { remaining })
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
