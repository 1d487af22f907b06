use garde::Validate;
use serde::Deserialize;

use super::json::{trimmed, Normalize};
use super::rules::{at_least, email_address, required};

/// The request payload for user registration.
///
/// Absent fields default to empty so that each one is reported by name.
#[derive(Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[garde(custom(required("Name", 50)))]
    pub name: String,
    #[garde(custom(email_address))]
    pub email: String,
    #[garde(custom(at_least(6, "Password must be at least 6 characters")))]
    pub password: String,
}

impl Normalize for RegisterRequest {
    fn normalize(self) -> Self {
        Self {
            name: trimmed(self.name),
            email: trimmed(self.email).to_lowercase(),
            password: self.password,
        }
    }
}

/// The request payload for user login.
#[derive(Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[garde(custom(email_address))]
    pub email: String,
    #[garde(custom(at_least(1, "Password is required")))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(self) -> Self {
        Self {
            email: trimmed(self.email).to_lowercase(),
            password: self.password,
        }
    }
}
