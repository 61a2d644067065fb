//! Run configuration: compiled-in parameters plus environment credentials.

use anyhow::{Context, Result};
use std::env;

use crate::schema::CloneRequestTemplate;

pub const USERNAME_VAR: &str = "VC_USERNAME";
pub const PASSWORD_VAR: &str = "VC_PASSWORD";

/// VCO login credentials. Read from the environment at startup so a missing
/// variable fails before any network traffic; consumed by authentication and
/// never held past it.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        let username = env::var(USERNAME_VAR).with_context(|| format!("read {USERNAME_VAR}"))?;
        let password = env::var(PASSWORD_VAR).with_context(|| format!("read {PASSWORD_VAR}"))?;
        Ok(Self { username, password })
    }
}

/// Everything one run needs besides credentials. Built from the parameters
/// block in `main.rs`; tests construct it directly with fakes.
pub struct RunConfig {
    pub hostname: String,
    pub enterprise_id_to_clone: i64,
    pub enable_two_factor_authentication: bool,
    pub new_enterprise: CloneRequestTemplate,
}
