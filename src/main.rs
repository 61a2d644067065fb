//! Clone a VCO enterprise and optionally enable two-factor authentication.
//!
//! One-shot operator tool: edit the parameters block below, export
//! `VC_USERNAME` and `VC_PASSWORD`, and run `vco-clone`. There are no CLI
//! flags. The clone call is not transactional from this side - if a later
//! step fails, the new enterprise may already exist on the orchestrator and
//! is not rolled back. Re-running creates another, distinct enterprise.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod portal;
mod schema;
mod workflow;

use config::{Credentials, RunConfig};
use portal::VcoClient;
use schema::{AdminUser, CloneRequestTemplate};
use workflow::{RunOutcome, TwoFactorOutcome};

// ---- parameters -----------------------------------------------------------
// Edit these before running. Only the admin user, the new enterprise name
// and the license ids are free-form; the copied configuration fields are
// filled from the source enterprise at runtime.

const HOSTNAME: &str = "vco.hostname.net";
const ENTERPRISE_ID_TO_BE_CLONED: i64 = 0;
const ENABLE_TWO_FACTOR_AUTHENTICATION: bool = false;

fn new_enterprise_details() -> CloneRequestTemplate {
    CloneRequestTemplate {
        user: AdminUser {
            username: "user1@email.com".to_string(),
            email: "user1@email.com".to_string(),
            password: "Pa$sw0rd!".to_string(),
            password2: "Pa$sw0rd!".to_string(),
            mobile_phone: "123412341234".to_string(),
        },
        name: "Enterprise Name 2".to_string(),
        license_ids: Vec::new(),
    }
}

// ---- end of parameters ----------------------------------------------------

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Credentials are resolved before the first network call so a missing
    // variable fails fast.
    let credentials = Credentials::from_env()?;
    let run_config = RunConfig {
        hostname: HOSTNAME.to_string(),
        enterprise_id_to_clone: ENTERPRISE_ID_TO_BE_CLONED,
        enable_two_factor_authentication: ENABLE_TWO_FACTOR_AUTHENTICATION,
        new_enterprise: new_enterprise_details(),
    };

    let mut client = VcoClient::new(&run_config.hostname);
    client.authenticate(&credentials.username, &credentials.password)?;

    match workflow::run(&mut client, &run_config)? {
        RunOutcome::SourceNotFound { enterprise_id } => {
            eprintln!("Did not find cloneable enterprise with id {enterprise_id}");
            std::process::exit(1);
        }
        RunOutcome::Cloned { result, two_factor } => {
            report_two_factor(&two_factor);
            tracing::info!(new_id = ?result.id, "run complete");
            Ok(())
        }
    }
}

fn report_two_factor(outcome: &TwoFactorOutcome) {
    match outcome {
        TwoFactorOutcome::NotRequested => {}
        TwoFactorOutcome::SkippedNoId => {
            println!("Clone result carried no enterprise id; two factor authentication was not enabled");
        }
        TwoFactorOutcome::Enabled { enterprise_id } => {
            println!("Two factor authentication enabled for enterpriseId {enterprise_id}");
        }
        TwoFactorOutcome::Failed {
            enterprise_id,
            detail,
        } => {
            println!(
                "Something went wrong when enabling 2FA for enterpriseId {enterprise_id}. VCO returned {detail}"
            );
        }
    }
}
