//! The clone workflow: lookup, clone, optional two-factor enablement.
//!
//! Control flows strictly forward. The only outcome recovered locally is the
//! source id missing from the listing; authentication and clone errors
//! propagate to `main` untouched. The clone call mutates remote state and is
//! not rolled back if the two-factor step fails afterwards.

use anyhow::Result;

use crate::config::RunConfig;
use crate::portal::VcoPortal;
use crate::schema::{
    property_update_succeeded, CloneResult, CloneableEnterprise, EnterpriseProperty,
};

/// Outcome of a full run.
#[derive(Debug)]
pub enum RunOutcome {
    /// The requested source id was not in the cloneable listing; nothing was
    /// created on the orchestrator.
    SourceNotFound { enterprise_id: i64 },
    /// A new enterprise exists, whatever happened to the follow-up step.
    Cloned {
        result: CloneResult,
        two_factor: TwoFactorOutcome,
    },
}

/// What happened to the best-effort two-factor step.
#[derive(Debug)]
pub enum TwoFactorOutcome {
    /// The run did not ask for it.
    NotRequested,
    /// Requested, but the clone result carried no id to target.
    SkippedNoId,
    Enabled {
        enterprise_id: i64,
    },
    /// The property update did not take; the clone itself still stands.
    Failed {
        enterprise_id: i64,
        detail: String,
    },
}

/// Find the first cloneable enterprise whose id matches `enterprise_id`.
/// First match in listing order wins; the listing is left untouched.
pub fn find_cloneable_source(
    listing: &[CloneableEnterprise],
    enterprise_id: i64,
) -> Option<&CloneableEnterprise> {
    listing
        .iter()
        .find(|enterprise| enterprise.id == enterprise_id)
}

/// Run lookup, clone and the optional two-factor step against `portal`.
/// The caller must have authenticated the portal already.
pub fn run(portal: &mut dyn VcoPortal, config: &RunConfig) -> Result<RunOutcome> {
    let listing = portal.get_cloneable_enterprises()?;
    let Some(source) = find_cloneable_source(&listing, config.enterprise_id_to_clone) else {
        return Ok(RunOutcome::SourceNotFound {
            enterprise_id: config.enterprise_id_to_clone,
        });
    };
    println!(
        "Found cloneable enterprise \"{}\" with id {}, starting to clone",
        source.name, source.id
    );
    tracing::info!(source_id = source.id, name = %source.name, "matched cloneable enterprise");

    let request = config.new_enterprise.with_source(source);
    let result = portal.clone_enterprise(&request)?;
    println!("New enterprise created with details: {}", result.to_pretty());

    let two_factor = match (config.enable_two_factor_authentication, result.id) {
        (false, _) => TwoFactorOutcome::NotRequested,
        (true, None) => {
            tracing::warn!("clone result carries no id, skipping two-factor step");
            TwoFactorOutcome::SkippedNoId
        }
        (true, Some(new_id)) => enable_two_factor(portal, new_id),
    };
    Ok(RunOutcome::Cloned { result, two_factor })
}

/// Flip the two-factor property on the freshly created enterprise. Errors and
/// wrong row counts are folded into the outcome instead of propagated: the
/// primary objective was already met by the clone.
fn enable_two_factor(portal: &mut dyn VcoPortal, enterprise_id: i64) -> TwoFactorOutcome {
    println!("Enabling Two Factor Authentication for enterpriseId {enterprise_id}");
    let property = EnterpriseProperty::two_factor(enterprise_id, true);
    let detail = match portal.insert_or_update_enterprise_property(&property) {
        Ok(response) if property_update_succeeded(&response) => {
            return TwoFactorOutcome::Enabled { enterprise_id };
        }
        Ok(response) => response.to_string(),
        Err(error) => format!("{error:#}"),
    };
    tracing::warn!(enterprise_id, %detail, "two-factor property update failed");
    TwoFactorOutcome::Failed {
        enterprise_id,
        detail,
    }
}
