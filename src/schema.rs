//! Wire types for the portal operations the clone workflow consumes.
//!
//! Field names follow the VCO API (camelCase on the wire). The clone payload
//! is split in two: the operator-supplied [`CloneRequestTemplate`] and the
//! finalized [`CloneRequest`], which can only be produced by folding in the
//! configuration of a matched source enterprise. A payload with unset copied
//! fields therefore cannot reach the clone call.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The per-enterprise property key that switches two-factor authentication.
pub const TWO_FACTOR_PROPERTY: &str = "vco.enterprise.authentication.twoFactor.enable";

/// A tenant eligible to serve as a clone template, as returned by
/// `enterpriseProxy/getEnterpriseProxyCloneableEnterprises`. Read-only;
/// unknown backend fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneableEnterprise {
    pub id: i64,
    pub name: String,
    pub configuration_id: i64,
    pub enable_enterprise_delegation_to_operator: bool,
    pub enable_enterprise_delegation_to_proxy: bool,
    pub enable_enterprise_user_management_delegation_to_operator: bool,
    pub gateway_pool_id: i64,
    pub endpoint_pki_mode: String,
}

/// Admin account created alongside the new enterprise.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
    pub mobile_phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Licenses {
    pub ids: Vec<i64>,
}

/// Operator-supplied half of the clone payload: everything that is typed in
/// by hand rather than copied from the source enterprise.
#[derive(Debug, Clone)]
pub struct CloneRequestTemplate {
    pub user: AdminUser,
    pub name: String,
    pub license_ids: Vec<i64>,
}

impl CloneRequestTemplate {
    /// Finalize the payload by copying the template configuration from the
    /// matched source enterprise. Pure transformation; neither input is
    /// modified.
    pub fn with_source(&self, source: &CloneableEnterprise) -> CloneRequest {
        CloneRequest {
            user: self.user.clone(),
            configuration_id: source.configuration_id,
            enable_enterprise_delegation_to_operator: source
                .enable_enterprise_delegation_to_operator,
            enable_enterprise_delegation_to_proxy: source.enable_enterprise_delegation_to_proxy,
            enable_enterprise_user_management_delegation_to_operator: source
                .enable_enterprise_user_management_delegation_to_operator,
            licenses: Licenses {
                ids: self.license_ids.clone(),
            },
            gateway_pool_id: source.gateway_pool_id,
            endpoint_pki_mode: source.endpoint_pki_mode.clone(),
            id: source.id,
            name: self.name.clone(),
            with: Vec::new(),
        }
    }
}

/// Finalized payload for `enterprise/cloneEnterpriseV2`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    pub user: AdminUser,
    pub configuration_id: i64,
    pub enable_enterprise_delegation_to_operator: bool,
    pub enable_enterprise_delegation_to_proxy: bool,
    pub enable_enterprise_user_management_delegation_to_operator: bool,
    pub licenses: Licenses,
    pub gateway_pool_id: i64,
    pub endpoint_pki_mode: String,
    pub id: i64,
    pub name: String,
    pub with: Vec<Value>,
}

/// Response from `enterprise/cloneEnterpriseV2`. The backend shape is not
/// pinned down; only the new enterprise id matters to the workflow, the rest
/// is carried through for operator display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl CloneResult {
    pub fn to_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// Payload for `enterprise/insertOrUpdateEnterpriseProperty`.
#[derive(Debug, Clone, Serialize)]
pub struct EnterpriseProperty {
    pub name: String,
    pub value: String,
    #[serde(rename = "dataType")]
    pub data_type: String,
    #[serde(rename = "enterpriseId")]
    pub enterprise_id: i64,
}

impl EnterpriseProperty {
    /// The boolean two-factor switch for one enterprise. The portal expects
    /// the value string-encoded.
    pub fn two_factor(enterprise_id: i64, enabled: bool) -> Self {
        Self {
            name: TWO_FACTOR_PROPERTY.to_string(),
            value: if enabled { "true" } else { "false" }.to_string(),
            data_type: "BOOLEAN".to_string(),
            enterprise_id,
        }
    }
}

/// A property update counts as applied only when the portal reports exactly
/// one affected row. Zero rows or any other response shape is a soft failure.
pub fn property_update_succeeded(response: &Value) -> bool {
    *response == json!({ "rows": 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> CloneableEnterprise {
        CloneableEnterprise {
            id: 39,
            name: "Template Enterprise".to_string(),
            configuration_id: 7,
            enable_enterprise_delegation_to_operator: true,
            enable_enterprise_delegation_to_proxy: false,
            enable_enterprise_user_management_delegation_to_operator: false,
            gateway_pool_id: 3,
            endpoint_pki_mode: "Strict".to_string(),
        }
    }

    fn template() -> CloneRequestTemplate {
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

    #[test]
    fn with_source_copies_configuration_fields_verbatim() {
        let request = template().with_source(&source());
        let value = serde_json::to_value(&request).expect("serialize clone request");

        assert_eq!(value["configurationId"], json!(7));
        assert_eq!(value["gatewayPoolId"], json!(3));
        assert_eq!(value["endpointPkiMode"], json!("Strict"));
        assert_eq!(value["enableEnterpriseDelegationToOperator"], json!(true));
        assert_eq!(value["enableEnterpriseDelegationToProxy"], json!(false));
        assert_eq!(
            value["enableEnterpriseUserManagementDelegationToOperator"],
            json!(false)
        );
    }

    #[test]
    fn with_source_keeps_operator_supplied_fields() {
        let request = template().with_source(&source());
        let value = serde_json::to_value(&request).expect("serialize clone request");

        assert_eq!(value["id"], json!(39));
        assert_eq!(value["name"], json!("Enterprise Name 2"));
        assert_eq!(value["licenses"], json!({ "ids": [] }));
        assert_eq!(value["with"], json!([]));
        assert_eq!(value["user"]["mobilePhone"], json!("123412341234"));
        assert_eq!(value["user"]["password2"], json!("Pa$sw0rd!"));
    }

    #[test]
    fn cloneable_enterprise_parses_listing_entry_with_extra_fields() {
        let raw = json!({
            "id": 39,
            "name": "Template Enterprise",
            "configurationId": 7,
            "enableEnterpriseDelegationToOperator": true,
            "enableEnterpriseDelegationToProxy": false,
            "enableEnterpriseUserManagementDelegationToOperator": false,
            "gatewayPoolId": 3,
            "endpointPkiMode": "Strict",
            "created": "2020-01-01T00:00:00Z",
            "networkId": 12
        });
        let enterprise: CloneableEnterprise =
            serde_json::from_value(raw).expect("parse listing entry");
        assert_eq!(enterprise.id, 39);
        assert_eq!(enterprise.endpoint_pki_mode, "Strict");
    }

    #[test]
    fn clone_result_exposes_optional_id() {
        let with_id: CloneResult =
            serde_json::from_value(json!({ "id": 101, "name": "Clone" })).expect("parse result");
        assert_eq!(with_id.id, Some(101));
        assert!(with_id.to_pretty().contains("Clone"));

        let without_id: CloneResult =
            serde_json::from_value(json!({ "operation": "pending" })).expect("parse result");
        assert_eq!(without_id.id, None);
    }

    #[test]
    fn two_factor_property_uses_fixed_portal_constants() {
        let property = EnterpriseProperty::two_factor(101, true);
        let value = serde_json::to_value(&property).expect("serialize property");
        assert_eq!(
            value,
            json!({
                "name": "vco.enterprise.authentication.twoFactor.enable",
                "value": "true",
                "dataType": "BOOLEAN",
                "enterpriseId": 101
            })
        );
    }

    #[test]
    fn property_update_success_requires_exactly_one_row() {
        assert!(property_update_succeeded(&json!({ "rows": 1 })));

        assert!(!property_update_succeeded(&json!({ "rows": 0 })));
        assert!(!property_update_succeeded(&json!({ "rows": 2 })));
        assert!(!property_update_succeeded(&json!({ "rows": 1, "extra": true })));
        assert!(!property_update_succeeded(&json!({ "error": "denied" })));
        assert!(!property_update_succeeded(&json!(1)));
        assert!(!property_update_succeeded(&json!(null)));
    }
}
