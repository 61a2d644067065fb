//! Blocking VCO portal client.
//!
//! Login is a form POST that hands back a session cookie; every API call
//! afterwards is JSON-RPC against `/portal/`. The agent's cookie store
//! carries the session, so authentication mutates client state once and all
//! later calls just read it. Retries, if any, belong here or below - the
//! workflow layer never retries.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use ureq::http::header::SET_COOKIE;
use ureq::Agent;

use crate::schema::{CloneRequest, CloneResult, CloneableEnterprise, EnterpriseProperty};

const CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// The three portal operations the clone workflow consumes. Tests substitute
/// a scripted implementation so the workflow runs without a network.
pub trait VcoPortal {
    /// `enterpriseProxy/getEnterpriseProxyCloneableEnterprises`
    fn get_cloneable_enterprises(&mut self) -> Result<Vec<CloneableEnterprise>>;

    /// `enterprise/cloneEnterpriseV2` - the single remote mutation in the
    /// workflow, and not idempotent: every call creates a distinct tenant.
    fn clone_enterprise(&mut self, request: &CloneRequest) -> Result<CloneResult>;

    /// `enterprise/insertOrUpdateEnterpriseProperty`
    fn insert_or_update_enterprise_property(
        &mut self,
        property: &EnterpriseProperty,
    ) -> Result<Value>;
}

#[derive(Serialize)]
struct RpcEnvelope<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: &'a P,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

pub struct VcoClient {
    agent: Agent,
    base: String,
    next_id: u32,
}

impl VcoClient {
    pub fn new(hostname: &str) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(CALL_TIMEOUT))
            .build();
        Self {
            agent: Agent::from(config),
            base: format!("https://{hostname}"),
            next_id: 1,
        }
    }

    /// Log in as an enterprise user. The portal answers a successful login
    /// with a `velocloud.session` cookie and a rejected one with a
    /// `velocloud.message` cookie, so the outcome is read off `Set-Cookie`
    /// rather than the response body. Redirects stay unfollowed here to keep
    /// those headers visible; the agent stores the cookie either way.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/login/enterpriseLogin", self.base);
        let response = self
            .agent
            .post(&url)
            .config()
            .max_redirects(0)
            .max_redirects_will_error(false)
            .build()
            .send_form([("username", username), ("password", password)])
            .with_context(|| format!("reach {url}"))?;

        let cookies: Vec<&str> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if cookies
            .iter()
            .any(|cookie| cookie.starts_with("velocloud.message="))
        {
            return Err(anyhow!("VCO rejected credentials for {username}"));
        }
        if !cookies
            .iter()
            .any(|cookie| cookie.starts_with("velocloud.session="))
        {
            return Err(anyhow!(
                "VCO login did not establish a session (no velocloud.session cookie)"
            ));
        }
        tracing::info!(username, host = %self.base, "authenticated");
        Ok(())
    }

    fn call<P, T>(&mut self, method: &str, params: &P) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_id;
        self.next_id += 1;
        let envelope = RpcEnvelope {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        let url = format!("{}/portal/", self.base);
        tracing::debug!(method, id, "portal call");

        let mut response = self
            .agent
            .post(&url)
            .send_json(&envelope)
            .with_context(|| format!("call {method}"))?;
        let rpc: RpcResponse = response
            .body_mut()
            .read_json()
            .with_context(|| format!("decode {method} response"))?;

        if let Some(error) = rpc.error {
            return Err(anyhow!(
                "portal error {} on {method}: {}",
                error.code,
                error.message
            ));
        }
        let result = rpc
            .result
            .ok_or_else(|| anyhow!("portal response for {method} has neither result nor error"))?;
        serde_json::from_value(result).with_context(|| format!("decode {method} result"))
    }
}

impl VcoPortal for VcoClient {
    fn get_cloneable_enterprises(&mut self) -> Result<Vec<CloneableEnterprise>> {
        self.call(
            "enterpriseProxy/getEnterpriseProxyCloneableEnterprises",
            &serde_json::json!({}),
        )
    }

    fn clone_enterprise(&mut self, request: &CloneRequest) -> Result<CloneResult> {
        self.call("enterprise/cloneEnterpriseV2", request)
    }

    fn insert_or_update_enterprise_property(
        &mut self,
        property: &EnterpriseProperty,
    ) -> Result<Value> {
        self.call("enterprise/insertOrUpdateEnterpriseProperty", property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rpc_envelope_serializes_to_portal_shape() {
        let params = json!({ "enterpriseId": 7 });
        let envelope = RpcEnvelope {
            jsonrpc: "2.0",
            id: 3,
            method: "enterprise/cloneEnterpriseV2",
            params: &params,
        };
        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "enterprise/cloneEnterpriseV2",
                "params": { "enterpriseId": 7 }
            })
        );
    }

    #[test]
    fn rpc_response_parses_result_or_error() {
        let ok: RpcResponse =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": { "rows": 1 } }))
                .expect("parse result response");
        assert_eq!(ok.result, Some(json!({ "rows": 1 })));
        assert!(ok.error.is_none());

        let err: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": { "code": -32603, "message": "internal error" }
        }))
        .expect("parse error response");
        assert!(err.result.is_none());
        let error = err.error.expect("error payload");
        assert_eq!(error.code, -32603);
        assert_eq!(error.message, "internal error");
    }
}
