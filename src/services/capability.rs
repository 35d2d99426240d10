//! Capability checks and batched reachability lookups.

use super::AGENT_ID_PARAM;
use crate::transport::{HttpMethod, RemoteCall};
use crate::types::Msisdn;
use serde_json::json;
use tracing::warn;

/// Service-side limit on numbers per `users:batchGet` call. Not enforced
/// locally; larger batches are forwarded and rejected by the service.
pub const MAX_BATCH_USERS: usize = 10_000;

/// `GET phones/<n>/capabilities?requestId=<id>`
pub fn capability_call(msisdn: &Msisdn, request_id: &str, agent_id: Option<&str>) -> RemoteCall {
    RemoteCall::new(
        "phones.getCapabilities",
        HttpMethod::Get,
        msisdn.capabilities_path(),
    )
    .with_query("requestId", request_id)
    .with_optional_query(AGENT_ID_PARAM, agent_id)
}

/// `POST users:batchGet` with every number in a single request body.
pub fn batch_get_users_call(msisdns: &[Msisdn]) -> RemoteCall {
    if msisdns.len() > MAX_BATCH_USERS {
        warn!(
            count = msisdns.len(),
            limit = MAX_BATCH_USERS,
            "batch exceeds the service limit; forwarding unchanged"
        );
    }
    RemoteCall::new("users.batchGet", HttpMethod::Post, "users:batchGet")
        .with_body(json!({ "users": msisdns }))
}
