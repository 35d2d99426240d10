use super::AGENT_ID_PARAM;
use crate::transport::{HttpMethod, RemoteCall};
use crate::types::Msisdn;

/// `DELETE phones/<n>/agentMessages/<message_id>`
pub fn revoke_message_call(msisdn: &Msisdn, message_id: &str, agent_id: Option<&str>) -> RemoteCall {
    RemoteCall::new(
        "phones.agentMessages.delete",
        HttpMethod::Delete,
        msisdn.agent_message_path(message_id),
    )
    .with_optional_query(AGENT_ID_PARAM, agent_id)
}
