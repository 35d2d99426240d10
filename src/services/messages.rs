use super::AGENT_ID_PARAM;
use crate::transport::{HttpMethod, RemoteCall};
use crate::types::Msisdn;

/// `POST phones/<n>/agentMessages?messageId=<id>`; the id rides in the query,
/// never in the body. `body` is a serialized [`AgentMessage`](crate::payload::AgentMessage).
pub fn create_message_call(
    msisdn: &Msisdn,
    message_id: &str,
    agent_id: Option<&str>,
    body: serde_json::Value,
) -> RemoteCall {
    RemoteCall::new(
        "phones.agentMessages.create",
        HttpMethod::Post,
        msisdn.agent_messages_path(),
    )
    .with_query("messageId", message_id)
    .with_optional_query(AGENT_ID_PARAM, agent_id)
    .with_body(body)
}
