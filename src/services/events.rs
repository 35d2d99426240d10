use super::AGENT_ID_PARAM;
use crate::transport::{HttpMethod, RemoteCall};
use crate::types::Msisdn;

/// `POST phones/<n>/agentEvents?eventId=<id>`; `body` is a serialized
/// [`AgentEvent`](crate::payload::AgentEvent).
pub fn create_event_call(
    msisdn: &Msisdn,
    event_id: &str,
    agent_id: Option<&str>,
    body: serde_json::Value,
) -> RemoteCall {
    RemoteCall::new(
        "phones.agentEvents.create",
        HttpMethod::Post,
        msisdn.agent_events_path(),
    )
    .with_query("eventId", event_id)
    .with_optional_query(AGENT_ID_PARAM, agent_id)
    .with_body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::build_event;
    use crate::types::EventIntent;
    use serde_json::json;

    #[test]
    fn read_event_addressing() {
        let body = serde_json::to_value(build_event(&EventIntent::read("m-7"))).unwrap();
        let call = create_event_call(&Msisdn::new("+1"), "e-1", None, body);
        assert_eq!(call.path, "phones/+1/agentEvents");
        assert_eq!(call.query_param("eventId"), Some("e-1"));
        assert_eq!(
            call.body,
            Some(json!({"eventType": "READ", "messageId": "m-7"}))
        );
    }
}
