use super::AGENT_ID_PARAM;
use crate::transport::{HttpMethod, RemoteCall};
use crate::types::Msisdn;
use serde_json::json;

/// `POST phones/<n>/testers` with an empty body.
pub fn create_tester_call(msisdn: &Msisdn, agent_id: Option<&str>) -> RemoteCall {
    RemoteCall::new("phones.testers.create", HttpMethod::Post, msisdn.testers_path())
        .with_optional_query(AGENT_ID_PARAM, agent_id)
        .with_body(json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tester_invite_has_empty_body() {
        let call = create_tester_call(&Msisdn::new("+15551234567"), None);
        assert_eq!(call.method, HttpMethod::Post);
        assert_eq!(call.path, "phones/+15551234567/testers");
        assert_eq!(call.body, Some(json!({})));
        assert!(call.query.is_empty());
    }
}
