use super::AGENT_ID_PARAM;
use crate::transport::{HttpMethod, RemoteCall};
use crate::types::FileUpload;
use serde_json::{Map, Value};

/// `POST files`: have the service fetch and host media from a public URL.
/// The agent id travels in the body for this method.
pub fn create_file_call(upload: &FileUpload, agent_id: Option<&str>) -> RemoteCall {
    let mut body = Map::new();
    body.insert("fileUrl".into(), Value::from(upload.file_url.clone()));
    if let Some(thumb) = &upload.thumbnail_url {
        body.insert("thumbnailUrl".into(), Value::from(thumb.clone()));
    }
    if let Some(desc) = &upload.content_description {
        body.insert("contentDescription".into(), Value::from(desc.clone()));
    }
    if let Some(agent) = agent_id {
        body.insert(AGENT_ID_PARAM.into(), Value::from(agent));
    }
    RemoteCall::new("files.create", HttpMethod::Post, "files").with_body(Value::Object(body))
}
