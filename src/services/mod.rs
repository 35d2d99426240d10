//! Request shapers: each function turns a recipient (and, where relevant, a
//! payload and a generated id) into the [`RemoteCall`](crate::transport::RemoteCall)
//! addressing for one API method. No I/O happens here.

pub mod capability;
pub mod events;
pub mod files;
pub mod messages;
pub mod revocation;
pub mod testers;

/// Query parameter (or body field, for file uploads) naming the acting agent.
pub const AGENT_ID_PARAM: &str = "agentId";

pub use capability::{batch_get_users_call, capability_call, MAX_BATCH_USERS};
pub use events::create_event_call;
pub use files::create_file_call;
pub use messages::create_message_call;
pub use revocation::revoke_message_call;
pub use testers::create_tester_call;
