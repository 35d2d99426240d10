//! The client facade.
//!
//! [`RbmClient`] is the single entry point: initialize it once with
//! credentials, then call operations. Every operation checks the session
//! gate first and fails with [`Error::NotInitialized`](crate::Error::NotInitialized)
//! before any network interaction when the client was never initialized.

pub mod builder;
pub mod core;
mod gate;

pub use builder::RbmClientBuilder;
pub use core::{Dispatch, RbmClient};
