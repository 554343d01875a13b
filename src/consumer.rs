//! Consumer adapters that acquire a token before their primary action.
//!
//! Every adapter calls [`CsrfClient::token`](crate::client::CsrfClient::token), which ensures a
//! token and then re-reads the shared store, so no adapter ever caches a token value of its own.

pub mod form;
pub mod signer;
pub mod subscription;

pub use form::*;
pub use signer::*;
pub use subscription::*;
