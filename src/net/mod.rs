//! Networking: REST clients, the HTTP gateway and its error taxonomy.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` holds the typed endpoint clients, `gateway` wraps every request
//! with auth headers, timeout and retry, `interceptor` reacts to rejected
//! credentials, and `types` defines the wire schema.

pub mod api;
pub mod error;
pub mod gateway;
pub mod interceptor;
pub mod retry;
pub mod transport;
pub mod types;
