//! Outbound adapters implementing the domain ports.
//!
//! - **rpc**: reqwest client for the remote post procedures
//! - **memory**: process-local post store for demo mode and tests
//! - **session**: watch-channel session provider
//!
//! Adapters translate between domain types and their transport. They hold
//! no page logic.

pub mod memory;
pub mod rpc;
pub mod session;
