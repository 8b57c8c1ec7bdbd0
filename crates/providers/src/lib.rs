//! Completion backend implementations for Roundtable.
//!
//! All backends implement the `roundtable_core::CompletionBackend` trait.
//! The binary constructs the configured backend once at startup and shares
//! it across agents.

pub mod azure;

pub use azure::AzureChatBackend;
