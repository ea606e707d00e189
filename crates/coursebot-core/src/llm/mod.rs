//! Completion gateway abstractions.
//!
//! - `CompletionGateway`: RPITIT trait implemented by concrete upstream clients
//! - `BoxCompletionGateway`: object-safe wrapper held in application state

pub mod box_gateway;
pub mod gateway;

#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;
