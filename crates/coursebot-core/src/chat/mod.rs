//! Chat orchestration: session start, conversational turns, and reset.

pub mod service;
