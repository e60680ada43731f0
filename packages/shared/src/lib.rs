//! Shared utilities for the Tertulia chat relay.

pub mod logger;
pub mod time;
