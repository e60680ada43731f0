//! Infrastructure layer: wire formats and adapters for the domain seams.

pub mod assistant;
pub mod dto;
pub mod message_pusher;
