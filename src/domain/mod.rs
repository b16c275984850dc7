//! Domain rules that hold regardless of transport.

pub mod attachments;
pub mod validation;
