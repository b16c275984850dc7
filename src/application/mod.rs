//! Application services layer: API seams, session, forms and screens.

pub mod api;
pub mod auth;
pub mod error;
pub mod forms;
pub mod gate;
pub mod listing;
pub mod pagination;
pub mod screens;
pub mod session;
