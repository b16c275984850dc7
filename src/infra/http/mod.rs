//! HTTP adapter for the blogging API.

mod api;
mod client;

pub use api::HttpApi;
pub use client::ApiClient;
