//! Blog client: list screens that fetch, mutate and re-fetch against a REST
//! blogging API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
