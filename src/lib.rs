//! Storage-triggered media conversion with a chat bot front end.
//!
//! Uploads land in the input bucket (directly or through the bot), a storage
//! notification drives the conversion into the output bucket, and a second
//! notification on the output bucket sends the requester a link.

pub mod app;
pub mod common;
pub mod config;
pub mod docs;
pub mod infrastructure;
pub mod middleware;
pub mod modules;
pub mod routes;
pub mod state;
