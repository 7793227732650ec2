//! Assistant Relay - Streaming bridge to the OpenAI Assistants API
//!
//! This crate relays a chat message into an assistant thread, starts a run,
//! polls it to a terminal status and streams every step back to the caller
//! as newline-delimited JSON.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
