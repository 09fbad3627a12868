//! Assistant Webhook - conversation fulfillment for the Google Assistant
//!
//! This crate answers one turn of an Assistant conversation per request. It
//! reads both the raw Actions SDK body and the Dialogflow fulfillment body,
//! in either schema generation, and writes back a reply in the matching
//! shape that either ends the conversation or asks a further question.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
