//! HTTP handlers for the Gemini proxy.

pub mod generate;
pub mod health;
