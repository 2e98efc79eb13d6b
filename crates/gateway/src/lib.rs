//! HTTP gateway wiring the WhatsApp webhook to the reply pipeline.

pub mod pipeline;
pub mod server;

pub use server::{AppState, build_app, serve};
