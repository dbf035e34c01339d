//! Web front end: routes, handlers and HTML rendering.

pub mod render;
mod server;
pub mod templates;

pub use server::{WebServer, build_router, start_server};
