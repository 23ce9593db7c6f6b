//! Rell HTTP layer
//!
//! Hands each request's query or form parameters to the
//! [`ContextParser`](rell_context::ContextParser) and exposes the resolved
//! context, its serialization and its synthesized URLs as JSON. Page
//! rendering lives elsewhere; this is the seam it plugs into.

pub mod error;
pub mod server;
pub mod view;

pub use error::ServerError;
pub use server::{HttpServer, ServerConfig};
pub use view::ContextView;
