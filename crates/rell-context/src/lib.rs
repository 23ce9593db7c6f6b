//! Rell request context.
//!
//! Turns untrusted request parameters into a validated [`Context`], projects
//! it onto the URLs each display surface needs, and serializes it back into
//! request parameters so state can ride along on the next link or form.
//!
//! Everything here is synchronous and free of I/O.

pub mod context;
pub mod env;
pub mod error;
pub mod parser;
pub mod urls;
mod values;

pub use context::{Context, Scheme, Version, ViewMode};
pub use env::{Env, env_options};
pub use error::ContextError;
pub use parser::{
    BooleanRules, ContextParser, FalsyLiterals, ParserConfig, Resolution,
    default_context, from_values,
};
pub use urls::EnvLink;
