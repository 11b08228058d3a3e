//! Microbe
//!
//! A lightweight DOM wrapper: ordered collections of target elements with
//! node insertion primitives (append, prepend, insert-after, remove).
//!
//! # Example
//! ```rust,ignore
//! use microbe::{Config, Microbe};
//!
//! let mut doc = Config::default().document();
//! let body = Microbe::construct(&mut doc, "body")?;
//! body.append(&mut doc, "<ul class=\"items\"></ul>")?; // markup path
//! let lists = Microbe::construct(&mut doc, ".items")?;
//! lists.append(&mut doc, "<li>")?;
//! ```

mod config;
mod content;
mod error;
mod insertion;
mod microbe;

pub use config::Config;
pub use content::{Content, Nodes, Resolved};
pub use error::{MicrobeError, MicrobeResult};
pub use microbe::Microbe;

// Re-export the layers underneath for callers that need the raw tree
pub use microbe_dom as dom;
pub use microbe_html as html;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
