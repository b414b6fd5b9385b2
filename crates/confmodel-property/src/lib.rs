//! Confmodel Property Resolution
//!
//! Resolves `${key}` placeholders in configuration values against an ordered
//! chain of resolvers.
//!
//! # Core Concepts
//!
//! - [`PropertyResolver`]: Capability mapping a key to a value, or reporting absence
//! - [`CompoundResolver`]: First-hit-wins chain built with [`compact`]
//! - [`SystemResolver`] / [`TestResolver`]: The global defaults at the end of every chain
//! - [`expand`]: Placeholder substitution driven by a [`ResolverConfig`]
//!
//! # Example
//!
//! ```rust
//! use confmodel_property::{compact, expand, MapResolver, ResolverConfig, SharedResolver};
//! use std::sync::Arc;
//!
//! let inner: SharedResolver = Arc::new(MapResolver::new().with("x", "inner"));
//! let outer: SharedResolver = Arc::new(MapResolver::new().with("x", "outer").with("y", "outer"));
//!
//! // Nearest scope first
//! let chain = compact([inner, outer]);
//! let config = ResolverConfig::default();
//!
//! assert_eq!(expand("${x}/${y}", &*chain, &config), "inner/outer");
//! assert_eq!(expand("${z:fallback}", &*chain, &config), "fallback");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod compound;
mod config;
mod environment;
mod placeholder;
mod resolver;

pub use compound::{compact, CompoundResolver};
pub use config::ResolverConfig;
pub use environment::{system_and_test, SystemResolver, TestResolver};
pub use placeholder::expand;
pub use resolver::{same_resolver, MapResolver, PropertyResolver, SharedResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
