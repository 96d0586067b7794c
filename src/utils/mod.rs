//! Shared helpers

pub mod path_resolver;

pub use path_resolver::PathResolver;
