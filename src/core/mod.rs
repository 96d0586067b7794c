//! Core functionality for discovery, cycle detection and analysis

pub mod analyzer;
pub mod cycles;
pub mod discovery;
pub mod impact;
pub mod parallel;
pub mod paths;
pub mod suggestions;

pub use analyzer::Analyzer;
pub use cycles::find_cycles;
pub use discovery::{Discovery, FileDiscovery};
pub use parallel::ProgressUpdate;
pub use paths::find_paths;
