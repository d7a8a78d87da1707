//! Bundle content sources.
//!
//! Only the filesystem source (`fs` module) exists today, with a concrete
//! `load_dir()` API. A `BundleSource` trait may be introduced when a second
//! concrete source (e.g. zip archives) demands it — until then, the design
//! stays concrete to avoid speculative abstraction.

pub mod fs;
