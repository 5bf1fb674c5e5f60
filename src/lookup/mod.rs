//! Lookup core: classify a release, fetch once, parse, merge, format.
//!
//! - [`classify`] maps release tokens to a distribution family
//! - [`backend`] names each upstream and builds its URLs
//! - [`formats`] holds one adapter per upstream payload
//! - [`aggregate`] and [`relations`] merge records and group alternatives
//! - [`render`] produces the one-line summary
//! - [`pipeline::LookupPipeline`] ties them together

pub mod aggregate;
pub mod backend;
pub mod classify;
pub mod formats;
pub mod pipeline;
pub mod relations;
pub mod render;

pub use aggregate::{aggregate, DedupKey, KeyStrategy};
pub use backend::{Backend, MadisonTable};
pub use classify::{classify, distro_from_name, Distro};
pub use pipeline::{LookupPipeline, LookupResult, LookupStats};
pub use relations::{group_relations, RelationEntry};
