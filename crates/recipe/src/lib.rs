#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package descriptor for pkgrecipe
//!
//! A descriptor declares what a package is (identity, license, pinned
//! requirements, generators) and how its files are materialized:
//!
//! - `package` copies the owning library's deliverables into a
//!   redistributable package layout,
//! - `imports` copies a built dependency's artifacts into a local area,
//! - `export_sources` ships recipe-relative files alongside the recipe.
//!
//! Every phase is a synchronous, bounded walk driven by glob rules. Graph
//! construction, building and scheduling belong to the host.

mod context;
mod copy;
mod descriptor;
pub mod locate;
mod pattern;

pub use context::PhaseContext;
pub use copy::CopyReport;
pub use descriptor::{PackageDescriptor, PackageDescriptorBuilder};
pub use locate::{resolve_all, DependencyLocator, LocalCache};
pub use pattern::CompiledRule;
