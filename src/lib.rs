pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::PlanOutput, CliConfig};

pub use adapters::manifest::ManifestExtractor;
pub use adapters::plan::{BuildPlan, PlanFormat};
pub use config::manifest::{Workspace, WorkspaceManifest};
pub use core::assembler::{Assembler, Assembly};
pub use domain::graph::{GraphBuilder, ModuleGraph};
pub use domain::model::{
    Module, ModuleId, ModuleKind, ModuleSpec, Package, PackageId, PackageSet, Product, ProductKind,
};
pub use domain::ports::ModuleExtractor;
pub use utils::error::{AssemblyError, Result};
