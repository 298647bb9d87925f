pub mod assembler;
pub mod closure;
pub mod linker;
pub mod order;

pub use crate::domain::graph::{GraphBuilder, ModuleGraph};
pub use crate::domain::model::{Module, ModuleId, ModuleKind, Package, PackageId, PackageSet, Product};
pub use crate::domain::ports::ModuleExtractor;
pub use crate::utils::error::Result;
