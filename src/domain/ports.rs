use crate::domain::graph::GraphBuilder;
use crate::domain::model::{ModuleId, PackageId, PackageSet, Product};
use crate::utils::error::Result;

/// Source of a package's modules and products.
///
/// Implementations create modules in the shared [`GraphBuilder`] together
/// with the edges the modules declare themselves. Cross-package edges are
/// added later by the linker.
pub trait ModuleExtractor {
    /// Returns [`AssemblyError::NoModules`](crate::AssemblyError::NoModules)
    /// when the package has no sources.
    fn modules(
        &self,
        packages: &PackageSet,
        package: PackageId,
        graph: &mut GraphBuilder,
    ) -> Result<Vec<ModuleId>>;

    /// Only called for the root package.
    fn test_modules(
        &self,
        packages: &PackageSet,
        package: PackageId,
        modules: &[ModuleId],
        graph: &mut GraphBuilder,
    ) -> Result<Vec<ModuleId>>;

    fn products(
        &self,
        packages: &PackageSet,
        package: PackageId,
        modules: &[ModuleId],
        graph: &GraphBuilder,
    ) -> Result<Vec<Product>>;
}
