use std::collections::HashMap;

use crate::core::closure::closure;
use crate::core::linker::link;
use crate::domain::graph::{GraphBuilder, ModuleGraph};
use crate::domain::model::{Module, ModuleId, PackageId, PackageSet, Product};
use crate::domain::ports::ModuleExtractor;
use crate::utils::error::{AssemblyError, Result};

/// Result of one assembly pass.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub graph: ModuleGraph,
    /// Closure over the modules of every package, root included.
    pub modules: Vec<ModuleId>,
    /// Closure over the modules of the external packages only.
    pub external_modules: Vec<ModuleId>,
    pub products: Vec<Product>,
}

impl Assembly {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.external_modules.is_empty() && self.products.is_empty()
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        self.graph.module(id)
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.graph.names(&self.modules)
    }

    pub fn external_module_names(&self) -> Vec<&str> {
        self.graph.names(&self.external_modules)
    }

    pub fn product_names(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.name.as_str()).collect()
    }
}

pub struct Assembler<E: ModuleExtractor> {
    extractor: E,
}

impl<E: ModuleExtractor> Assembler<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Extracts, links and closes the module graph of `root` and its
    /// resolved `externals`.
    ///
    /// A root without sources is only a warning. When the root is also the
    /// only package the pass stops there and returns an empty assembly.
    pub fn assemble(
        &self,
        packages: &PackageSet,
        root: PackageId,
        externals: &[PackageId],
    ) -> Result<Assembly> {
        tracing::info!(
            "Assembling '{}' with {} external packages",
            packages.name(root),
            externals.len()
        );

        // externals first, root last; the closures below depend on this order
        let build_order: Vec<PackageId> = externals
            .iter()
            .copied()
            .chain(std::iter::once(root))
            .collect();

        let mut graph = GraphBuilder::new();
        let mut owned: HashMap<PackageId, Vec<ModuleId>> = HashMap::new();
        let mut products = Vec::new();

        // Extract
        for &package in &build_order {
            let mut modules = if package == root {
                match self.root_modules(packages, root, &mut graph)? {
                    Some(modules) => modules,
                    None if build_order.len() == 1 => return Ok(Assembly::empty()),
                    None => Vec::new(),
                }
            } else {
                self.extractor.modules(packages, package, &mut graph)?
            };

            if package == root {
                let tests = self
                    .extractor
                    .test_modules(packages, package, &modules, &mut graph)?;
                modules.extend(tests);
            }

            products.extend(
                self.extractor
                    .products(packages, package, &modules, &graph)?,
            );
            tracing::debug!(
                "Extracted {} modules from '{}'",
                modules.len(),
                packages.name(package)
            );
            owned.insert(package, modules);
        }

        // Link
        let report = link(packages, &owned, &build_order, &mut graph)?;
        tracing::debug!(
            "Linked {} packages, {} cross-package edges",
            report.packages_linked,
            report.edges_added
        );
        let graph = graph.freeze();

        // Close
        let all_start = flatten(&owned, &build_order);
        let external_start = flatten(&owned, externals);
        let modules = closure(&graph, &all_start)?;
        let external_modules = closure(&graph, &external_start)?;

        tracing::info!(
            "Assembled {} modules ({} external), {} products",
            modules.len(),
            external_modules.len(),
            products.len()
        );

        Ok(Assembly {
            graph,
            modules,
            external_modules,
            products,
        })
    }

    /// `None` when the root has no sources.
    fn root_modules(
        &self,
        packages: &PackageSet,
        root: PackageId,
        graph: &mut GraphBuilder,
    ) -> Result<Option<Vec<ModuleId>>> {
        match self.extractor.modules(packages, root, graph) {
            Ok(modules) if !modules.is_empty() => Ok(Some(modules)),
            Ok(_) | Err(AssemblyError::NoModules { .. }) => {
                tracing::warn!(
                    "root package '{}' does not contain any sources",
                    packages.name(root)
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn flatten(owned: &HashMap<PackageId, Vec<ModuleId>>, order: &[PackageId]) -> Vec<ModuleId> {
    order
        .iter()
        .filter_map(|package| owned.get(package))
        .flatten()
        .copied()
        .collect()
}
