use std::collections::HashMap;

use crate::config::manifest::{ModuleConfig, PackageConfig, WorkspaceManifest};
use crate::domain::graph::GraphBuilder;
use crate::domain::model::{
    ModuleId, ModuleKind, ModuleSpec, PackageId, PackageSet, Product, ProductKind,
};
use crate::domain::ports::ModuleExtractor;
use crate::utils::error::{AssemblyError, Result};

/// Extractor that takes modules and products from a [`WorkspaceManifest`]
/// instead of scanning sources on disk.
#[derive(Debug, Clone)]
pub struct ManifestExtractor {
    manifest: WorkspaceManifest,
}

impl ManifestExtractor {
    pub fn new(manifest: WorkspaceManifest) -> Self {
        Self { manifest }
    }

    pub fn manifest(&self) -> &WorkspaceManifest {
        &self.manifest
    }

    fn package_config(&self, packages: &PackageSet, package: PackageId) -> Result<&PackageConfig> {
        let name = packages.name(package);
        self.manifest
            .package(name)
            .ok_or_else(|| AssemblyError::UnknownPackage {
                name: name.to_string(),
            })
    }

    /// Creates the selected modules and wires their declared dependencies.
    /// Names resolve against the new modules plus `visible`.
    fn create_modules<'a>(
        &self,
        packages: &PackageSet,
        package: PackageId,
        selected: impl Iterator<Item = &'a ModuleConfig>,
        visible: &[ModuleId],
        graph: &mut GraphBuilder,
    ) -> Result<Vec<ModuleId>> {
        let package_path = packages.get(package).path.clone();

        let mut by_name: HashMap<String, ModuleId> = visible
            .iter()
            .map(|id| (graph.module(*id).name.clone(), *id))
            .collect();
        let mut created = Vec::new();
        for config in selected {
            let spec = ModuleSpec::new(
                &config.name,
                config.module_kind()?,
                config.source_root(&package_path),
            );
            let id = graph.add_module(package, spec);
            by_name.insert(config.name.clone(), id);
            created.push((id, config));
        }

        for (id, config) in &created {
            for dependency in &config.dependencies {
                let target = by_name.get(dependency).copied().ok_or_else(|| {
                    AssemblyError::UnknownModuleDependency {
                        module: config.name.clone(),
                        dependency: dependency.clone(),
                    }
                })?;
                graph.add_dependency(*id, target);
            }
        }

        Ok(created.into_iter().map(|(id, _)| id).collect())
    }
}

impl ModuleExtractor for ManifestExtractor {
    fn modules(
        &self,
        packages: &PackageSet,
        package: PackageId,
        graph: &mut GraphBuilder,
    ) -> Result<Vec<ModuleId>> {
        let config = self.package_config(packages, package)?;
        if config.modules.iter().all(|m| m.kind == "test") {
            return Err(AssemblyError::NoModules {
                package: config.name.clone(),
            });
        }

        let selected = config.modules.iter().filter(|m| m.kind != "test");
        self.create_modules(packages, package, selected, &[], graph)
    }

    fn test_modules(
        &self,
        packages: &PackageSet,
        package: PackageId,
        modules: &[ModuleId],
        graph: &mut GraphBuilder,
    ) -> Result<Vec<ModuleId>> {
        let config = self.package_config(packages, package)?;
        let selected = config.modules.iter().filter(|m| m.kind == "test");
        self.create_modules(packages, package, selected, modules, graph)
    }

    fn products(
        &self,
        packages: &PackageSet,
        package: PackageId,
        modules: &[ModuleId],
        graph: &GraphBuilder,
    ) -> Result<Vec<Product>> {
        let config = self.package_config(packages, package)?;
        let by_name: HashMap<&str, ModuleId> = modules
            .iter()
            .map(|id| (graph.module(*id).name.as_str(), *id))
            .collect();

        let mut products = Vec::new();
        for declared in &config.products {
            let kind = declared.product_kind()?;
            let resolved: Option<Vec<ModuleId>> = declared
                .modules
                .iter()
                .map(|name| by_name.get(name.as_str()).copied())
                .collect();
            match resolved {
                Some(product_modules) => products.push(Product {
                    name: declared.name.clone(),
                    kind,
                    modules: product_modules,
                }),
                // test modules are only extracted for the root package
                None if kind == ProductKind::Test => continue,
                None => {
                    return Err(AssemblyError::InvalidConfigValueError {
                        field: "product.modules".to_string(),
                        value: declared.name.clone(),
                        reason: format!(
                            "Product refers to modules not provided by package '{}'",
                            config.name
                        ),
                    })
                }
            }
        }

        // every executable gets a product unless one is declared for it
        for id in modules {
            let module = graph.module(*id);
            if module.kind != ModuleKind::Executable {
                continue;
            }
            let covered = products
                .iter()
                .any(|p| p.kind == ProductKind::Executable && p.modules.contains(id));
            if !covered {
                products.push(Product {
                    name: module.name.clone(),
                    kind: ProductKind::Executable,
                    modules: vec![*id],
                });
            }
        }

        let tests: Vec<ModuleId> = modules
            .iter()
            .copied()
            .filter(|id| graph.module(*id).is_test())
            .collect();
        if !tests.is_empty() && !products.iter().any(|p| p.kind == ProductKind::Test) {
            products.push(Product {
                name: format!("{}Tests", config.name),
                kind: ProductKind::Test,
                modules: tests,
            });
        }

        Ok(products)
    }
}
