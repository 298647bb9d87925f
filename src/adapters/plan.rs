//! Serializable build plan and its renderings.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use crate::core::assembler::Assembly;
use crate::domain::model::{ModuleId, ModuleKind, PackageSet, ProductKind};
use crate::utils::error::{AssemblyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PlanFormat {
    Json,
    Csv,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    pub modules: Vec<PlannedModule>,
    pub external_modules: Vec<String>,
    pub products: Vec<PlannedProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedModule {
    pub name: String,
    pub kind: ModuleKind,
    pub package: String,
    pub source_root: String,
    pub external: bool,
    /// Direct dependencies after linking, repeats removed.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedProduct {
    pub name: String,
    pub kind: ProductKind,
    pub modules: Vec<String>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    kind: &'a str,
    package: &'a str,
    source_root: &'a str,
    external: bool,
    dependencies: String,
}

impl BuildPlan {
    pub fn from_assembly(assembly: &Assembly, packages: &PackageSet) -> Self {
        let external: HashSet<ModuleId> = assembly.external_modules.iter().copied().collect();
        let graph = &assembly.graph;

        let modules = assembly
            .modules
            .iter()
            .map(|id| {
                let module = graph.module(*id);
                let mut seen = HashSet::new();
                let dependencies = graph
                    .dependencies(*id)
                    .iter()
                    .map(|dep| graph.module(*dep).name.clone())
                    .filter(|name| seen.insert(name.clone()))
                    .collect();

                PlannedModule {
                    name: module.name.clone(),
                    kind: module.kind,
                    package: packages.name(module.package).to_string(),
                    source_root: module.source_root.to_string_lossy().into_owned(),
                    external: external.contains(id),
                    dependencies,
                }
            })
            .collect();

        let products = assembly
            .products
            .iter()
            .map(|product| PlannedProduct {
                name: product.name.clone(),
                kind: product.kind,
                modules: graph
                    .names(&product.modules)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect();

        Self {
            modules,
            external_modules: assembly
                .external_module_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            products,
        }
    }

    /// Narrows the plan to what building the external packages alone needs.
    pub fn externals_only(mut self) -> Self {
        self.modules.retain(|m| m.external);
        let kept: HashSet<&str> = self.modules.iter().map(|m| m.name.as_str()).collect();
        self.products
            .retain(|p| p.modules.iter().all(|m| kept.contains(m.as_str())));
        self
    }

    pub fn render(&self, format: PlanFormat) -> Result<String> {
        match format {
            PlanFormat::Json => Ok(serde_json::to_string_pretty(self)? + "\n"),
            PlanFormat::Csv => self.render_csv(),
            PlanFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for module in &self.modules {
            writer.serialize(CsvRow {
                name: &module.name,
                kind: module.kind.as_str(),
                package: &module.package,
                source_root: &module.source_root,
                external: module.external,
                dependencies: module.dependencies.join(";"),
            })?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AssemblyError::IoError(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "modules ({}):", self.modules.len());
        for module in &self.modules {
            let _ = write!(out, "  {} [{}] ({})", module.name, module.kind, module.package);
            if !module.dependencies.is_empty() {
                let _ = write!(out, " -> {}", module.dependencies.join(", "));
            }
            out.push('\n');
        }

        let _ = writeln!(out, "external modules ({}):", self.external_modules.len());
        for name in &self.external_modules {
            let _ = writeln!(out, "  {}", name);
        }

        let _ = writeln!(out, "products ({}):", self.products.len());
        for product in &self.products {
            let _ = writeln!(
                out,
                "  {} [{}]: {}",
                product.name,
                product.kind.as_str(),
                product.modules.join(", ")
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::GraphBuilder;
    use crate::domain::model::{ModuleSpec, Product};

    fn sample() -> (Assembly, PackageSet) {
        let mut packages = PackageSet::new();
        let dep = packages.add("dep", &[]).unwrap();
        let app = packages.add("app", &[dep]).unwrap();

        let mut builder = GraphBuilder::new();
        let lib = builder.add_module(
            dep,
            ModuleSpec::new("DepLib", ModuleKind::Library, "dep/Sources/DepLib"),
        );
        let main = builder.add_module(
            app,
            ModuleSpec::new("App", ModuleKind::Executable, "app/Sources/App"),
        );
        builder.prepend_dependencies(main, &[lib, lib]);

        let assembly = Assembly {
            graph: builder.freeze(),
            modules: vec![lib, main],
            external_modules: vec![lib],
            products: vec![Product {
                name: "App".to_string(),
                kind: ProductKind::Executable,
                modules: vec![main],
            }],
        };
        (assembly, packages)
    }

    #[test]
    fn test_plan_collapses_repeated_edges() {
        let (assembly, packages) = sample();
        let plan = BuildPlan::from_assembly(&assembly, &packages);

        assert_eq!(plan.modules.len(), 2);
        assert_eq!(plan.modules[1].dependencies, vec!["DepLib"]);
        assert!(plan.modules[0].external);
        assert!(!plan.modules[1].external);
        assert_eq!(plan.external_modules, vec!["DepLib"]);
    }

    #[test]
    fn test_json_rendering() {
        let (assembly, packages) = sample();
        let json = BuildPlan::from_assembly(&assembly, &packages)
            .render(PlanFormat::Json)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["modules"][1]["kind"], "executable");
        assert_eq!(value["products"][0]["modules"][0], "App");
    }

    #[test]
    fn test_csv_rendering() {
        let (assembly, packages) = sample();
        let csv = BuildPlan::from_assembly(&assembly, &packages)
            .render(PlanFormat::Csv)
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "name,kind,package,source_root,external,dependencies");
        assert_eq!(lines[1], "DepLib,library,dep,dep/Sources/DepLib,true,");
        assert_eq!(lines[2], "App,executable,app,app/Sources/App,false,DepLib");
    }

    #[test]
    fn test_text_rendering() {
        let (assembly, packages) = sample();
        let text = BuildPlan::from_assembly(&assembly, &packages)
            .render(PlanFormat::Text)
            .unwrap();

        assert!(text.starts_with("modules (2):\n"));
        assert!(text.contains("  App [executable] (app) -> DepLib\n"));
        assert!(text.contains("products (1):\n  App [executable]: App\n"));
    }

    #[test]
    fn test_externals_only_drops_root_modules_and_products() {
        let (assembly, packages) = sample();
        let plan = BuildPlan::from_assembly(&assembly, &packages).externals_only();

        assert_eq!(plan.modules.len(), 1);
        assert_eq!(plan.modules[0].name, "DepLib");
        assert!(plan.products.is_empty());
    }
}
