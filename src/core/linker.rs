use std::collections::HashMap;

use crate::core::order::{dependency_order, TopologicalOrder};
use crate::domain::graph::GraphBuilder;
use crate::domain::model::{ModuleId, PackageId, PackageSet};
use crate::utils::error::{AssemblyError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub packages_linked: usize,
    pub edges_added: usize,
}

/// The subset of `modules` that dependent packages may see, in input order.
pub fn exposed_modules(graph: &GraphBuilder, modules: &[ModuleId]) -> Vec<ModuleId> {
    modules
        .iter()
        .copied()
        .filter(|id| {
            let module = graph.module(*id);
            !module.is_test() && module.kind.is_exposed()
        })
        .collect()
}

/// Gives every module of every package in `packages_to_link` a direct edge to
/// the exposed modules of each package in its owner's transitive dependency
/// set.
///
/// Exposed modules are always taken from `owned`, the extracted module lists,
/// so edges never chain through another package's links. Injected edges are
/// not checked against edges the module already has; repeats are collapsed
/// by the closure pass.
pub fn link(
    packages: &PackageSet,
    owned: &HashMap<PackageId, Vec<ModuleId>>,
    packages_to_link: &[PackageId],
    graph: &mut GraphBuilder,
) -> Result<LinkReport> {
    let mut report = LinkReport::default();

    for &package in packages_to_link {
        let package_modules = owned.get(&package).map(Vec::as_slice).unwrap_or(&[]);

        let order = match dependency_order(packages, package) {
            TopologicalOrder::Ordered(order) => order,
            TopologicalOrder::CycleDetected(cycle) => {
                return Err(AssemblyError::DependencyCycle {
                    cycle: cycle
                        .iter()
                        .map(|id| packages.name(*id).to_string())
                        .collect(),
                });
            }
        };

        for dependency in order {
            let dependency_modules = owned.get(&dependency).map(Vec::as_slice).unwrap_or(&[]);
            let exposed = exposed_modules(graph, dependency_modules);
            if exposed.is_empty() {
                continue;
            }

            for &module in package_modules {
                graph.prepend_dependencies(module, &exposed);
                report.edges_added += exposed.len();
            }
        }

        tracing::debug!(
            "Linked package '{}' ({} modules)",
            packages.name(package),
            package_modules.len()
        );
        report.packages_linked += 1;
    }

    Ok(report)
}
