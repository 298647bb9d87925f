use std::collections::{HashMap, VecDeque};

use crate::domain::graph::ModuleGraph;
use crate::domain::model::ModuleId;
use crate::utils::error::{AssemblyError, Result};

/// Every module reachable from `start`, in breadth-first discovery order.
///
/// Modules are keyed by name. Meeting a name again is fine when it is the
/// same module or a module with the same source root; any other module with
/// that name fails with [`AssemblyError::DuplicateModule`].
///
/// The result is complete and free of repeats but is not a compile order.
pub fn closure(graph: &ModuleGraph, start: &[ModuleId]) -> Result<Vec<ModuleId>> {
    let mut queue: VecDeque<ModuleId> = start.iter().copied().collect();
    let mut visited: HashMap<&str, ModuleId> = HashMap::new();
    let mut result = Vec::new();

    while let Some(id) = queue.pop_front() {
        let module = graph.module(id);

        match visited.get(module.name.as_str()).copied() {
            None => {
                visited.insert(module.name.as_str(), id);
                result.push(id);
                queue.extend(graph.dependencies(id).iter().copied());
            }
            Some(seen) if seen == id => {}
            Some(seen) => {
                let first = graph.module(seen);
                if first.source_root != module.source_root {
                    return Err(AssemblyError::DuplicateModule {
                        name: module.name.clone(),
                        first_root: first.source_root.clone(),
                        second_root: module.source_root.clone(),
                    });
                }
            }
        }
    }

    Ok(result)
}
