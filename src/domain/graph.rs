use crate::domain::model::{Module, ModuleId, ModuleSpec, PackageId};

/// Mutable module arena used while extracting and linking.
///
/// Edges can only be added here. Once linking is done the builder is turned
/// into a [`ModuleGraph`] with [`GraphBuilder::freeze`], and only the frozen
/// graph is accepted by the closure pass.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    modules: Vec<Module>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, package: PackageId, spec: ModuleSpec) -> ModuleId {
        let id = ModuleId(self.modules.len());
        self.modules.push(Module {
            name: spec.name,
            kind: spec.kind,
            source_root: spec.source_root,
            package,
            dependencies: Vec::new(),
        });
        id
    }

    pub fn add_dependency(&mut self, module: ModuleId, dependency: ModuleId) {
        self.modules[module.0].dependencies.push(dependency);
    }

    /// Inserts `dependencies` at the front of the module's edge list, keeping
    /// their relative order. Repeated edges are kept as they are.
    pub fn prepend_dependencies(&mut self, module: ModuleId, dependencies: &[ModuleId]) {
        if dependencies.is_empty() {
            return;
        }
        let edges = &mut self.modules[module.0].dependencies;
        let existing = std::mem::take(edges);
        edges.reserve(dependencies.len() + existing.len());
        edges.extend_from_slice(dependencies);
        edges.extend(existing);
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn freeze(self) -> ModuleGraph {
        ModuleGraph {
            modules: self.modules,
        }
    }
}

/// Fully linked, read-only module graph.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
}

impl ModuleGraph {
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub fn dependencies(&self, id: ModuleId) -> &[ModuleId] {
        &self.modules[id.0].dependencies
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(index, module)| (ModuleId(index), module))
    }

    pub fn names(&self, ids: &[ModuleId]) -> Vec<&str> {
        ids.iter().map(|id| self.module(*id).name.as_str()).collect()
    }
}
