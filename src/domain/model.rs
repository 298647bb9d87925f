use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::utils::error::{AssemblyError, Result};

/// Index of a package inside a [`PackageSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub(crate) usize);

/// Index of a module inside a module arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

impl PackageId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ModuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Package root on disk, used to derive default module source roots.
    pub path: PathBuf,
    pub dependencies: Vec<PackageId>,
}

/// Arena of packages. Dependencies are shared by id, so the same package can
/// be depended on from several places.
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    packages: Vec<Package>,
    by_name: HashMap<String, PackageId>,
}

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, dependencies: &[PackageId]) -> Result<PackageId> {
        self.add_at(name, name, dependencies)
    }

    pub fn add_at(
        &mut self,
        name: &str,
        path: impl Into<PathBuf>,
        dependencies: &[PackageId],
    ) -> Result<PackageId> {
        if self.by_name.contains_key(name) {
            return Err(AssemblyError::DuplicatePackage {
                name: name.to_string(),
            });
        }
        if let Some(missing) = dependencies.iter().find(|dep| dep.0 >= self.packages.len()) {
            return Err(AssemblyError::UnknownPackage {
                name: format!("#{}", missing.0),
            });
        }

        let id = PackageId(self.packages.len());
        self.packages.push(Package {
            name: name.to_string(),
            path: path.into(),
            dependencies: dependencies.to_vec(),
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Adds an edge after the fact. Nothing here stops this from closing a
    /// cycle; the dependency orderer reports it.
    pub fn add_dependency(&mut self, package: PackageId, dependency: PackageId) {
        self.packages[package.0].dependencies.push(dependency);
    }

    pub fn get(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    pub fn name(&self, id: PackageId) -> &str {
        &self.packages[id.0].name
    }

    pub fn find(&self, name: &str) -> Option<PackageId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(index, package)| (PackageId(index), package))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Library,
    Executable,
    Test,
    /// Natively provided module (system library wrapper), never compiled here.
    System,
}

impl ModuleKind {
    pub fn is_test(self) -> bool {
        self == ModuleKind::Test
    }

    /// Whether a module of this kind is visible to dependent packages.
    pub fn is_exposed(self) -> bool {
        match self {
            ModuleKind::Library | ModuleKind::System => true,
            ModuleKind::Executable | ModuleKind::Test => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::Library => "library",
            ModuleKind::Executable => "executable",
            ModuleKind::Test => "test",
            ModuleKind::System => "system",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "library" => Ok(ModuleKind::Library),
            "executable" => Ok(ModuleKind::Executable),
            "test" => Ok(ModuleKind::Test),
            "system" => Ok(ModuleKind::System),
            other => Err(AssemblyError::InvalidConfigValueError {
                field: "module.kind".to_string(),
                value: other.to_string(),
                reason: format!("Valid kinds: {}", ModuleKind::NAMES.join(", ")),
            }),
        }
    }
}

impl ModuleKind {
    pub const NAMES: [&'static str; 4] = ["library", "executable", "test", "system"];
}

/// What an extractor hands over to create a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    pub kind: ModuleKind,
    pub source_root: PathBuf,
}

impl ModuleSpec {
    pub fn new(name: &str, kind: ModuleKind, source_root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            source_root: source_root.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub kind: ModuleKind,
    /// Identifies the physical module; two modules with the same name are
    /// the same module only if their source roots match.
    pub source_root: PathBuf,
    pub package: PackageId,
    pub dependencies: Vec<ModuleId>,
}

impl Module {
    pub fn is_test(&self) -> bool {
        self.kind.is_test()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Library,
    Executable,
    Test,
}

impl ProductKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductKind::Library => "library",
            ProductKind::Executable => "executable",
            ProductKind::Test => "test",
        }
    }

    pub const NAMES: [&'static str; 3] = ["library", "executable", "test"];
}

impl FromStr for ProductKind {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "library" => Ok(ProductKind::Library),
            "executable" => Ok(ProductKind::Executable),
            "test" => Ok(ProductKind::Test),
            other => Err(AssemblyError::InvalidConfigValueError {
                field: "product.kind".to_string(),
                value: other.to_string(),
                reason: format!("Valid kinds: {}", ProductKind::NAMES.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub kind: ProductKind,
    pub modules: Vec<ModuleId>,
}
