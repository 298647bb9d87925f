use crate::core::order::{topological_sort, TopologicalOrder};
use crate::domain::model::{ModuleKind, PackageId, PackageSet, ProductKind};
use crate::utils::error::{AssemblyError, Result};
use crate::utils::validation::{
    validate_identifier, validate_one_of, validate_path, validate_unique, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Declarative description of a resolved workspace: the root package and the
/// external packages it depends on, with their modules and products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceManifest {
    pub workspace: WorkspaceConfig,
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    pub name: String,
    pub path: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleConfig>,
    #[serde(default, rename = "product")]
    pub products: Vec<ProductConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    pub kind: String,
    pub source_root: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub modules: Vec<String>,
}

/// Packages of a manifest loaded into a [`PackageSet`].
#[derive(Debug, Clone)]
pub struct Workspace {
    pub packages: PackageSet,
    pub root: PackageId,
    /// Every non-root package, in manifest order.
    pub externals: Vec<PackageId>,
}

impl WorkspaceManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssemblyError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AssemblyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AssemblyError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn package(&self, name: &str) -> Option<&PackageConfig> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_identifier("workspace.root", &self.workspace.root)?;
        validate_unique("package.name", self.packages.iter().map(|p| p.name.as_str()))?;

        if self.package(&self.workspace.root).is_none() {
            return Err(AssemblyError::InvalidConfigValueError {
                field: "workspace.root".to_string(),
                value: self.workspace.root.clone(),
                reason: "Root package is not declared".to_string(),
            });
        }

        for package in &self.packages {
            package.validate()?;
            for dependency in &package.dependencies {
                if self.package(dependency).is_none() {
                    return Err(AssemblyError::UnknownPackage {
                        name: dependency.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Loads the packages into a [`PackageSet`], dependencies first.
    pub fn to_workspace(&self) -> Result<Workspace> {
        let index: HashMap<&str, usize> = self
            .packages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.as_str(), i))
            .collect();

        let mut edges = Vec::with_capacity(self.packages.len());
        for package in &self.packages {
            let mut deps = Vec::with_capacity(package.dependencies.len());
            for name in &package.dependencies {
                let i = index
                    .get(name.as_str())
                    .copied()
                    .ok_or_else(|| AssemblyError::UnknownPackage { name: name.clone() })?;
                deps.push(i);
            }
            edges.push(deps);
        }

        let roots: Vec<usize> = (0..self.packages.len()).collect();
        let order = match topological_sort(&roots, |i| edges[i].clone()) {
            TopologicalOrder::Ordered(order) => order,
            TopologicalOrder::CycleDetected(cycle) => {
                return Err(AssemblyError::DependencyCycle {
                    cycle: cycle
                        .iter()
                        .map(|i| self.packages[*i].name.clone())
                        .collect(),
                });
            }
        };

        let mut packages = PackageSet::new();
        let mut ids: HashMap<usize, PackageId> = HashMap::new();
        for i in order {
            let config = &self.packages[i];
            let deps: Vec<PackageId> = edges[i].iter().map(|d| ids[d]).collect();
            let id = packages.add_at(&config.name, config.package_path(), &deps)?;
            ids.insert(i, id);
        }

        let root = packages
            .find(&self.workspace.root)
            .ok_or_else(|| AssemblyError::UnknownPackage {
                name: self.workspace.root.clone(),
            })?;
        let externals = self
            .packages
            .iter()
            .filter(|p| p.name != self.workspace.root)
            .filter_map(|p| packages.find(&p.name))
            .collect();

        Ok(Workspace {
            packages,
            root,
            externals,
        })
    }
}

impl PackageConfig {
    pub fn package_path(&self) -> PathBuf {
        PathBuf::from(self.path.as_deref().unwrap_or(&self.name))
    }

    pub fn module(&self, name: &str) -> Option<&ModuleConfig> {
        self.modules.iter().find(|m| m.name == name)
    }
}

impl ModuleConfig {
    pub fn module_kind(&self) -> Result<ModuleKind> {
        self.kind.parse()
    }

    /// Declared source root, or `<package>/Sources/<name>`
    /// (`<package>/Tests/<name>` for tests).
    pub fn source_root(&self, package_path: &Path) -> PathBuf {
        match &self.source_root {
            Some(root) => PathBuf::from(root),
            None if self.kind == "test" => package_path.join("Tests").join(&self.name),
            None => package_path.join("Sources").join(&self.name),
        }
    }
}

impl ProductConfig {
    pub fn product_kind(&self) -> Result<ProductKind> {
        self.kind.parse()
    }
}

impl Validate for PackageConfig {
    fn validate(&self) -> Result<()> {
        validate_identifier("package.name", &self.name)?;
        if let Some(path) = &self.path {
            validate_path("package.path", path)?;
        }
        if self.dependencies.iter().any(|d| d == &self.name) {
            return Err(AssemblyError::InvalidConfigValueError {
                field: "package.dependencies".to_string(),
                value: self.name.clone(),
                reason: "Package cannot depend on itself".to_string(),
            });
        }

        validate_unique("module.name", self.modules.iter().map(|m| m.name.as_str()))?;
        for module in &self.modules {
            validate_identifier("module.name", &module.name)?;
            validate_one_of("module.kind", &module.kind, &ModuleKind::NAMES)?;
            if let Some(root) = &module.source_root {
                validate_path("module.source_root", root)?;
            }
            for dependency in &module.dependencies {
                if self.module(dependency).is_none() {
                    return Err(AssemblyError::UnknownModuleDependency {
                        module: module.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        validate_unique("product.name", self.products.iter().map(|p| p.name.as_str()))?;
        for product in &self.products {
            validate_identifier("product.name", &product.name)?;
            validate_one_of("product.kind", &product.kind, &ProductKind::NAMES)?;
            for module in &product.modules {
                if self.module(module).is_none() {
                    return Err(AssemblyError::InvalidConfigValueError {
                        field: "product.modules".to_string(),
                        value: module.clone(),
                        reason: format!("Module is not declared in package '{}'", self.name),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for WorkspaceManifest {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
