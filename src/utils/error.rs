use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("duplicate module '{name}' found at {} and {}", .first_root.display(), .second_root.display())]
    DuplicateModule {
        name: String,
        first_root: PathBuf,
        second_root: PathBuf,
    },

    #[error("package dependency cycle: {}", .cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },

    #[error("package '{package}' does not contain any sources")]
    NoModules { package: String },

    #[error("package '{name}' is declared more than once")]
    DuplicatePackage { name: String },

    #[error("unknown package '{name}'")]
    UnknownPackage { name: String },

    #[error("module '{module}' depends on unknown module '{dependency}'")]
    UnknownModuleDependency { module: String, dependency: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Graph,
    Internal,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AssemblyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssemblyError::DuplicateModule { .. }
            | AssemblyError::NoModules { .. }
            | AssemblyError::DuplicatePackage { .. }
            | AssemblyError::UnknownPackage { .. }
            | AssemblyError::UnknownModuleDependency { .. } => ErrorCategory::Graph,
            AssemblyError::DependencyCycle { .. } => ErrorCategory::Internal,
            AssemblyError::IoError(_)
            | AssemblyError::SerializationError(_)
            | AssemblyError::CsvError(_) => ErrorCategory::Io,
            AssemblyError::ConfigValidationError { .. }
            | AssemblyError::InvalidConfigValueError { .. }
            | AssemblyError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Internal => ErrorSeverity::Critical,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Graph | ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AssemblyError::DuplicateModule { .. } => {
                "Rename one of the modules or remove the package that provides the copy"
            }
            AssemblyError::DependencyCycle { .. } => {
                "Package dependencies must be acyclic; check the resolved dependency list"
            }
            AssemblyError::NoModules { .. } => {
                "Add at least one module to the package or drop it from the dependency list"
            }
            AssemblyError::DuplicatePackage { .. } => "Give every package a unique name",
            AssemblyError::UnknownPackage { .. } => {
                "Declare the package in the manifest before depending on it"
            }
            AssemblyError::UnknownModuleDependency { .. } => {
                "Declare the dependency module in the same package or fix its name"
            }
            AssemblyError::IoError(_) => "Check that the path exists and is readable/writable",
            AssemblyError::SerializationError(_) | AssemblyError::CsvError(_) => {
                "Retry with a different output format"
            }
            AssemblyError::ConfigValidationError { .. }
            | AssemblyError::InvalidConfigValueError { .. }
            | AssemblyError::MissingConfigError { .. } => {
                "Fix the manifest value named in the error and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AssemblyError::DuplicateModule { name, .. } => {
                format!("Two different modules are both named '{}'", name)
            }
            AssemblyError::DependencyCycle { .. } => {
                format!("Internal error, the package graph is not acyclic ({})", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblyError>;
