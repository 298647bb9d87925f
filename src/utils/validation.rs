use crate::utils::error::{AssemblyError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AssemblyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AssemblyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssemblyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Module and package names end up as build product identifiers, so only
/// ASCII alphanumerics, `_` and `-` are accepted.
pub fn validate_identifier(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(AssemblyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported character '{}' in name", bad),
        });
    }
    Ok(())
}

pub fn validate_unique<'a, I>(field_name: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(AssemblyError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Name is declared more than once".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(AssemblyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AssemblyError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("package.path", "Packages/Core").is_ok());
        assert!(validate_path("package.path", "").is_err());
        assert!(validate_path("package.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("module.name", "CoreKit").is_ok());
        assert!(validate_identifier("module.name", "core-kit_2").is_ok());
        assert!(validate_identifier("module.name", "   ").is_err());
        assert!(validate_identifier("module.name", "Core Kit").is_err());
        assert!(validate_identifier("module.name", "Core/Kit").is_err());
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("package.name", ["a", "b", "c"]).is_ok());
        assert!(validate_unique("package.name", ["a", "b", "a"]).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("module.kind", "library", &["library", "executable"]).is_ok());
        assert!(validate_one_of("module.kind", "dylib", &["library", "executable"]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("app".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("workspace.root", &present).unwrap(), "app");
        assert!(matches!(
            validate_required_field("workspace.root", &missing),
            Err(AssemblyError::MissingConfigError { .. })
        ));
    }
}
