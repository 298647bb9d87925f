use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Where the CLI writes a rendered plan.
#[derive(Debug, Clone)]
pub enum PlanOutput {
    Stdout,
    File(PathBuf),
}

impl PlanOutput {
    pub fn new(path: Option<&str>) -> Self {
        match path {
            Some(path) => PlanOutput::File(PathBuf::from(path)),
            None => PlanOutput::Stdout,
        }
    }

    pub fn write(&self, content: &str) -> Result<()> {
        match self {
            PlanOutput::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                stdout.flush()?;
            }
            PlanOutput::File(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, content)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_output_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/plan.json");

        let output = PlanOutput::new(path.to_str());
        output.write("{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_no_path_means_stdout() {
        assert!(matches!(PlanOutput::new(None), PlanOutput::Stdout));
    }
}
