#[cfg(feature = "cli")]
pub mod cli;
pub mod manifest;

#[cfg(feature = "cli")]
use crate::adapters::plan::PlanFormat;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "modgraph")]
#[command(about = "Assemble the module graph of a package and its dependencies")]
pub struct CliConfig {
    /// Path to the workspace manifest
    #[arg(short, long, default_value = "modgraph.toml")]
    pub manifest: String,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: PlanFormat,

    /// Write the plan to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Only list the modules of external packages
    #[arg(long)]
    pub externals_only: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::Result<()> {
        crate::utils::validation::validate_path("manifest", &self.manifest)?;
        if let Some(output) = &self.output {
            crate::utils::validation::validate_path("output", output)?;
        }
        Ok(())
    }
}
