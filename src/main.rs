use clap::Parser;
use modgraph::utils::error::ErrorSeverity;
use modgraph::utils::{logger, validation::Validate};
use modgraph::{
    Assembler, AssemblyError, BuildPlan, CliConfig, ManifestExtractor, PlanOutput,
    WorkspaceManifest,
};

fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ Assembly failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn run(config: &CliConfig) -> Result<(), AssemblyError> {
    config.validate()?;

    tracing::info!("📁 Loading manifest from: {}", config.manifest);
    let manifest = WorkspaceManifest::from_file(&config.manifest)?;
    manifest.validate()?;
    let workspace = manifest.to_workspace()?;

    let assembler = Assembler::new(ManifestExtractor::new(manifest));
    let assembly = assembler.assemble(&workspace.packages, workspace.root, &workspace.externals)?;

    let mut plan = BuildPlan::from_assembly(&assembly, &workspace.packages);
    if config.externals_only {
        plan = plan.externals_only();
    }

    let rendered = plan.render(config.format)?;
    PlanOutput::new(config.output.as_deref()).write(&rendered)?;

    if let Some(path) = &config.output {
        tracing::info!("✅ Build plan written to: {}", path);
    }
    Ok(())
}
