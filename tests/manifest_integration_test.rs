use anyhow::Result;
use modgraph::utils::validation::Validate;
use modgraph::{
    Assembler, AssemblyError, BuildPlan, ManifestExtractor, PlanFormat, PlanOutput,
    WorkspaceManifest,
};
use tempfile::TempDir;

const WORKSPACE: &str = r#"
[workspace]
root = "server"

[[package]]
name = "server"
dependencies = ["http", "log"]

[[package.module]]
name = "ServerCore"
kind = "library"

[[package.module]]
name = "server"
kind = "executable"
dependencies = ["ServerCore"]

[[package.module]]
name = "ServerCoreTests"
kind = "test"
dependencies = ["ServerCore"]

[[package]]
name = "http"
path = "Packages/http"
dependencies = ["zlib"]

[[package.module]]
name = "HTTP"
kind = "library"

[[package.module]]
name = "http-bench"
kind = "executable"
dependencies = ["HTTP"]

[[package.module]]
name = "HTTPTests"
kind = "test"
dependencies = ["HTTP"]

[[package]]
name = "log"
path = "Packages/log"

[[package.module]]
name = "Logging"
kind = "library"

[[package]]
name = "zlib"
path = "Packages/zlib"

[[package.module]]
name = "CZlib"
kind = "system"
source_root = "/usr/include"
"#;

fn assemble(manifest: WorkspaceManifest) -> modgraph::Result<(BuildPlan, BuildPlan)> {
    manifest.validate()?;
    let workspace = manifest.to_workspace()?;
    let assembler = Assembler::new(ManifestExtractor::new(manifest));
    let assembly = assembler.assemble(&workspace.packages, workspace.root, &workspace.externals)?;
    let plan = BuildPlan::from_assembly(&assembly, &workspace.packages);
    Ok((plan.clone(), plan.externals_only()))
}

#[test]
fn test_manifest_file_to_json_plan() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manifest_path = temp_dir.path().join("modgraph.toml");
    std::fs::write(&manifest_path, WORKSPACE)?;

    let manifest = WorkspaceManifest::from_file(&manifest_path)?;
    let (plan, _) = assemble(manifest)?;

    let output_path = temp_dir.path().join("out/plan.json");
    PlanOutput::new(output_path.to_str()).write(&plan.render(PlanFormat::Json)?)?;

    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output_path)?)?;
    let names: Vec<&str> = written["modules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();

    assert_eq!(
        names,
        vec![
            "HTTP",
            "http-bench",
            "Logging",
            "CZlib",
            "ServerCore",
            "server",
            "ServerCoreTests"
        ]
    );
    assert!(!names.contains(&"HTTPTests"));
    assert_eq!(
        written["external_modules"],
        serde_json::json!(["HTTP", "http-bench", "Logging", "CZlib"])
    );
    Ok(())
}

#[test]
fn test_linked_dependencies_in_plan() -> Result<()> {
    let manifest = WorkspaceManifest::from_toml_str(WORKSPACE)?;
    let (plan, _) = assemble(manifest)?;

    let module = |name: &str| plan.modules.iter().find(|m| m.name == name).unwrap();

    // server's dependency order is zlib, http, log
    assert_eq!(
        module("server").dependencies,
        vec!["Logging", "HTTP", "CZlib", "ServerCore"]
    );
    assert_eq!(module("http-bench").dependencies, vec!["CZlib", "HTTP"]);
    assert_eq!(module("CZlib").source_root, "/usr/include");
    assert_eq!(module("HTTP").source_root, "Packages/http/Sources/HTTP");
    assert_eq!(module("ServerCoreTests").source_root, "server/Tests/ServerCoreTests");
    Ok(())
}

#[test]
fn test_products_from_manifest() -> Result<()> {
    let manifest = WorkspaceManifest::from_toml_str(WORKSPACE)?;
    let (plan, externals) = assemble(manifest)?;

    let names: Vec<&str> = plan.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["http-bench", "server", "serverTests"]);

    let names: Vec<&str> = externals.products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["http-bench"]);
    Ok(())
}

#[test]
fn test_csv_plan_for_externals() -> Result<()> {
    let manifest = WorkspaceManifest::from_toml_str(WORKSPACE)?;
    let (_, externals) = assemble(manifest)?;

    let csv = externals.render(PlanFormat::Csv)?;
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| &r[4] == "true"));
    assert_eq!(&rows[3][0], "CZlib");
    assert_eq!(&rows[3][1], "system");
    Ok(())
}

#[test]
fn test_rendering_is_stable_across_runs() -> Result<()> {
    let first = assemble(WorkspaceManifest::from_toml_str(WORKSPACE)?)?.0;
    let second = assemble(WorkspaceManifest::from_toml_str(WORKSPACE)?)?.0;

    for format in [PlanFormat::Json, PlanFormat::Csv, PlanFormat::Text] {
        assert_eq!(first.render(format)?, second.render(format)?);
    }
    Ok(())
}

#[test]
fn test_duplicate_module_across_packages() -> Result<()> {
    let manifest = WorkspaceManifest::from_toml_str(
        r#"
[workspace]
root = "app"

[[package]]
name = "app"
dependencies = ["one", "two"]

[[package.module]]
name = "App"
kind = "executable"

[[package]]
name = "one"

[[package.module]]
name = "Utils"
kind = "library"

[[package]]
name = "two"

[[package.module]]
name = "Utils"
kind = "library"
"#,
    )?;

    let err = assemble(manifest).unwrap_err();
    assert!(matches!(err, AssemblyError::DuplicateModule { name, .. } if name == "Utils"));
    Ok(())
}

#[test]
fn test_sourceless_root_alone_gives_empty_plan() -> Result<()> {
    let manifest = WorkspaceManifest::from_toml_str(
        r#"
[workspace]
root = "docs"

[[package]]
name = "docs"
"#,
    )?;

    let (plan, _) = assemble(manifest)?;
    assert!(plan.modules.is_empty());
    assert!(plan.external_modules.is_empty());
    assert!(plan.products.is_empty());
    assert_eq!(
        plan.render(PlanFormat::Text)?,
        "modules (0):\nexternal modules (0):\nproducts (0):\n"
    );
    Ok(())
}
