//! Library integration tests.

use std::fs;

use tempfile::TempDir;
use uvfile::manifest::Manifest;
use uvfile::receipt::{parse_tool_list, read_installed};
use uvfile::reconcile::{plan, SyncPolicy};
use uvfile::requirement::{parse_requirement, Source, ToolSpec};
use uvfile::UvfileError;

#[test]
fn error_types_are_public() {
    let err = UvfileError::AmbiguousState {
        name: "ruff".into(),
        origin: "the UVFile".into(),
    };
    assert!(err.to_string().contains("ruff"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> uvfile::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use uvfile::cli::{Cli, Commands};

    let cli = Cli::parse_from(["uvfile", "sync", "--uninstall"]);
    match cli.command {
        Commands::Sync(args) => assert!(args.uninstall),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn manifest_round_trips_through_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("UVFile");
    let tools = vec![
        ToolSpec::new(parse_requirement("black>=24", false).unwrap())
            .with_override(parse_requirement("click<9", false).unwrap())
            .with_interpreter(Some("3.12")),
        ToolSpec::new(
            parse_requirement("ruff@git+https://github.com/astral-sh/ruff", false).unwrap(),
        ),
    ];

    Manifest::save(&path, &tools).unwrap();
    let loaded = Manifest::load(&path).unwrap();

    assert_eq!(loaded.tools().len(), 2);
    let fresh = plan(loaded.tools(), &[], SyncPolicy::default()).unwrap();
    assert_eq!(fresh.to_install.len(), 2);
}

#[test]
fn relative_directory_sources_resolve_against_manifest() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("UVFile");
    fs::write(&path, "plugin@./plugin\n").unwrap();

    let loaded = Manifest::load(&path).unwrap();
    match loaded.tools()[0].primary().source() {
        Source::Directory { path: dir } => {
            assert!(std::path::Path::new(dir).is_absolute());
            assert!(dir.ends_with("plugin"));
        }
        other => panic!("unexpected source: {:?}", other),
    }
}

#[test]
fn installed_state_drives_the_plan() {
    let temp = TempDir::new().unwrap();
    let black_dir = temp.path().join("black");
    fs::create_dir_all(&black_dir).unwrap();
    fs::write(
        black_dir.join("uv-receipt.toml"),
        "[tool]\nrequirements = [{ name = \"black\", specifier = \">=24\" }]\n",
    )
    .unwrap();
    let listing = format!(
        "black v24.1.0 ({})\n- black ({}/bin/black)\n",
        black_dir.display(),
        temp.path().display()
    );

    let installed = read_installed(&parse_tool_list(&listing));
    let declared = vec![
        ToolSpec::new(parse_requirement("black>=24", false).unwrap()),
        ToolSpec::new(parse_requirement("ruff", false).unwrap()),
    ];

    let result = plan(&declared, &installed, SyncPolicy::default()).unwrap();
    assert_eq!(result.unchanged, vec!["black"]);
    assert_eq!(result.to_install.len(), 1);
    assert_eq!(result.to_install[0].name(), Some("ruff"));
}
