//! End-to-end tests for the specforge CLI

use anyhow::{bail, Result};
use std::path::Path;
use std::process::Command;

const VALID_SPEC: &str = r#"{
    "openapi": "3.0.0",
    "info": {"title": "Pets", "version": "1.0.0"},
    "paths": {},
    "components": {"schemas": {
        "Pet": {
            "type": "object",
            "required": ["id"],
            "properties": {"id": {"type": "integer"}, "name": {"type": "string"}}
        }
    }}
}"#;

fn specforge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_specforge"))
}

fn run_checked(cmd: &mut Command) -> Result<()> {
    let output = cmd.output()?;
    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        bail!("command failed with status {}", output.status);
    }
    Ok(())
}

#[test]
fn test_typegen_mixed_batch_from_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("a.json"), VALID_SPEC)?;
    std::fs::write(dir.path().join("bad.yaml"), "foo: [unclosed")?;
    std::fs::write(
        dir.path().join("specforge.yaml"),
        "entries:\n  - sourcePath: a.json\n    outputPath: gen/a.d.ts\n  - sourcePath: bad.yaml\n    outputPath: gen/bad.d.ts\n",
    )?;

    // A recoverable parse failure must not fail the run
    run_checked(
        specforge()
            .arg("typegen")
            .arg("--config")
            .arg(dir.path().join("specforge.yaml"))
            .arg("--root")
            .arg(dir.path()),
    )?;

    let generated = std::fs::read_to_string(dir.path().join("gen/a.d.ts"))?;
    assert!(generated.contains("export interface Pet {"));
    assert!(generated.contains("  id: number;"));
    assert!(!dir.path().join("gen/bad.d.ts").exists());
    Ok(())
}

#[test]
fn test_typegen_entry_flag_and_idempotent_rerun() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("pets.json"), VALID_SPEC)?;

    let run = |root: &Path| -> Result<()> {
        run_checked(
            specforge()
                .arg("typegen")
                .arg("--entry")
                .arg("pets.json=types/pets.d.ts")
                .arg("--root")
                .arg(root),
        )
    };

    run(dir.path())?;
    let first = std::fs::read_to_string(dir.path().join("types/pets.d.ts"))?;
    run(dir.path())?;
    let second = std::fs::read_to_string(dir.path().join("types/pets.d.ts"))?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_typegen_rejects_invalid_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("specforge.yaml"),
        "entries:\n  - sourcePath: /absolute.yaml\n    outputPath: out.d.ts\n",
    )?;

    let output = specforge()
        .arg("typegen")
        .arg("--config")
        .arg(dir.path().join("specforge.yaml"))
        .arg("--root")
        .arg(dir.path())
        .output()?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_image_typings_stub() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output_path = dir.path().join("types/images.d.ts");

    run_checked(
        specforge()
            .arg("image-typings")
            .arg("--output")
            .arg(&output_path),
    )?;

    let content = std::fs::read_to_string(&output_path)?;
    assert!(content.contains("declare module \"*.png\""));
    Ok(())
}
