//! Developer tasks (schema generation, report conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Project root: the parent of the xtask directory.
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };
    if manifest_dir.ends_with("xtask") {
        return manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent directory");
    }
    Ok(manifest_dir)
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

/// Schema definition with its target filename and the report file it describes.
struct SchemaSpec {
    filename: &'static str,
    report_file: Option<&'static str>,
    generate: fn() -> schemars::Schema,
}

fn generate_analyze_log_schema() -> schemars::Schema {
    schema_for!(bomaudit_types::AnalyzeLog)
}

fn generate_compliance_schema() -> schemars::Schema {
    schema_for!(bomaudit_types::ComplianceResult)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(bomaudit_settings::BomauditConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "bomaudit.analyze_log.v1.json",
            report_file: Some("analyze_log.json"),
            generate: generate_analyze_log_schema,
        },
        SchemaSpec {
            filename: "bomaudit.compliance.v1.json",
            report_file: Some("compliance_result.json"),
            generate: generate_compliance_schema,
        },
        SchemaSpec {
            filename: "bomaudit.config.v1.json",
            report_file: None,
            generate: generate_config_schema,
        },
    ]
}

/// Pretty-printed JSON with a trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fails when a checked-in schema is missing or differs from the generated one.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = serialize_schema(&(spec.generate)())?;
        let actual =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &missing {
        eprintln!("missing: {name}");
    }
    for name in &mismatched {
        eprintln!("out of date: {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Validate every `analyze_log.json` and `compliance_result.json` below `root`.
fn conform(root: &Path) -> anyhow::Result<()> {
    let mut validators = Vec::new();
    for spec in schema_specs() {
        let Some(report_file) = spec.report_file else {
            continue;
        };
        let schema = serde_json::to_value((spec.generate)()).context("schema to JSON")?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| anyhow::anyhow!("compile {}: {e}", spec.filename))?;
        validators.push((report_file, validator));
    }

    let mut checked = 0;
    let mut errors = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        let name = entry.file_name().to_string_lossy();
        let Some((_, validator)) = validators.iter().find(|(file, _)| *file == name) else {
            continue;
        };
        let path = entry.path();
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parse {}", path.display()))?;
        for err in validator.iter_errors(&value) {
            errors.push(format!("{}: {err}", path.display()));
        }
        checked += 1;
    }

    if checked == 0 {
        bail!("no report files found below {}", root.display());
    }
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("{} schema violations in {checked} files", errors.len());
    }
    println!("{checked} report files conform.");
    Ok(())
}

/// Every category code must resolve to a complete explanation.
fn explain_coverage() -> anyhow::Result<()> {
    let codes = bomaudit_types::explain::all_codes();
    let mut errors = Vec::new();

    for code in &codes {
        let Some(exp) = bomaudit_types::explain::lookup_explanation(code) else {
            errors.push(format!("code '{code}' has no explanation"));
            continue;
        };
        for (field, text) in [
            ("description", exp.description),
            ("validation", exp.validation),
            ("remediation", exp.remediation),
        ] {
            if text.is_empty() {
                errors.push(format!("code '{code}' has empty {field}"));
            }
        }
        if bomaudit_types::explain::lookup_explanation(exp.label).is_none() {
            errors.push(format!("label '{}' does not resolve", exp.label));
        }
    }

    if errors.is_empty() {
        println!("{} codes have explanations.", codes.len());
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {error}");
    }
    bail!("explain coverage failed with {} errors", errors.len())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform <dir>     Validate audit outputs below <dir> against the schemas");
    eprintln!("  explain-coverage  Validate all category codes have explanations");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => match args.get(2) {
            Some(dir) => conform(Path::new(dir)),
            None => bail!("usage: cargo xtask conform <dir>"),
        },
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
