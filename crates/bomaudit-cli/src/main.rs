//! CLI entry point for bomaudit.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! Audit logic lives in the `bomaudit-app` crate; retrieval and tagging live next to this file
//! because they only drive external systems.

mod crawl;
mod logging;
mod tagging;

use anyhow::Context;
use bomaudit_app::{
    CheckInput, ExplainOutput, exit_code_for, format_explanation, format_not_found,
    load_config, parse_compliance_json, render_markdown, render_table, run_check, run_explain,
    run_index, to_renderable, write_text,
};
use bomaudit_repo::{BomDocument, MetaDbLayout};
use bomaudit_settings::{Overrides, ResolvedConfig};
use bomaudit_types::ArtifactId;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "bomaudit",
    version,
    about = "Audit an SBOM's declared dependencies against the packages an artifact actually uses"
)]
struct Cli {
    /// Path to the bomaudit config TOML (missing file = defaults).
    #[arg(long, global = true, default_value = "bomaudit.toml")]
    config: Utf8PathBuf,

    /// Override provider search scope (global|layer).
    #[arg(long, global = true)]
    scope: Option<String>,

    /// Override the metadata database root.
    #[arg(long, global = true)]
    metadb: Option<String>,

    /// Override the results root.
    #[arg(long, global = true)]
    results: Option<String>,

    /// Override log level (an EnvFilter directive; RUST_LOG still wins).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override log format (pretty|compact|json).
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the jars of every artifact declared in a manifest.
    Crawl {
        /// CycloneDX JSON manifest.
        #[arg(long)]
        sbom: Utf8PathBuf,
    },

    /// Run the external analyzer over downloaded jars (and optionally the audited jar).
    Tag {
        /// The audited jar; tagged under the manifest root's coordinates.
        #[arg(long, requires = "sbom")]
        jar: Option<Utf8PathBuf>,
        /// Manifest naming the audited jar's coordinates.
        #[arg(long, requires = "jar")]
        sbom: Option<Utf8PathBuf>,
    },

    /// Fold analyzer output into the provider directory.
    Index,

    /// Detect and validate non-compliance for one manifest and jar.
    Check {
        #[arg(long)]
        sbom: Utf8PathBuf,
        #[arg(long)]
        jar: Utf8PathBuf,
        /// Output directory (default: <results>/audit_results/<group>/<artifact>/<version>).
        #[arg(long)]
        out_dir: Option<Utf8PathBuf>,
        /// Analyzer output for the audited jar (default: its entry in <results>/jarpkgtags).
        #[arg(long)]
        root_metadata: Option<Utf8PathBuf>,
        /// Also write a Markdown report here.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,
    },

    /// Crawl, tag, index and check in one go.
    Audit {
        #[arg(long)]
        sbom: Utf8PathBuf,
        #[arg(long)]
        jar: Utf8PathBuf,
        #[arg(long)]
        out_dir: Option<Utf8PathBuf>,
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,
    },

    /// Print the review table of an existing compliance result.
    Table {
        #[arg(long)]
        report: Utf8PathBuf,
    },

    /// Render Markdown from an existing compliance result.
    Md {
        #[arg(long)]
        report: Utf8PathBuf,
        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a finding category by code (e.g. "M1") or label.
    Explain { identifier: String },
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("bomaudit error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Crawl { sbom } => {
            let env = Env::load(&cli)?;
            cmd_crawl(&env, &bomaudit_repo::manifest::load_bom(sbom)?)?;
            Ok(0)
        }
        Commands::Tag { jar, sbom } => {
            let env = Env::load(&cli)?;
            let audited = match jar.as_deref().zip(sbom.as_deref()) {
                Some((jar, sbom)) => {
                    let doc = bomaudit_repo::manifest::load_bom(sbom)?;
                    manifest_root(sbom, &doc).map(|root| (jar, root))
                }
                None => None,
            };
            cmd_tag(&env, audited)?;
            Ok(0)
        }
        Commands::Index => {
            let env = Env::load(&cli)?;
            cmd_index(&env.layout)?;
            Ok(0)
        }
        Commands::Check {
            sbom,
            jar,
            out_dir,
            root_metadata,
            markdown_out,
        } => {
            let env = Env::load(&cli)?;
            cmd_check(
                &env,
                sbom,
                jar,
                out_dir.as_deref(),
                root_metadata.as_deref(),
                markdown_out.as_deref(),
            )
        }
        Commands::Audit {
            sbom,
            jar,
            out_dir,
            markdown_out,
        } => {
            let env = Env::load(&cli)?;
            // An unreadable manifest still gets an (empty) report from `check`.
            let doc = match bomaudit_repo::manifest::load_bom(sbom) {
                Ok(doc) => doc,
                Err(err) => {
                    warn!(
                        manifest = %sbom,
                        error = %format!("{err:#}"),
                        "unreadable manifest; nothing to crawl or tag"
                    );
                    BomDocument::default()
                }
            };
            cmd_crawl(&env, &doc)?;
            cmd_tag(&env, manifest_root(sbom, &doc).map(|root| (jar.as_path(), root)))?;
            cmd_index(&env.layout)?;
            cmd_check(
                &env,
                sbom,
                jar,
                out_dir.as_deref(),
                None,
                markdown_out.as_deref(),
            )
        }
        Commands::Table { report } => cmd_table(report),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Explain { identifier } => Ok(cmd_explain(identifier)),
    }
}

/// Resolved configuration plus the directory layout derived from it.
struct Env {
    config: ResolvedConfig,
    layout: MetaDbLayout,
}

impl Env {
    /// Resolve config and start logging. Rendering and explain never need this.
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let overrides = Overrides {
            scope: cli.scope.clone(),
            metadb: cli.metadb.clone(),
            results: cli.results.clone(),
            log_level: cli.log_level.clone(),
            log_format: cli.log_format.clone(),
        };
        let config = load_config(&cli.config, overrides)?;
        logging::init_logging(&config.log)?;
        let layout = MetaDbLayout::new(&config.metadb, &config.results);
        Ok(Self { config, layout })
    }
}

fn cmd_crawl(env: &Env, doc: &BomDocument) -> anyhow::Result<()> {
    let stats = crawl::crawl(doc, &env.layout, &env.config.crawl)?;
    eprintln!(
        "crawl: {} declared, {} present, {} fetched ({} files), {} failed",
        stats.declared, stats.already_present, stats.fetched, stats.files, stats.failed
    );
    Ok(())
}

/// `audited` is the audited jar with its manifest root.
fn cmd_tag(env: &Env, audited: Option<(&Utf8Path, ArtifactId)>) -> anyhow::Result<()> {
    let mut jobs = tagging::asset_jobs(&env.layout)?;
    if let Some((jar, root)) = audited {
        jobs.push(tagging::root_job(&env.layout, root, jar));
    }
    let stats = tagging::tag_all(&jobs, &env.config.tagger);
    eprintln!(
        "tag: {} tagged, {} already tagged, {} failed",
        stats.tagged, stats.already_tagged, stats.failed
    );
    Ok(())
}

fn manifest_root(sbom: &Utf8Path, doc: &BomDocument) -> Option<ArtifactId> {
    let graph = bomaudit_repo::graph_from_bom(doc);
    let root = graph.root().and_then(|r| ArtifactId::from_purl(r).ok());
    if root.is_none() {
        warn!(manifest = %sbom, "no unique root; the audited jar is not tagged");
    }
    root
}

fn cmd_index(layout: &MetaDbLayout) -> anyhow::Result<()> {
    let stats = run_index(layout)?;
    eprintln!(
        "index: {} scanned, {} added, {} upgraded, {} already present, {} unreadable, {} empty",
        stats.scanned,
        stats.added,
        stats.upgraded,
        stats.already_present,
        stats.read_errors,
        stats.empty_package_lists
    );
    Ok(())
}

fn cmd_check(
    env: &Env,
    sbom: &Utf8Path,
    jar: &Utf8Path,
    out_dir: Option<&Utf8Path>,
    root_metadata: Option<&Utf8Path>,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let output = run_check(CheckInput {
        sbom,
        jar,
        config: &env.config,
        out_dir,
        root_metadata,
    })?;

    let renderable = to_renderable(&output.compliance);
    print!("{}", render_table(&renderable));
    if let Some(path) = markdown_out {
        write_text(path, &render_markdown(&renderable)).context("write markdown")?;
    }
    eprintln!("results written to {}", output.out_dir);
    Ok(exit_code_for(&output.compliance))
}

fn read_report(path: &Utf8Path) -> anyhow::Result<bomaudit_types::ComplianceResult> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_compliance_json(&text).with_context(|| format!("report {path}"))
}

fn cmd_table(report: &Utf8Path) -> anyhow::Result<i32> {
    let result = read_report(report)?;
    print!("{}", render_table(&to_renderable(&result)));
    Ok(0)
}

fn cmd_md(report: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let result = read_report(report)?;
    let md = render_markdown(&to_renderable(&result));
    match output {
        Some(path) => write_text(path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_codes,
        } => {
            eprint!("{}", format_not_found(&identifier, &available_codes));
            1
        }
    }
}
