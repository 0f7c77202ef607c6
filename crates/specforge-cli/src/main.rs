//! specforge CLI entrypoint
//! Parses command-line arguments and dispatches to the core build library.

// Internal imports (std, crate)
use std::path::PathBuf;
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use specforge_core::{
    assets, BuildSession, ClientToolConfig, ClientToolRunner, LogSink, SpecEntry,
    TsTypingsGenerator, TypegenConfig, DEFAULT_CONCURRENCY_LIMIT,
};

#[derive(Parser)]
#[command(name = "specforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate TypeScript typings from OpenAPI spec entries
    Typegen {
        /// Configuration file with the entries list (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Additional entry as SOURCE=OUTPUT (relative to the build root)
        ///
        /// Example: --entry api/openapi.yaml=src/types/api.d.ts
        #[arg(long)]
        entry: Vec<String>,
        /// Build root directory relative paths are resolved against
        /// (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Maximum number of conversions in flight
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY_LIMIT)]
        jobs: usize,
        /// Keep running and re-convert entries when their sources change.
        ///
        /// Failures from the initial batch are printed but do not set the
        /// exit code; the process runs until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Invoke the external OpenAPI client-code generator
    Client {
        /// Configuration file for the generator invocation (YAML or JSON)
        #[arg(long)]
        config: PathBuf,
        /// Build root directory relative paths are resolved against
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Write the ambient image-typings stub
    ImageTypings {
        /// Path of the typings file to write
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Typegen {
            config,
            entry,
            root,
            jobs,
            watch,
        } => {
            let build_root = resolve_build_root(root)?;

            let mut entries = match config {
                Some(path) => {
                    TypegenConfig::from_file(path)
                        .await
                        .with_context(|| format!("Failed to load config {}", path.display()))?
                        .entries
                }
                None => Vec::new(),
            };
            for spec in entry {
                entries.push(parse_entry_arg(spec)?);
            }
            if entries.is_empty() {
                anyhow::bail!("No entries configured; pass --config or --entry");
            }

            let typegen_config = TypegenConfig { entries };
            let session = BuildSession::new(
                &typegen_config,
                &build_root,
                Arc::new(TsTypingsGenerator::new()),
                Arc::new(LogSink),
            )
            .context("Invalid typegen configuration")?
            .with_concurrency_limit(*jobs);

            let summary = session.on_pre_compile().await;
            println!(
                "Typegen finished: {} written, {} removed, {} skipped, {} failed",
                summary.written,
                summary.removed,
                summary.skipped,
                summary.failures.len()
            );
            for (path, err) in &summary.failures {
                eprintln!("  {} failed: {}", path.display(), err);
            }

            if *watch {
                println!("Watching for spec changes (Ctrl-C to stop)...");
                session.watch().await?;
            } else if !summary.is_clean() {
                anyhow::bail!("{} entries failed", summary.failures.len());
            }
        }
        Commands::Client { config, root } => {
            let build_root = resolve_build_root(root)?;
            let client_config = ClientToolConfig::from_file(config)
                .await
                .with_context(|| format!("Failed to load config {}", config.display()))?;

            let runner = ClientToolRunner::new(&client_config, &build_root)
                .context("Invalid client generator configuration")?;
            runner.run(&LogSink).await?;
            println!(
                "Client generation finished; logs written under {}",
                client_config.output_folder_path.display()
            );
        }
        Commands::ImageTypings { output } => {
            assets::write_image_typings(output)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote image typings stub: {}", output.display());
        }
    }
    Ok(())
}

fn resolve_build_root(root: &Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(match root {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => cwd.join(path),
        None => cwd,
    })
}

fn parse_entry_arg(spec: &str) -> anyhow::Result<SpecEntry> {
    let (source, output) = spec
        .split_once('=')
        .with_context(|| format!("Invalid --entry '{spec}': expected SOURCE=OUTPUT"))?;
    if source.is_empty() || output.is_empty() {
        anyhow::bail!("Invalid --entry '{spec}': expected SOURCE=OUTPUT");
    }
    Ok(SpecEntry::new(source, output))
}
