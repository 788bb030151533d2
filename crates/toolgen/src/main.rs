//! `apimcp-toolgen`: turn a REST endpoint spec file into an MCP tool.
//!
//! - `validate <SPEC>`: report every problem that would block generation
//! - `generate <SPEC>`: write `<name>.tool.json` and the handler source
//! - `init <PATH>`: write a starter spec

mod config;

use anyhow::Context as _;
use apimcp_tool_compiler::{
    CompilerError, HandlerTarget, ParamType, Parameter, ToolArtifacts, ToolSpec,
    UnreferencedParams, ValidationIssue, compile, validate,
};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize as _;
use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "apimcp-toolgen")]
#[command(version)]
#[command(about = "Generate MCP tool descriptors and proxy handlers from REST endpoint specs")]
struct Cli {
    /// CLI config file (JSON). Defaults to `$XDG_CONFIG_HOME/apimcp/toolgen.json`.
    #[arg(long, env = "APIMCP_TOOLGEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level (or a full `tracing` filter directive). `RUST_LOG` takes precedence.
    #[arg(long, env = "APIMCP_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Check a spec without generating anything.
    Validate {
        spec: PathBuf,

        /// Policy for parameters not referenced by the endpoint: reject, query or ignore.
        #[arg(long)]
        unreferenced: Option<UnreferencedParams>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate the tool descriptor and handler source.
    Generate {
        spec: PathBuf,

        /// Output directory (created if missing).
        #[arg(long, short = 'o')]
        out_dir: Option<PathBuf>,

        /// Handler target: typescript or rust.
        #[arg(long, short = 't')]
        target: Option<HandlerTarget>,

        /// Policy for parameters not referenced by the endpoint: reject, query or ignore.
        #[arg(long)]
        unreferenced: Option<UnreferencedParams>,

        /// Print both artifacts to stdout instead of writing files.
        #[arg(long)]
        stdout: bool,
    },
    /// Write a starter spec to edit.
    Init {
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let config_path = match cli.config {
        Some(p) => p,
        None => config::default_config_path()?,
    };
    let cfg = config::load_config(&config_path)?;
    debug!(config = %config_path.display(), "loaded CLI config");

    let painter = Painter::detect();

    match cli.command {
        Command::Validate {
            spec,
            unreferenced,
            json,
        } => {
            let tool = load_spec(&spec)?;
            let options = cfg.compile_options(None, unreferenced);
            let report = validate(&tool, options.unreferenced);

            if json {
                let text = serde_json::to_string_pretty(&report)
                    .context("serialize validation report")?;
                println!("{text}");
            } else {
                painter.print_issues(&report.errors, &report.warnings);
                if report.is_ok() {
                    println!("ok: '{}' is ready to generate", tool.name);
                }
            }

            Ok(if report.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Generate {
            spec,
            out_dir,
            target,
            unreferenced,
            stdout,
        } => {
            let tool = load_spec(&spec)?;
            let options = cfg.compile_options(target, unreferenced);

            let artifacts = match compile(&tool, &options) {
                Ok(a) => a,
                Err(CompilerError::Invalid(failure)) => {
                    painter.print_issues(&failure.errors, &failure.warnings);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e).context("generate tool"),
            };
            painter.print_issues(&[], &artifacts.warnings);

            if stdout {
                print_artifacts(&artifacts);
            } else {
                let dir = cfg.out_dir(out_dir);
                write_artifacts(&dir, &artifacts)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            let yaml = starter_spec()
                .to_yaml_string()
                .context("serialize starter spec")?;
            std::fs::write(&path, yaml).with_context(|| format!("write {}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_spec(path: &Path) -> anyhow::Result<ToolSpec> {
    ToolSpec::load(path).with_context(|| format!("load tool spec {}", path.display()))
}

fn write_artifacts(dir: &Path, artifacts: &ToolArtifacts) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;

    let files = [
        (&artifacts.descriptor_file_name, &artifacts.descriptor_json),
        (&artifacts.handler_file_name, &artifacts.handler_source),
    ];
    for (name, contents) in files {
        let path = dir.join(name);
        std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), bytes = contents.len(), "wrote artifact");
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn print_artifacts(artifacts: &ToolArtifacts) {
    println!("==> {} <==", artifacts.descriptor_file_name);
    print!("{}", artifacts.descriptor_json);
    println!();
    println!("==> {} <==", artifacts.handler_file_name);
    print!("{}", artifacts.handler_source);
}

fn starter_spec() -> ToolSpec {
    ToolSpec::new(
        "getPokemonByName",
        "Get information about a Pokemon by its name",
        "https://pokeapi.co/api/v2/pokemon/{name}",
    )
    .with_parameter(
        Parameter::new("name", ParamType::String)
            .required(true)
            .description("Pokemon name or ID"),
    )
}

/// Colors issue labels when stderr is a terminal and `NO_COLOR` is unset.
struct Painter {
    color: bool,
}

impl Painter {
    fn detect() -> Self {
        Self {
            color: std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    fn print_issues(&self, errors: &[ValidationIssue], warnings: &[ValidationIssue]) {
        for e in errors {
            let label = if self.color {
                "error".red().bold().to_string()
            } else {
                "error".to_string()
            };
            eprintln!("{label}[{}]: {}", e.kind, e.message);
        }
        for w in warnings {
            let label = if self.color {
                "warning".yellow().bold().to_string()
            } else {
                "warning".to_string()
            };
            eprintln!("{label}[{}]: {}", w.kind, w.message);
        }
    }
}
