//! svecl command-line tool
//!
//! Resolves bare specifiers through an import map and compiles Svelte
//! components, using the same hooks a bundler would register.

mod commands;
mod config;
mod output;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use commands::compile::CompileArgs;
use config::{Config, Overrides, ENV_IMPORT_MAP, ENV_LOG};
use output::StyledOutput;
use std::path::PathBuf;
use std::sync::Arc;
use svecl_plugin::{LoadHook, PluginBuild, ResolveHook};
use svecl_svelte::ComponentCompiler;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svecl")]
#[command(about = "Import-map resolution and Svelte compilation for bundlers", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Import map used to resolve bare specifiers
    #[arg(long, global = true, value_name = "FILE")]
    import_map: Option<PathBuf>,

    /// Directory containing an external compiler.js
    #[arg(long, global = true, value_name = "DIR")]
    svelte: Option<PathBuf>,

    /// Number of compilers to run in parallel (0 = one per CPU core)
    #[arg(long, global = true, value_name = "N")]
    threads: Option<usize>,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    color: String,

    /// Print the tool and compiler versions
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve module specifiers through the import map
    Resolve {
        /// Specifiers to resolve
        #[arg(required = true)]
        specifiers: Vec<String>,
    },

    /// Compile Svelte components to JavaScript
    Compile {
        /// Component files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write `<name>.js` files here instead of printing them
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env()?.with_overrides(Overrides {
        threads: cli.threads,
        svelte_dir: cli.svelte.clone(),
        import_map: cli.import_map.clone(),
    });
    tracing::debug!(?config, "configuration");

    if cli.version {
        let version = ComponentCompiler::new(&config.compiler_source())?.version()?;
        println!("svecl {} (Svelte {})", env!("CARGO_PKG_VERSION"), version);
        return Ok(());
    }

    let mut out = StyledOutput::new(output::resolve_color_choice(Some(&cli.color)));

    let failures = match cli.command {
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }

        Some(Commands::Resolve { specifiers }) => {
            let import_map = config.import_map.as_deref().with_context(|| {
                format!("No import map given; pass --import-map or set {}", ENV_IMPORT_MAP)
            })?;

            let mut build = PluginBuild::new();
            build.on_resolve(Arc::new(ResolveHook::from_file(import_map)?))?;

            commands::resolve::execute(&build, &specifiers, &mut out)?
        }

        Some(Commands::Compile { files, out_dir }) => {
            let load = Arc::new(LoadHook::start(config.pool_size(), config.compiler_source())?);
            let workers = load.pool().capacity();
            let mut build = PluginBuild::new();
            build.on_load(load)?;

            let args = CompileArgs { files, out_dir, workers };
            commands::compile::execute(&build, &args, &mut out)?
        }
    };

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
