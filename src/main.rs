use clap::{ArgAction, Parser, Subcommand};
use go_depgraph::{Analyzer, Config, Emitter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "go-depgraph")]
#[command(about = "Render the package dependency graph of a Go source tree as Graphviz DOT")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a project and print its dependency graph
    Graph {
        /// Project root to scan (defaults to the config's target_directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the graph to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,

        /// Keep only imports under the root module path
        #[arg(long)]
        internal_only: bool,

        /// Maximum non-comment lines read per source file
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        line_budget: Option<u64>,

        /// Scan files one at a time
        #[arg(long)]
        sequential: bool,
    },
    /// Generate a documented configuration file
    Config {
        /// Output path for the config file (defaults to ~/.go-depgraph.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Dot,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Graph {
            path,
            config,
            output,
            format,
            internal_only,
            line_budget,
            sequential,
        } => {
            let mut config = match config {
                Some(config_path) => Config::from_file(&config_path)?,
                None => Config::load()?,
            };
            let overrides = Overrides {
                path,
                internal_only,
                line_budget,
                sequential,
            };
            overrides.apply(&mut config)?;
            render_graph(config, output, format)?;
        }
        Commands::Config { output } => {
            generate_config(output)?;
        }
    }

    Ok(())
}

/// Flags that override the loaded config for a single run.
struct Overrides {
    path: Option<PathBuf>,
    internal_only: bool,
    line_budget: Option<u64>,
    sequential: bool,
}

impl Overrides {
    fn apply(self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(path) = self.path {
            config.target_directory = path;
        }
        config.internal_only |= self.internal_only;
        if let Some(budget) = self.line_budget {
            config.source_line_budget = usize::try_from(budget)?;
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(())
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_graph(
    config: Config,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let start_time = Instant::now();

    let emitter = Emitter::new(config.graph.clone());
    let analyzer = Analyzer::new(config)?;
    let project = analyzer.run()?;

    // Render fully before writing so a failure never leaves partial output.
    let rendered = match format {
        OutputFormat::Dot => emitter.emit_dot(&project.graph),
        OutputFormat::Json => emitter.emit_json(&project)?,
    };
    emitter.write_output(&rendered, output.as_deref())?;

    info!(
        elapsed = %format!("{:.2}s", start_time.elapsed().as_secs_f64()),
        "graph written"
    );
    Ok(())
}

fn generate_config(output_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = match output_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    std::fs::write(&config_path, Config::create_documented_config())?;
    eprintln!("Configuration written to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_overrides(args: &[&str]) -> Overrides {
        let cli = Cli::try_parse_from(["go-depgraph", "graph"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Graph {
                path,
                internal_only,
                line_budget,
                sequential,
                ..
            } => Overrides {
                path,
                internal_only,
                line_budget,
                sequential,
            },
            Commands::Config { .. } => panic!("expected the graph subcommand"),
        }
    }

    #[test]
    fn config_target_directory_survives_without_path_flag() {
        let mut config = Config {
            target_directory: PathBuf::from("/srv/project"),
            ..Config::default()
        };
        graph_overrides(&[]).apply(&mut config).unwrap();
        assert_eq!(config.target_directory, PathBuf::from("/srv/project"));
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        graph_overrides(&["-p", "src", "--line-budget", "25", "--sequential", "--internal-only"])
            .apply(&mut config)
            .unwrap();
        assert_eq!(config.target_directory, PathBuf::from("src"));
        assert_eq!(config.source_line_budget, 25);
        assert!(!config.parallel);
        assert!(config.internal_only);
    }

    #[test]
    fn zero_line_budget_is_rejected() {
        assert!(Cli::try_parse_from(["go-depgraph", "graph", "--line-budget", "0"]).is_err());
    }
}
