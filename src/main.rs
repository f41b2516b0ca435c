use clap::{Parser, Subcommand};
use docmd::{config, emit, output, registry, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docmd")]
#[command(about = "Static documentation site generator for Markdown in source trees")]
#[command(long_about = "\
Static documentation site generator for Markdown in source trees

Point docmd at one or more source-code projects and it collects every
Markdown file into a single navigable static site: one HTML page per file,
an index page for every documented directory, and a sidebar with working
relative links from any depth.

Example docmd.toml:

  output_dir = \"docs\"
  exclude_paths = [\".git\", \".hg\"]

  [[projects]]
  path = \"backend/src\"
  name = \"backend\"
  excludes = [\"backend/src/vendor\"]

  [[projects]]
  path = \"frontend/src\"
  name = \"frontend\"

Exclusions are literal paths: a rule excludes a file when it equals the
file's path or one of its ancestor directories.

Run 'docmd gen-config' to print a documented docmd.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "docmd.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan projects and print the discovered page structure
    Scan {
        /// Also write the scan manifest as JSON
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Run the full pipeline: scan → registry → HTML site
    Build,
    /// Validate config and sources without writing anything
    Check,
    /// Print a stock docmd.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { manifest } => {
            let config = config::load_config(&cli.config)?;
            let result = scan::scan(&config.projects, &config.exclude_paths)?;
            let registry = registry::build(&config.projects, &result)?;
            if let Some(path) = manifest {
                let json = serde_json::json!({
                    "files": result.files,
                    "folders": result.folders,
                    "registry": registry,
                });
                std::fs::write(&path, serde_json::to_string_pretty(&json)?)?;
                println!("Wrote {}", path.display());
            }
            output::print_scan_output(&config.projects, &result);
            output::print_registry_output(&registry);
        }
        Command::Build => {
            let config = config::load_config(&cli.config)?;
            println!("==> Scanning {}", count_projects(&config));
            let result = scan::scan(&config.projects, &config.exclude_paths)?;
            if result.files.is_empty() {
                println!("Sources folders empty.");
                return Ok(());
            }
            output::print_scan_output(&config.projects, &result);

            let registry = registry::build(&config.projects, &result)?;

            println!(
                "==> Generating HTML → {}",
                config.effective_output_dir().display()
            );
            let summary = emit::emit(&config, &result, &registry, Path::new("."))?;
            output::print_emit_output(&summary);
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            println!("==> Checking {}", count_projects(&config));
            let result = scan::scan(&config.projects, &config.exclude_paths)?;
            let registry = registry::build(&config.projects, &result)?;
            output::print_scan_output(&config.projects, &result);
            output::print_registry_output(&registry);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn count_projects(config: &config::SiteConfig) -> String {
    let n = config.projects.len();
    if n == 1 {
        format!("1 project ({})", config.projects[0].name)
    } else {
        format!("{n} projects")
    }
}
