use clap::{Parser, Subcommand};
use folio::{config, generate, output, pipeline};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for a personal blog and portfolio")]
#[command(long_about = "\
Static site generator for a personal blog and portfolio

Markdown and MDX files under the content directory become posts, project
entries and site pages. The first directory level decides what a file is.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── posts/
  │   ├── hello-world/index.mdx    # → /hello-world/
  │   └── notes/rust-tips.md       # → /notes/rust-tips/
  ├── articles/                    # Older long-form writing, also routed
  ├── projects/
  │   └── folio.md                 # Entry on /projects/ (title, link, maintained)
  └── pages/
      ├── home/index.md            # header/subheader for the home page
      ├── projects/index.md        # header/subheader for /projects/
      └── about.md                 # → /about/

Front matter is YAML between `---` lines:

  title, date, tags, description, link, maintained, header, subheader, draft

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".folio-temp", global = true)]
    temp_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a manifest
    Scan,
    /// List the routes every post and article will be published at
    Routes,
    /// Run the full pipeline and write the HTML site
    Build,
    /// Validate content and routes without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Scan => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let site = pipeline::build_site(&cli.source, &site_config)?;
            write_manifest(&site, &cli.temp_dir)?;
            output::print_scan_output(&site.index);
        }
        Command::Routes => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let site = pipeline::build_site(&cli.source, &site_config)?;
            output::print_routes_output(&site);
        }
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let site = pipeline::build_site(&cli.source, &site_config)?;
            write_manifest(&site, &cli.temp_dir)?;
            output::print_scan_output(&site.index);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate(&site, &cli.output, &site_config)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            init_thread_pool(&site_config.processing);
            let site = pipeline::check_site(&cli.source, &site_config)?;
            output::print_scan_output(&site.index);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays the command's report.
fn init_logging(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. Users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn write_manifest(site: &pipeline::Site, temp_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(site)?;
    std::fs::write(&manifest_path, json)?;
    tracing::debug!(path = %manifest_path.display(), "manifest written");
    Ok(())
}
