use clap::{Parser, Subcommand, ValueEnum};
use gallery_check::{check, config, output, scaffold, sweep};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "gallery-check")]
#[command(about = "Structure and link checker for a static HTML image gallery")]
#[command(long_about = "\
Structure and link checker for a static HTML image gallery

Expected site layout:

  site/
  ├── gallery-check.toml           # Optional overrides (see gen-config)
  ├── index.html                   # Main page: nav, four cards, Details links
  ├── pages/
  │   ├── nature.html              # Detail pages, chained Prev/Next:
  │   ├── space.html               #   Space → Modern Design → Plants → Nature
  │   ├── plants.html
  │   └── modern-design.html
  ├── css/…                        # layout.css first, then image-lists.css
  │                                #   or …/secondary/image-details.css
  └── js/scripts.js                # loaded with <script defer>

Links may be written root-relative (pages/plants.html) or page-relative
(plants.html); leading ../ ./ . and / are ignored when comparing.

Run 'gallery-check scaffold --output site' for a site that passes every check.")]
#[command(version = version_string())]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log check-by-check progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the main page and the four detail pages against the site contract
    Check {
        /// Report format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Find broken local links across every HTML file under the root
    Sweep,
    /// Write a skeleton site that passes every check
    Scaffold {
        /// Directory to write the site into
        #[arg(long, default_value = "site")]
        output: PathBuf,
    },
    /// Print a stock gallery-check.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check { format } => {
            let site_config = config::load_config(&cli.root)?;
            let report = check::check_site(&cli.root, &site_config);
            match format {
                Format::Text => output::print_site_report(&report),
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(exit_status(report.is_ok()))
        }
        Command::Sweep => {
            let report = sweep::sweep(&cli.root)?;
            output::print_sweep_report(&report);
            Ok(exit_status(report.is_ok()))
        }
        Command::Scaffold { output: out_dir } => {
            let site_config = config::load_config(&cli.root)?;
            let summary = scaffold::scaffold(&out_dir, &site_config)?;
            output::print_scaffold_output(&summary, &out_dir);
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Send logs to stderr so report output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "gallery_check=debug" } else { "gallery_check=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_status(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
