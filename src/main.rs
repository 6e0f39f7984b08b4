use clap::{Parser, Subcommand};
use folio::reveal::RevealTiming;
use folio::scan::Manifest;
use folio::session::{Input, Session};
use folio::{config, generate, output, scan};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for typewriter-style portfolio sites")]
#[command(long_about = "\
Static site generator for typewriter-style portfolio sites

A short bio where phrases open into nested detail, revealed one character at
a time. Every open state is pre-rendered as its own page, so the site works
without JavaScript and every state can be linked to.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── portfolio.toml               # Profile, bio tree, history, projects, contact
  ├── galleries.toml               # Fan galleries referenced from the bio (optional)
  ├── pages/
  │   ├── 010-local-minima.toml    # Content page (NNN- prefix sets order)
  │   └── 020-productivity-ai.toml
  └── assets/                      # Images, video, fonts → copied to dist/assets/

URLs:
  /                                # Everything collapsed
  /bio/bio-section-1/              # One snapshot per reachable open state
  /bio/bio-section-1/personal-interests/
  /local-minima/                   # Content pages by slug

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = env!("FOLIO_VERSION"))]
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

    /// Log pipeline details (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the final HTML site from the scanned manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content and report broken references
    Check,
    /// Replay the bio reveal in the terminal
    Preview(PreviewArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// Keys to open in order, e.g. bio-section-1/personal-interests
    #[arg(long)]
    path: Option<String>,

    /// Skip the animation and print the settled frame
    #[arg(long)]
    instant: bool,

    /// Read commands from stdin: open <depth> <key>, esc, click, quit
    #[arg(long)]
    interactive: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest = generate::load_manifest(&cli.temp_dir.join("manifest.json"))?;
            let report = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest, &report);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            let report = generate::generate_site(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest, &report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_check_output(&manifest.diagnostics);
            println!("==> Content is valid");
        }
        Command::Preview(args) => preview(&cli.source, &args)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

fn write_manifest(manifest: &Manifest, temp_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    Ok(())
}

fn preview(source: &Path, args: &PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = scan::scan(source)?;
    let timing = RevealTiming::from_config(&manifest.config.typewriter);
    let mut session = Session::new(&manifest.portfolio, timing);

    if let Some(path) = &args.path {
        let keys: Vec<&str> = path.split('/').filter(|k| !k.is_empty()).collect();
        session = session.with_path(&keys);
    }
    play(&mut session, &manifest, args.instant)?;

    if !args.interactive {
        return Ok(());
    }
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "q" {
            break;
        }
        match line.parse::<Input>() {
            Ok(input) => {
                if session.apply(input) {
                    play(&mut session, &manifest, args.instant)?;
                } else {
                    println!("(ignored)");
                }
            }
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}

/// Run the session until it settles, redrawing after every tick.
fn play(session: &mut Session, manifest: &Manifest, instant: bool) -> std::io::Result<()> {
    if instant {
        session.finish();
        output::print_frame(session, &manifest.portfolio, &manifest.galleries);
        return std::io::stdout().flush();
    }
    loop {
        print!("\x1b[2J\x1b[H");
        output::print_frame(session, &manifest.portfolio, &manifest.galleries);
        std::io::stdout().flush()?;
        let Some(wait) = session.next_deadline() else {
            return Ok(());
        };
        std::thread::sleep(wait);
        session.tick(wait);
    }
}
