use clap::Parser;
use dir_gallery::config::{self, GalleryConfig};
use dir_gallery::imaging::{RustBackend, ThumbnailSpec};
use dir_gallery::output;
use dir_gallery::pipeline::{self, BuildOptions};
use dir_gallery::pool::CancelFlag;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

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
#[command(name = "dir-gallery")]
#[command(about = "Turn a directory tree of images into a static HTML gallery")]
#[command(long_about = "\
Turn a directory tree of images into a static HTML gallery

Every directory becomes an index.html page. Every file gets a small and a
large JPEG thumbnail next to its page in the destination tree:

  photos/                    html/
  ├── a.jpg            →     ├── index.html
  └── sub/                   ├── a.jpg.small.jpg
      └── b.jpg              ├── a.jpg.large.jpg
                             ├── static/
                             └── sub/
                                 ├── index.html
                                 ├── b.jpg.small.jpg
                                 └── b.jpg.large.jpg

Thumbnails that already exist are not rebuilt. Pages are rewritten on every
run. Files that cannot be decoded get a placeholder image.

Run 'dir-gallery --print-config' to print a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Directory tree to publish
    #[arg(required_unless_present = "print_config")]
    source: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "./html/")]
    destination: PathBuf,

    /// Absolute URL of the static assets (default: relative path per page)
    #[arg(long = "static", value_name = "URL")]
    static_url: Option<String>,

    /// Base URL of the published originals; items link there when set
    #[arg(long = "original", value_name = "URL")]
    original: Option<String>,

    /// Number of parallel thumbnail workers [default: 8]
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Page title prefix [default: Gallery]
    #[arg(long)]
    title: Option<String>,

    /// Directory mirrored into <destination>/static [default: ./static/]
    #[arg(long)]
    assets: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image used in place of thumbnails that cannot be generated
    #[arg(long)]
    placeholder: Option<PathBuf>,

    /// Also write the directory tree as JSON to this file
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a stock config file with all options documented, then exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    setup_logging(cli.verbose);

    let gallery_config = config::load_config(cli.config.as_deref())?;
    let Some(options) = build_options(cli, &gallery_config) else {
        return Err("a source directory is required".into());
    };

    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, finishing running thumbnails...");
        handler_flag.cancel();
    })?;

    println!(
        "==> Building {} → {}",
        options.source.display(),
        options.destination.display()
    );

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = pipeline::run(&options, &RustBackend::new(), &cancel, Some(tx));
    printer.join().map_err(|_| "progress printer panicked")?;
    let report = result?;

    output::print_build_summary(&report);
    println!("==> Gallery written to {}", options.destination.display());
    Ok(())
}

/// Merge command-line flags over the loaded config.
fn build_options(cli: Cli, config: &GalleryConfig) -> Option<BuildOptions> {
    let mut options = BuildOptions::new(cli.source?, cli.destination);
    options.assets = cli
        .assets
        .unwrap_or_else(|| PathBuf::from(&config.paths.assets));
    options.static_url = cli.static_url.or_else(|| config.site.static_url.clone());
    options.original_base = cli.original.or_else(|| config.site.original_url.clone());
    options.title = Some(cli.title.unwrap_or_else(|| config.site.title.clone()));
    options.jobs = cli.jobs.unwrap_or(config.processing.jobs).max(1);
    options.thumbnails = ThumbnailSpec::from_config(&config.thumbnails);
    options.placeholder = cli
        .placeholder
        .or_else(|| config.paths.placeholder.as_ref().map(PathBuf::from));
    options.manifest = cli.manifest;
    Some(options)
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dir_gallery=debug,warn")
    } else {
        EnvFilter::new("dir_gallery=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
