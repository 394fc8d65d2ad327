//! Tierforge: tier list images from a podcast feed and a ranked-list doc.
//!
//! Tierforge correlates a canonical ranked list of games against the
//! episodes a podcast has actually released, resolves a header image for
//! every matched game (Steam lookup with a flat on-disk cache and a
//! synthetic placeholder fallback), and composes the result into a single
//! TierMaker-style PNG.
//!
//! # Modules
//!
//! - [`tier`]: ranked-list model (tiers, ordering, filtering)
//! - [`matcher`]: fuzzy correlation between ranked and released names
//! - [`episodes`]: feed reading and released-name extraction
//! - [`document`]: ranked-list document sources and parsing
//! - [`resolve`]: image resolution (cache, lookup, fetch, placeholder)
//! - [`render`]: canvas geometry and composition
//! - [`pipeline`]: orchestration and halt conditions
//! - [`error`]: error types for tierforge operations

pub mod document;
pub mod episodes;
pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod tier;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::TierforgeError;

use document::source_for;
use episodes::RssFeed;
use pipeline::{run_render, run_update, PipelineOptions, RunSummary};
use render::layout::LayoutSpec;
use resolve::cache::ImageCache;
use resolve::fetch::SteamCdnFetch;
use resolve::lookup::SteamStoreSearch;
use resolve::ImageResolver;

const DEFAULT_FEED_URL: &str = "https://feeds.acast.com/public/shows/roguepod-litecast";

/// The tierforge CLI application.
#[derive(Parser)]
#[command(name = "tierforge")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output with detailed matching and caching logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Update the tier list image from the feed and the ranked-list doc.
    Update(UpdateArgs),
    /// Render a ranked-list document directly, without correlation.
    Render(RenderArgs),
}

/// Arguments for the update subcommand.
#[derive(clap::Args)]
struct UpdateArgs {
    /// Podcast RSS feed URL.
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// Ranked-list document: a local path or an http(s) URL.
    #[arg(long, default_value = "tierlist.txt")]
    doc: String,

    /// Output path for the tier list image.
    #[arg(long, default_value = "tierlist.png")]
    output: PathBuf,

    /// Directory for the identifier and image cache.
    #[arg(long, default_value = "steam_images")]
    cache_dir: PathBuf,

    /// Save intermediate matching artifacts to the debug/ directory.
    #[arg(long)]
    debug: bool,

    /// Run without generating the final image (for testing).
    #[arg(long)]
    dry_run: bool,

    /// Bearer token file used when the document source is an HTTP URL.
    #[arg(long)]
    credentials: Option<PathBuf>,
}

/// Arguments for the render subcommand.
#[derive(clap::Args)]
struct RenderArgs {
    /// Ranked-list document: a local path or an http(s) URL.
    doc: String,

    /// Output path for the tier list image.
    #[arg(long, default_value = "tierlist.png")]
    output: PathBuf,

    /// Directory for the identifier and image cache.
    #[arg(long, default_value = "steam_images")]
    cache_dir: PathBuf,

    /// Parse the document and report, but skip resolution and rendering.
    #[arg(long)]
    dry_run: bool,
}

/// Run the tierforge CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), TierforgeError> {
    let cli = Cli::parse();

    let mut builder = colog::default_builder();
    builder.filter(
        None,
        if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
    );
    builder.init();

    match cli.command {
        Some(Commands::Update(args)) => run_update_command(args),
        Some(Commands::Render(args)) => run_render_command(args),
        None => {
            println!("tierforge {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Tier list image generator.");
            println!();
            println!("Run 'tierforge --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the update subcommand.
fn run_update_command(args: UpdateArgs) -> Result<(), TierforgeError> {
    let feed = RssFeed::new(&args.feed_url);
    let document = source_for(&args.doc, args.credentials.as_deref())?;
    let mut resolver = build_resolver(&args.cache_dir)?;

    let options = PipelineOptions {
        output: args.output,
        debug_dir: args.debug.then(|| PathBuf::from("debug")),
        dry_run: args.dry_run,
    };

    let summary = run_update(
        &feed,
        document.as_ref(),
        &mut resolver,
        &LayoutSpec::default(),
        &options,
    )?;
    report(&summary);
    Ok(())
}

/// Execute the render subcommand.
fn run_render_command(args: RenderArgs) -> Result<(), TierforgeError> {
    let document = source_for(&args.doc, None)?;
    let mut resolver = build_resolver(&args.cache_dir)?;

    let options = PipelineOptions {
        output: args.output,
        debug_dir: None,
        dry_run: args.dry_run,
    };

    let summary = run_render(
        document.as_ref(),
        &mut resolver,
        &LayoutSpec::default(),
        &options,
    )?;
    report(&summary);
    Ok(())
}

fn build_resolver(
    cache_dir: &std::path::Path,
) -> Result<ImageResolver<SteamStoreSearch, SteamCdnFetch>, TierforgeError> {
    let cache = ImageCache::open(cache_dir)?;
    Ok(ImageResolver::new(
        cache,
        SteamStoreSearch::default(),
        SteamCdnFetch::default(),
    ))
}

fn report(summary: &RunSummary) {
    match &summary.output {
        Some(path) => println!(
            "Rendered {}/{} games to {}",
            summary.rendered_count,
            summary.total_count,
            path.display()
        ),
        None => println!(
            "Dry run: {}/{} games would be rendered",
            summary.rendered_count, summary.total_count
        ),
    }
}
