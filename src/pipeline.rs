//! Orchestration of the full update run.
//!
//! Feed → name extraction → ranked-list document → correlation → filtering
//! → resolution + rendering → PNG. Any of the fatal conditions (empty feed,
//! nothing extracted, unparseable document, zero matches) halts the run
//! before the layout engine is ever invoked; no partial image is written.

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::document::{DocumentSource, TierListParser};
use crate::episodes::{EpisodeFeed, NameExtractor};
use crate::error::TierforgeError;
use crate::matcher::{correlate, MatchResult};
use crate::render::layout::LayoutSpec;
use crate::render::{render, ResolveImage};
use crate::tier::{all_games, filter_to_matched, total_games, RankedList};

/// Options shared by the update and render runs.
pub struct PipelineOptions {
    /// Where the composed PNG is written.
    pub output: PathBuf,
    /// When set, intermediate matching artifacts are dumped here.
    pub debug_dir: Option<PathBuf>,
    /// Stop before resolving images and rendering.
    pub dry_run: bool,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Released names extracted from the feed (zero for plain renders).
    pub released_count: usize,
    /// Games that survived into the rendered list.
    pub rendered_count: usize,
    /// Games in the full ranked list.
    pub total_count: usize,
    /// Path of the written image, `None` on dry runs.
    pub output: Option<PathBuf>,
}

/// Run the full correlation pipeline.
pub fn run_update(
    feed: &dyn EpisodeFeed,
    document: &dyn DocumentSource,
    resolver: &mut dyn ResolveImage,
    spec: &LayoutSpec,
    options: &PipelineOptions,
) -> Result<RunSummary, TierforgeError> {
    log::info!("starting tier list update");

    let episodes = feed.episodes();
    if episodes.is_empty() {
        return Err(TierforgeError::EmptyFeed {
            url: feed.describe(),
        });
    }

    let extractor = NameExtractor::new();
    let released = extractor.extract_all(&episodes);
    log::info!("extracted {} game names from episodes", released.len());
    if released.is_empty() {
        return Err(TierforgeError::NoGameNames {
            episode_count: episodes.len(),
        });
    }

    let full_list = fetch_ranked_list(document)?;

    let candidates = all_games(&full_list);
    let (matched, details) = correlate(&candidates, &released);
    log::info!(
        "matched {} games from tier list with released episodes",
        matched.len()
    );

    if let Some(debug_dir) = &options.debug_dir {
        dump_debug(debug_dir, &released, &details)?;
    }

    let filtered = filter_to_matched(&full_list, &matched);
    if filtered.is_empty() {
        return Err(TierforgeError::NoMatches {
            candidate_count: candidates.len(),
            reference_count: released.len(),
        });
    }

    let total = total_games(&full_list);
    let rendered = total_games(&filtered);
    log::info!("filtered tier list: {rendered}/{total} games have released episodes");
    for (tier, games) in &filtered {
        log::info!("  {tier} Tier: {}", games.join(", "));
    }

    let output = finish(&filtered, resolver, spec, options)?;
    Ok(RunSummary {
        released_count: released.len(),
        rendered_count: rendered,
        total_count: total,
        output,
    })
}

/// Render a ranked-list document directly, without correlation.
pub fn run_render(
    document: &dyn DocumentSource,
    resolver: &mut dyn ResolveImage,
    spec: &LayoutSpec,
    options: &PipelineOptions,
) -> Result<RunSummary, TierforgeError> {
    let list = fetch_ranked_list(document)?;
    let total = total_games(&list);

    let output = finish(&list, resolver, spec, options)?;
    Ok(RunSummary {
        released_count: 0,
        rendered_count: total,
        total_count: total,
        output,
    })
}

fn fetch_ranked_list(document: &dyn DocumentSource) -> Result<RankedList, TierforgeError> {
    let content = document.fetch_text()?;
    let list = TierListParser::new().parse(&content);
    if list.is_empty() {
        return Err(TierforgeError::NoTiersParsed {
            origin: document.describe(),
        });
    }
    log::info!(
        "parsed tier list with {} tiers and {} total games",
        list.len(),
        total_games(&list)
    );
    Ok(list)
}

/// Render and save, or stop early on a dry run.
fn finish(
    list: &RankedList,
    resolver: &mut dyn ResolveImage,
    spec: &LayoutSpec,
    options: &PipelineOptions,
) -> Result<Option<PathBuf>, TierforgeError> {
    if options.dry_run {
        log::info!("dry run, skipping image generation");
        return Ok(None);
    }

    let canvas = render(list, resolver, spec);

    if let Some(parent) = options.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    DynamicImage::ImageRgb8(canvas)
        .save_with_format(&options.output, image::ImageFormat::Png)
        .map_err(|error| TierforgeError::ImageWrite {
            path: options.output.clone(),
            message: error.to_string(),
        })?;

    log::info!("tier list saved as {}", options.output.display());
    Ok(Some(options.output.clone()))
}

/// Write the matching artifacts for offline inspection.
fn dump_debug(
    debug_dir: &Path,
    released: &[String],
    details: &[MatchResult],
) -> Result<(), TierforgeError> {
    fs::create_dir_all(debug_dir)?;

    let released_path = debug_dir.join("released_games.json");
    let text = serde_json::to_string_pretty(released).map_err(|source| {
        TierforgeError::DebugWrite {
            path: released_path.clone(),
            source,
        }
    })?;
    fs::write(&released_path, text)?;

    let details_path = debug_dir.join("match_details.json");
    let text = serde_json::to_string_pretty(details).map_err(|source| {
        TierforgeError::DebugWrite {
            path: details_path.clone(),
            source,
        }
    })?;
    fs::write(&details_path, text)?;

    log::info!("debug information saved to {}", debug_dir.display());
    Ok(())
}
