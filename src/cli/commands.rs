//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::catalog::matcher::{find_version, VersionMatch};
use crate::catalog::model::{Catalog, Season, Version};
use crate::cli::progress::{
    print_error, print_header, print_info, print_success, print_warning, HashingProgress,
};
use crate::cli::{Args, Commands};
use crate::core::config::{get_config_path, init_config, open_config_in_editor, Config};
use crate::core::scan::collect_video_files;
use crate::duplicate::detector::find_duplicates;
use crate::hashing::engine::HashingEngine;
use crate::hashing::kind;
use crate::hashing::perceptual::PerceptualHasher;
use crate::hashing::content;
use crate::index::HashIndex;
use anyhow::Result;
use dialoguer::Confirm;
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Dispatch the parsed command line to its handler
pub fn run_command(args: &Args, config: &Config, shutdown_flag: Arc<AtomicBool>) -> Result<()> {
    match &args.command {
        Some(Commands::Config { path, reset }) => {
            handle_config_command(*path, *reset)?;
        }
        Some(Commands::GenerateConfig { output }) => {
            generate_config_file(output.clone())?;
        }
        Some(Commands::ShowConfig) => {
            show_config(config);
        }
        Some(Commands::Index {
            skip_perceptual,
            recompute,
        }) => {
            index_collection(config, &shutdown_flag, *skip_perceptual, recompute.as_deref())?;
        }
        Some(Commands::Report) => {
            report_collection(config)?;
        }
        Some(Commands::Rename { yes }) => {
            rename_collection(config, *yes)?;
        }
        Some(Commands::Duplicates { threshold }) => {
            find_duplicate_files(config, *threshold)?;
        }
        None => {
            // Default run: refresh the index, then report
            index_collection(config, &shutdown_flag, false, None)?;
            if !shutdown_flag.load(Ordering::SeqCst) {
                report_collection(config)?;
            }
        }
    }

    Ok(())
}

// ============================================================================
// Index command
// ============================================================================

/// Bring the hash index up to date for the whole collection
pub fn index_collection(
    config: &Config,
    shutdown: &Arc<AtomicBool>,
    skip_perceptual: bool,
    recompute: Option<&str>,
) -> Result<()> {
    print_header("Index Collection");

    let files = collect_video_files(&config.collection);
    print_info(&format!(
        "{} video file(s) under {}",
        files.len(),
        config.collection.root.display()
    ));

    let mut index = HashIndex::new(config.index_path());
    index.load();

    if let Some(kind) = recompute {
        let cleared = index.clear_kind(kind);
        if cleared > 0 {
            print_info(&format!(
                "Cleared {} stored '{}' hash(es) for recomputation",
                cleared, kind
            ));
        }
    }

    // Drop stale entries before hashing so regenerated files are re-seen
    let pruned = index.prune_missing();
    if pruned > 0 {
        print_info(&format!("Pruned {} stale index entries", pruned));
    }

    let workers = config.hashing.workers;

    let content_fn = content::content_hash_fn;
    let engine = HashingEngine::new(&index, kind::CONTENT, &files, &content_fn, workers);
    run_engine(&engine, &mut index, shutdown, kind::CONTENT);

    if shutdown.load(Ordering::SeqCst) {
        index.persist()?;
        print_warning("Interrupted - partial progress saved");
        return Ok(());
    }

    if config.hashing.perceptual_enabled && !skip_perceptual {
        let hasher = PerceptualHasher::new(config.hashing.frame_interval_secs);
        let perceptual_fn = |path: &Path| hasher.hash_fn(path);
        let engine = HashingEngine::new(&index, kind::PERCEPTUAL, &files, &perceptual_fn, workers);
        run_engine(&engine, &mut index, shutdown, kind::PERCEPTUAL);
    }

    index.persist()?;

    if shutdown.load(Ordering::SeqCst) {
        print_warning("Interrupted - partial progress saved");
    } else {
        print_success(&format!("Index holds {} file(s)", index.len()));
    }

    Ok(())
}

/// Run one engine pass with a progress bar
fn run_engine(
    engine: &HashingEngine<'_>,
    index: &mut HashIndex,
    shutdown: &AtomicBool,
    kind: &str,
) -> usize {
    if engine.pending() == 0 {
        print_info(&format!("All '{}' hashes are up to date", kind));
        return 0;
    }

    let bar = HashingProgress::new(kind, engine.pending() as u64);
    let written = engine.run_with_progress(index, shutdown, |done, _| bar.update(done));

    if shutdown.load(Ordering::SeqCst) {
        bar.abandon();
    } else {
        bar.finish();
    }

    written
}

// ============================================================================
// Report command
// ============================================================================

/// Report found/missing status of every catalog item
pub fn report_collection(config: &Config) -> Result<()> {
    print_header("Collection Report");

    let mut index = HashIndex::new(config.index_path());
    index.load();
    if index.is_empty() {
        print_warning("Index is empty - run `video-organizer index` first");
    }

    let catalog = match Catalog::load(&config.catalog.path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            print_error(&format!(
                "No usable catalog at {}",
                config.catalog.path.display()
            ));
            return Ok(());
        }
    };

    let mut totals = ReportTotals::default();

    for season in &catalog.seasons {
        report_season(&index, season, &mut totals);
    }

    for group in &catalog.other_groups {
        println!("\n  {}", group.name);
        println!("  {}", "─".repeat(40));
        for video in &group.videos {
            report_item(&index, &video.name, &video.versions, &mut totals);
        }
    }

    println!();
    if totals.total == 0 {
        print_warning("Catalog lists no items");
    } else {
        print_info(&format!("Items found: {}/{}", totals.found, totals.total));
        print_info(&format!(
            "Completion: {:.1}%",
            100.0 * totals.found as f64 / totals.total as f64
        ));
    }

    Ok(())
}

/// Running found/missing counters for the report
#[derive(Default)]
struct ReportTotals {
    total: usize,
    found: usize,
}

/// Report one season: episodes, then finale, then mid-season finale
fn report_season(index: &HashIndex, season: &Season, totals: &mut ReportTotals) {
    if season.name.is_empty() {
        println!("\n  Season {}", season.number);
    } else {
        println!("\n  Season {} - {}", season.number, season.name);
    }
    println!("  {}", "─".repeat(40));

    let season_before = totals.found;
    let mut season_total = 0;

    for episode in &season.episodes {
        let label = format!("E{} {}", episode.display_number(), episode.name);
        report_item(index, &label, &episode.versions, totals);
        season_total += 1;
    }

    if let Some(finale) = &season.finale {
        report_item(index, &format!("Finale: {}", finale.name), &finale.versions, totals);
        season_total += 1;
    }

    if let Some(msf) = &season.mid_season_finale {
        report_item(
            index,
            &format!("Mid-season finale: {}", msf.name),
            &msf.versions,
            totals,
        );
        season_total += 1;
    }

    println!(
        "  Season {}: found {}/{}",
        season.number,
        totals.found - season_before,
        season_total
    );
}

/// Report a single catalog item against the index
fn report_item(index: &HashIndex, label: &str, versions: &[Version], totals: &mut ReportTotals) {
    totals.total += 1;

    if versions.iter().all(|v| v.hashes.is_empty()) {
        print_warning(&format!("'{}' - no hashes in catalog", label));
        return;
    }

    match locate_any(index, versions) {
        Some(path) => {
            totals.found += 1;
            print_success(&format!("'{}' - found at '{}'", label, path.display()));
        }
        None => {
            print_error(&format!("'{}' - missing", label));
        }
    }
}

/// Find the local file matching any version of an item, if one exists.
///
/// Versions are tried in catalog order; within a version, hash kinds in
/// stored order. This only consumes the index lookup interface.
fn locate_any(index: &HashIndex, versions: &[Version]) -> Option<PathBuf> {
    for version in versions {
        for (kind, value) in &version.hashes {
            if let Some(path) = index.find_by_value(value, Some(kind.as_str())) {
                return Some(path);
            }
        }
    }
    None
}

// ============================================================================
// Rename command
// ============================================================================

/// Rename indexed files to their resolved catalog names
pub fn rename_collection(config: &Config, assume_yes: bool) -> Result<()> {
    print_header("Rename Files");

    let mut index = HashIndex::new(config.index_path());
    index.load();
    if index.is_empty() {
        print_warning("Index is empty - run `video-organizer index` first");
        return Ok(());
    }

    let catalog = match Catalog::load(&config.catalog.path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            print_error(&format!(
                "No usable catalog at {}",
                config.catalog.path.display()
            ));
            return Ok(());
        }
    };

    if config.rename.confirm && !assume_yes {
        let proceed = Confirm::new()
            .with_prompt("Rename matched files to their catalog names?")
            .default(false)
            .interact()?;
        if !proceed {
            print_info("Aborted");
            return Ok(());
        }
    }

    let paths: Vec<PathBuf> = index.paths().map(PathBuf::from).collect();
    let mut renamed = 0;
    let mut failed = 0;
    let mut unmatched = 0;

    for path in paths {
        let hashes = index.get_all(&path);
        let matched = hashes
            .iter()
            .find_map(|(kind, value)| find_version(&catalog, kind, value));

        let Some(matched) = matched else {
            unmatched += 1;
            continue;
        };

        let target_name = target_filename(&matched, &path);
        if path.file_name().and_then(|n| n.to_str()) == Some(target_name.as_str()) {
            continue;
        }

        let new_path = path.with_file_name(&target_name);
        match fs::rename(&path, &new_path) {
            Ok(()) => {
                debug!("Renamed {} to {}", path.display(), new_path.display());
                index.rename_path(&path, &new_path);
                renamed += 1;
                print_success(&format!(
                    "{} -> {} ({})",
                    path.display(),
                    new_path.display(),
                    matched.container.label()
                ));
            }
            Err(e) => {
                // Isolated per file: log and keep going
                error!(
                    "Error renaming {} to {}: {}",
                    path.display(),
                    new_path.display(),
                    e
                );
                failed += 1;
            }
        }
    }

    index.persist()?;

    println!();
    print_info(&format!(
        "Renamed {} file(s), {} failed, {} unmatched",
        renamed, failed, unmatched
    ));

    Ok(())
}

/// Build the target file name for a matched file.
///
/// Uses the catalog name with characters invalid in file names removed,
/// and the version's suffix hint, falling back to the file's current
/// extension.
fn target_filename(matched: &VersionMatch<'_>, current: &Path) -> String {
    let name: String = matched
        .video
        .name()
        .chars()
        .filter(|c| !matches!(c, '?' | '/' | '\\' | ':' | '*' | '"' | '<' | '>' | '|'))
        .collect();

    let suffix = if matched.version.suffix.is_empty() {
        current
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        matched.version.suffix.trim_start_matches('.').to_string()
    };

    if suffix.is_empty() {
        name
    } else {
        format!("{}.{}", name, suffix)
    }
}

// ============================================================================
// Duplicates command
// ============================================================================

/// Find near-duplicate files by perceptual-hash proximity
pub fn find_duplicate_files(config: &Config, threshold_override: Option<u32>) -> Result<()> {
    print_header("Duplicate Detection");

    let mut index = HashIndex::new(config.index_path());
    index.load();

    let fingerprints = index.for_kind(kind::PERCEPTUAL);
    if fingerprints.is_empty() {
        print_warning("No perceptual fingerprints in the index - run `video-organizer index` first");
        return Ok(());
    }

    let threshold = threshold_override.unwrap_or(config.duplicates.distance_threshold);
    print_info(&format!(
        "Comparing {} fingerprint(s) with distance threshold {}",
        fingerprints.len(),
        threshold
    ));

    let clusters = find_duplicates(&fingerprints, threshold);

    let mut groups = 0;
    for (path, cluster) in &clusters {
        if cluster.len() < 2 {
            continue;
        }
        // Each cluster appears once per member; print it only at its leader
        if cluster[0] != *path {
            continue;
        }

        groups += 1;
        println!();
        print_info(&format!("Group of {}:", cluster.len()));
        for member in cluster {
            println!("      {}", member);
        }
    }

    println!();
    if groups == 0 {
        print_success("No duplicates found");
    } else {
        print_warning(&format!("{} duplicate group(s) found", groups));
    }

    Ok(())
}

// ============================================================================
// Config commands
// ============================================================================

/// Handle the `config` subcommand
pub fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if reset {
        // Delete existing config and create a fresh one
        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                std::fs::remove_file(&config_path)?;
                info!("Removed existing config file");
            }
        }
        let path = init_config()?;
        info!("Created fresh config file at: {}", path.display());
        return Ok(());
    }

    if show_path {
        let path = Config::get_active_config_path();
        println!("{}", path.display());
        if path.exists() {
            info!("Config file exists at: {}", path.display());
        } else {
            info!("Config file would be created at: {}", path.display());
        }
        return Ok(());
    }

    info!("Opening configuration file in default editor...");
    match open_config_in_editor() {
        Ok(path) => {
            info!("Config file: {}", path.display());
            info!("Save the file after editing to apply changes.");
            info!("Run 'video-organizer show-config' to verify your settings.");
        }
        Err(e) => {
            error!("Failed to open config file: {}", e);
            if let Some(path) = get_config_path() {
                info!("You can manually edit the config at: {}", path.display());
            }
        }
    }

    Ok(())
}

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let custom_path = output.is_some();
    let output_path = match output {
        Some(path) => path,
        None => init_config()?,
    };

    if custom_path {
        let content = Config::generate_default_config();
        fs::write(&output_path, content)?;
    }

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to customize collection and hashing settings.");

    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("[collection]");
    info!("  root = \"{}\"", config.collection.root.display());
    info!(
        "  include_extensions = {:?}",
        config.collection.include_extensions
    );
    info!("  recursive = {}", config.collection.recursive);
    info!("  follow_symlinks = {}", config.collection.follow_symlinks);
    info!("  index_filename = \"{}\"", config.collection.index_filename);
    info!("");
    info!("[catalog]");
    info!("  path = \"{}\"", config.catalog.path.display());
    info!("");
    info!("[hashing]");
    info!("  workers = {}", config.hashing.workers);
    info!("  perceptual_enabled = {}", config.hashing.perceptual_enabled);
    info!(
        "  frame_interval_secs = {}",
        config.hashing.frame_interval_secs
    );
    info!("");
    info!("[duplicates]");
    info!(
        "  distance_threshold = {}",
        config.duplicates.distance_threshold
    );
    info!("");
    info!("[rename]");
    info!("  confirm = {}", config.rename.confirm);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
}
