use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tiered_cascade::{Cascade, CascadeFile, Tier};
use tiered_settings::{keys, Settings, SettingsSource, StorageSpec};
use tiered_store::{AdapterRegistry, Payload, StoredFile};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_path();
    match cli.command {
        Command::Store(args) => cmd_store(config, args),
        Command::Cat(args) => cmd_cat(config, args),
        Command::Exists(args) => cmd_exists(config, args),
        Command::Info(args) => cmd_info(config, args),
        Command::Delete(args) => cmd_delete(config, args),
        Command::Config => cmd_config(config),
    }
}

fn load_settings(config: &Path) -> anyhow::Result<Settings> {
    Settings::load(config).with_context(|| format!("reading settings from {}", config.display()))
}

fn open_cascade(config: &Path) -> anyhow::Result<Cascade> {
    tracing::debug!(config = %config.display(), "opening cascade");
    let settings = load_settings(config)?;
    let cascade = Cascade::from_settings(settings.into_shared(), &AdapterRegistry::with_builtin())
        .context("building storage cascade")?;
    Ok(cascade)
}

fn retrieve(cascade: &Cascade, location: &str) -> anyhow::Result<CascadeFile> {
    cascade
        .retrieve(location)
        .with_context(|| format!("retrieving {location}"))
}

fn tier_label(tier: Tier) -> colored::ColoredString {
    match tier {
        Tier::Primary => tier.to_string().green(),
        Tier::Secondary => tier.to_string().yellow(),
    }
}

fn cmd_store(config: &Path, args: StoreArgs) -> anyhow::Result<()> {
    let cascade = open_cascade(config)?;
    let mut payload = Payload::from_path(&args.source)
        .with_context(|| format!("reading {}", args.source.display()))?;
    if let Some(content_type) = args.content_type {
        payload = payload.with_content_type(content_type);
    }
    let stored = cascade
        .store(&payload, &args.location)
        .with_context(|| format!("storing {}", args.location))?;
    println!(
        "{} Stored {} ({} bytes) in {} tier",
        "✓".green().bold(),
        stored.location().bold(),
        payload.len(),
        cascade.primary().engine().cyan()
    );
    if let Some(url) = stored.url() {
        println!("  URL: {}", url.blue());
    }
    Ok(())
}

fn cmd_cat(config: &Path, args: LocationArgs) -> anyhow::Result<()> {
    let cascade = open_cascade(config)?;
    let file = retrieve(&cascade, &args.location)?;
    let data = file
        .read()
        .with_context(|| format!("reading {}", args.location))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&data)?;
    stdout.flush()?;
    Ok(())
}

fn cmd_exists(config: &Path, args: LocationArgs) -> anyhow::Result<()> {
    let cascade = open_cascade(config)?;
    let file = retrieve(&cascade, &args.location)?;
    if file.exists()? {
        println!("{} {} ({})", "✓".green(), args.location.bold(), tier_label(file.tier()));
    } else {
        println!("{} {} not found", "✗".red(), args.location.bold());
    }
    Ok(())
}

fn cmd_info(config: &Path, args: LocationArgs) -> anyhow::Result<()> {
    let cascade = open_cascade(config)?;
    let file = retrieve(&cascade, &args.location)?;
    println!("Location: {}", file.location().bold());
    println!("Tier: {}", tier_label(file.tier()));
    if !file.exists()? {
        println!("Exists: {}", "no".red());
        return Ok(());
    }
    println!("Exists: {}", "yes".green());
    println!("Size: {} bytes", file.size()?);
    if let Some(path) = file.path() {
        println!("Path: {}", path.display());
    }
    if let Some(url) = file.url() {
        println!("URL: {}", url.blue());
    }
    if let Some(content_type) = file.content_type() {
        println!("Content type: {content_type}");
    }
    Ok(())
}

fn cmd_delete(config: &Path, args: LocationArgs) -> anyhow::Result<()> {
    let cascade = open_cascade(config)?;
    let file = retrieve(&cascade, &args.location)?;
    file.delete()
        .with_context(|| format!("deleting {}", args.location))?;
    let guarded = file
        .as_secondary()
        .map(|secondary| !secondary.deletion_allowed())
        .unwrap_or(false);
    if guarded {
        println!(
            "{} {} lives in the secondary tier; deletion is disabled (allow_secondary_file_deletion)",
            "!".yellow().bold(),
            args.location.bold()
        );
    } else {
        println!(
            "{} Deleted {} from {} tier",
            "✓".green(),
            args.location.bold(),
            tier_label(file.tier())
        );
    }
    Ok(())
}

fn cmd_config(config: &Path) -> anyhow::Result<()> {
    let settings = load_settings(config)?;
    let primary = StorageSpec::read(&settings, keys::PRIMARY_STORAGE)?;
    let secondary = StorageSpec::read(&settings, keys::SECONDARY_STORAGE)?;
    let registry = AdapterRegistry::with_builtin();
    let engine_label = |spec: &StorageSpec| {
        if registry.contains(spec.engine()) {
            spec.to_string().cyan()
        } else {
            format!("{spec} (unknown engine)").red()
        }
    };
    println!("Settings: {}", config.display().to_string().bold());
    println!("Primary: {}", engine_label(&primary));
    println!("Secondary: {}", engine_label(&secondary));
    println!(
        "Cascade: {}",
        if settings.bool_or(keys::ENABLE_CASCADE, true)? {
            "enabled".green()
        } else {
            "disabled".yellow()
        }
    );
    println!(
        "Secondary deletion: {}",
        if settings.is_true(keys::ALLOW_SECONDARY_FILE_DELETION) {
            "allowed".yellow()
        } else {
            "disallowed".green()
        }
    );
    println!("Engines: {}", registry.engines().join(", "));
    Ok(())
}
