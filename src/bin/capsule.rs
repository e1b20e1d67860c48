use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "capsule", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a stored layout record as a PNG snapshot.
    Snapshot(SnapshotArgs),
    /// Parse a layout record and report what it references.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Layout record JSON (bare array of entries).
    #[arg(long)]
    layout: PathBuf,

    /// Directory of item photos named `<itemId>.<ext>`.
    #[arg(long)]
    items: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Snapshot width in pixels.
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Snapshot height in pixels.
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Width each item is fitted to before its own scale.
    #[arg(long, default_value_t = 150.0)]
    base_width: f64,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Layout record JSON (bare array of entries).
    #[arg(long)]
    layout: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn read_layout(path: &Path) -> anyhow::Result<capsule::LayoutRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read layout '{}'", path.display()))?;
    let record = capsule::LayoutRecord::from_json(&json)
        .with_context(|| format!("parse layout '{}'", path.display()))?;
    Ok(record)
}

/// Catalog backed by the photo directory: every referenced id with a readable file exists.
fn load_catalog(
    record: &capsule::LayoutRecord,
    items_dir: &Path,
) -> anyhow::Result<capsule::MemoryCatalog> {
    let mut catalog = capsule::MemoryCatalog::new();
    for id in record.item_ids() {
        let Some(path) = photo_path(items_dir, id)? else {
            continue;
        };
        let bytes =
            std::fs::read(&path).with_context(|| format!("read photo '{}'", path.display()))?;
        catalog.insert(capsule::ItemRef::new(id, bytes));
    }
    Ok(catalog)
}

fn photo_path(items_dir: &Path, id: capsule::ItemId) -> anyhow::Result<Option<PathBuf>> {
    let stem = id.to_string();
    let entries = std::fs::read_dir(items_dir)
        .with_context(|| format!("list items dir '{}'", items_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str()) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let record = read_layout(&args.layout)?;
    let catalog = load_catalog(&record, &args.items)?;
    let placed = capsule::resolve_layout(&record, &catalog);

    let config = capsule::CanvasConfig {
        canvas: capsule::Canvas::new(args.width, args.height)?,
        base_display_width: args.base_width,
        ..capsule::CanvasConfig::default()
    };
    config.validate()?;
    let png = capsule::SnapshotCompositor::new(&config).composite_png(&placed)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} of {} entries drawn)",
        args.out.display(),
        placed.len(),
        record.len()
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let record = read_layout(&args.layout)?;
    record.ensure_encodable()?;
    for entry in record.render_order() {
        println!(
            "{} z={} x={} y={} scale={} rot={}",
            entry.item_id, entry.z_index, entry.x, entry.y, entry.scale, entry.rotation_degrees
        );
    }
    eprintln!("{} entries ok", record.len());
    Ok(())
}
