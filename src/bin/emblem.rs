use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "emblem", version)]
struct Cli {
    /// Players to generate icons for. With no players given, every player
    /// definition under --players-dir is processed and the manifest is
    /// written.
    players: Vec<String>,

    /// Root of the icon source tree (gen.yaml, images/, overrides/).
    #[arg(long, default_value = "src/icons")]
    icons_dir: PathBuf,

    /// Directory with player definition files (<player>.yaml).
    #[arg(long, default_value = "src/players")]
    players_dir: PathBuf,

    /// Public icon output directory.
    #[arg(long, default_value = "out/public/icons")]
    out_dir: PathBuf,

    /// Output directory for excluded icons.
    #[arg(long, default_value = "out/excluded-icons")]
    excluded_dir: PathBuf,

    /// Manifest output file.
    #[arg(long, default_value = "out/icons.json")]
    manifest_out: PathBuf,

    /// URL prefix for manifest icon urls. Falls back to $EMBLEM_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_url = match cli.base_url {
        Some(url) => url,
        None => std::env::var("EMBLEM_BASE_URL")
            .context("--base-url not given and EMBLEM_BASE_URL is unset")?,
    };
    let cfg = emblem::PipelineConfig::new(cli.icons_dir, cli.out_dir, cli.excluded_dir, base_url);

    let (players, write_manifest) = if cli.players.is_empty() {
        (discover_players(&cli.players_dir)?, true)
    } else {
        (cli.players, false)
    };

    let manifest = emblem::run_batch(&cfg, &players)?;
    if write_manifest {
        manifest
            .write_to(&cli.manifest_out)
            .with_context(|| format!("write manifest '{}'", cli.manifest_out.display()))?;
        eprintln!("wrote {}", cli.manifest_out.display());
    }
    Ok(())
}

/// All `*.yaml` stems under `dir`, recursively, sorted. Two definition files
/// sharing a stem is a configuration error.
fn discover_players(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut stems = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    collect_yaml_stems(dir, &mut stems, &mut duplicates)?;
    if !duplicates.is_empty() {
        anyhow::bail!(
            "duplicate players: {}",
            duplicates.into_iter().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(stems.into_iter().collect())
}

fn collect_yaml_stems(
    dir: &Path,
    stems: &mut BTreeSet<String>,
    duplicates: &mut BTreeSet<String>,
) -> anyhow::Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read players dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_yaml_stems(&path, stems, duplicates)?;
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            && !stems.insert(stem.to_string())
        {
            duplicates.insert(stem.to_string());
        }
    }
    Ok(())
}
