use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use capkit::{init_logging, render_previews, Config, ProductCatalog, BUILD_DATE, VERSION};
use capkit::designer::{load_layers_from_file, SessionFile};

const USAGE: &str = "usage: capkit [config.toml|config.json] <session.json|snapshot.json> [out_dir]";

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// A leading `.toml`, or a leading `.json` followed by another `.json`, is the config.
fn takes_config(args: &[PathBuf]) -> bool {
    match args {
        [first, ..] if extension(first) == Some("toml") => true,
        [first, second, ..] => extension(first) == Some("json") && extension(second) == Some("json"),
        _ => false,
    }
}

/// Colors and their layers from a session file or a bare layer array.
fn load_designs(path: &Path, config: &Config) -> anyhow::Result<Vec<(String, Vec<capkit::Layer>)>> {
    match SessionFile::load_from_file(path) {
        Ok(session) => Ok(session
            .layers_by_color
            .iter()
            .map(|(color, set)| (color.clone(), set.iter().cloned().collect()))
            .collect()),
        Err(session_err) => {
            tracing::debug!("{} is not a session file: {:#}", path.display(), session_err);
            let layers = load_layers_from_file(path)
                .with_context(|| format!("{} is neither a session nor a layer array", path.display()))?;
            Ok(vec![(config.layers.default_color.clone(), layers)])
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("capkit {} (built {})", VERSION, BUILD_DATE);

    let mut args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let config = if takes_config(&args) {
        let path = args.remove(0);
        Config::load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
    } else {
        Config::load_or_default().context("Failed to load default config")?
    };

    let Some(input) = args.first().cloned() else {
        bail!(USAGE);
    };
    let out_dir = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| config.storage.preview_directory.clone());
    if args.len() > 2 {
        bail!(USAGE);
    }

    let designs = load_designs(&input, &config)?;
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let catalog = Arc::new(ProductCatalog::default_cap());
    let mut written = 0;
    for (color, layers) in designs {
        for (view, svg) in render_previews(&config, catalog.clone(), &color, &layers) {
            let path = out_dir.join(format!("{}-{}.svg", color, view));
            std::fs::write(&path, svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
            written += 1;
        }
    }

    if written == 0 {
        tracing::warn!("{} has no layers to preview", input.display());
    }
    Ok(())
}
