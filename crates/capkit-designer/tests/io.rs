#[path = "io/legacy_snapshot.rs"]
mod legacy_snapshot;
#[path = "io/svg_preview.rs"]
mod svg_preview;
