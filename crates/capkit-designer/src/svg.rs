//! SVG export of a rendered [`Scene`].
//!
//! Produces a standalone SVG document for previews: cart thumbnails, order
//! sheets and the `capkit` binary all use it.

use std::fmt::Write;

use crate::renderer::{DrawCommand, LayerSprite, Scene, SelectionHandles, SpriteContent};

const BACKGROUND: &str = "#f9fafb";
const GUIDE_STROKE: &str = "#60a5fa";
const GUIDE_FILL: &str = "rgba(96,165,250,0.05)";
const SELECTION_STROKE: &str = "#3b82f6";
const REMOVE_FILL: &str = "#ef4444";

/// Render a scene as an SVG document.
pub fn scene_to_svg(scene: &Scene) -> String {
    let size = scene.size;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
        s = fmt_num(size)
    );
    let _ = writeln!(
        svg,
        r#"<rect x="0" y="0" width="{s}" height="{s}" fill="{BACKGROUND}"/>"#,
        s = fmt_num(size)
    );

    for command in &scene.commands {
        match command {
            DrawCommand::BaseImage {
                source,
                rect,
                mirrored,
            } => {
                let transform = if *mirrored {
                    format!(r#" transform="translate({} 0) scale(-1 1)""#, fmt_num(size))
                } else {
                    String::new()
                };
                let _ = writeln!(
                    svg,
                    r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet"{}/>"#,
                    escape_xml(source),
                    fmt_num(rect.x),
                    fmt_num(rect.y),
                    fmt_num(rect.width),
                    fmt_num(rect.height),
                    transform
                );
            }
            DrawCommand::PrintArea { rect, label } => {
                let _ = writeln!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{GUIDE_FILL}" stroke="{GUIDE_STROKE}" stroke-width="2" stroke-dasharray="6 4"/>"#,
                    fmt_num(rect.x),
                    fmt_num(rect.y),
                    fmt_num(rect.width),
                    fmt_num(rect.height)
                );
                let _ = writeln!(
                    svg,
                    r#"<text x="{}" y="{}" font-size="10" text-anchor="end" fill="{GUIDE_STROKE}">{}</text>"#,
                    fmt_num(rect.x + rect.width - 2.0),
                    fmt_num(rect.y + 11.0),
                    escape_xml(label)
                );
            }
            DrawCommand::Layer(sprite) => write_sprite(&mut svg, sprite),
            DrawCommand::Handles(handles) => write_handles(&mut svg, handles),
            DrawCommand::ViewLabel { text, at } => {
                let _ = writeln!(
                    svg,
                    r##"<text x="{}" y="{}" font-size="12" fill="#ffffff" stroke="#000000" stroke-width="0.5">{}</text>"##,
                    fmt_num(at.x),
                    fmt_num(at.y + 12.0),
                    escape_xml(text)
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn write_sprite(svg: &mut String, sprite: &LayerSprite) {
    let rect = sprite.rect;
    let center = rect.center();
    let _ = writeln!(
        svg,
        r#"<g transform="translate({} {}) rotate({}) scale({} {})">"#,
        fmt_num(center.x),
        fmt_num(center.y),
        fmt_num(sprite.rotation),
        fmt_num(sprite.scale_x),
        fmt_num(sprite.scale_y)
    );

    let (x, y) = (-rect.width / 2.0, -rect.height / 2.0);
    match &sprite.content {
        SpriteContent::Image { source } => {
            let _ = writeln!(
                svg,
                r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet"/>"#,
                escape_xml(source),
                fmt_num(x),
                fmt_num(y),
                fmt_num(rect.width),
                fmt_num(rect.height)
            );
        }
        SpriteContent::Text {
            text,
            color,
            font_size,
            font_family,
        } => {
            let family = font_family
                .as_deref()
                .map(|f| format!(r#" font-family="{}""#, escape_xml(f)))
                .unwrap_or_default();
            let _ = writeln!(
                svg,
                r#"<text x="0" y="0" text-anchor="middle" dominant-baseline="central" fill="{}" font-size="{}"{}>{}</text>"#,
                escape_xml(color),
                fmt_num(*font_size),
                family,
                escape_xml(text)
            );
        }
    }

    svg.push_str("</g>\n");
}

fn write_handles(svg: &mut String, handles: &SelectionHandles) {
    let rect = handles.rect;
    let center = rect.center();
    let _ = writeln!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{SELECTION_STROKE}" stroke-width="2" transform="rotate({} {} {})"/>"#,
        fmt_num(rect.x),
        fmt_num(rect.y),
        fmt_num(rect.width),
        fmt_num(rect.height),
        fmt_num(handles.rotation),
        fmt_num(center.x),
        fmt_num(center.y)
    );

    for (_, at) in &handles.resize {
        let _ = writeln!(
            svg,
            r##"<circle cx="{}" cy="{}" r="{}" fill="#ffffff" stroke="{SELECTION_STROKE}"/>"##,
            fmt_num(at.x),
            fmt_num(at.y),
            fmt_num(handles.radius)
        );
    }
    let _ = writeln!(
        svg,
        r#"<circle cx="{}" cy="{}" r="{}" fill="{SELECTION_STROKE}"/>"#,
        fmt_num(handles.rotate.x),
        fmt_num(handles.rotate.y),
        fmt_num(handles.radius)
    );
    let _ = writeln!(
        svg,
        r#"<circle cx="{}" cy="{}" r="{}" fill="{REMOVE_FILL}"/>"#,
        fmt_num(handles.remove.x),
        fmt_num(handles.remove.y),
        fmt_num(handles.radius)
    );
}

/// Format a coordinate with at most three decimals and no trailing zeros.
fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
