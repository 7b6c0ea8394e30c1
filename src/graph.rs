use anyhow::{anyhow, bail, Context, Result};
use image::ImageEncoder;
use std::fmt::Write;
use log::warn;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontTransform};

use crate::config::MAX_DIMENSION;
use crate::curve;
use crate::ir::{LineStyle, Primitive, RectStyle, SceneGraph};
use crate::palette::parse_color;
use crate::scale::{BandScale, LinearScale, OrdinalScale};

/// Straight pieces per Bézier segment when rasterizing curves
const CURVE_SEGMENTS: usize = 16;
/// Rough number of value-axis ticks
const Y_TICKS: usize = 10;
const TICK_LENGTH: i32 = 6;

/// Render a scene graph and encode it as PNG
pub fn render_png(scene: &SceneGraph) -> Result<Vec<u8>> {
    let (width, height) = (scene.width, scene.height);
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        bail!("Cannot rasterize a {}x{} canvas", width, height);
    }
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| anyhow!("Canvas {}x{} is too large", width, height))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_scene(&root, scene, Curves::Flattened)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Render a scene graph as an SVG document. Curves keep their exact
/// Bézier segments.
pub fn render_svg(scene: &SceneGraph) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height)).into_drawing_area();
        draw_scene(&root, scene, Curves::Skipped)?;
        root.present().context("Failed to present drawing")?;
    }

    // plotters has no cubic Bézier element, so curves are spliced in as path data
    let paths = svg_paths(scene);
    if !paths.is_empty() {
        let end = svg
            .rfind("</svg>")
            .ok_or_else(|| anyhow!("SVG document has no closing tag"))?;
        svg.insert_str(end, &paths);
    }
    Ok(svg)
}

/// How `Primitive::Path` is handled by a plotters backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Curves {
    Flattened,
    Skipped,
}

fn draw_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph, curves: Curves) -> Result<()> {
    root.fill(&color(&scene.background))
        .map_err(|e| anyhow!("Failed to fill background: {:?}", e))?;

    for primitive in &scene.primitives {
        if curves == Curves::Skipped && matches!(primitive, Primitive::Path { .. }) {
            continue;
        }
        draw_primitive(root, primitive)?;
    }

    let x_axis_y = scene.height as f64 - scene.margin.bottom;
    draw_x_axis(root, scene.scales.x(), x_axis_y)?;
    draw_y_axis(root, scene.scales.y(), scene.margin.left)?;

    if let Some(color_scale) = scene.scales.color() {
        draw_legend(root, color_scale, scene.width as f64 - scene.margin.right, scene.margin.top)?;
    }

    draw_labels(root, scene);
    Ok(())
}

fn draw_primitive<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, primitive: &Primitive) -> Result<()> {
    match primitive {
        Primitive::Segment { from, to, style } => {
            root.draw(&PathElement::new(vec![px(*from), px(*to)], stroke(style)))
                .map_err(|e| anyhow!("Failed to draw segment: {:?}", e))?;
        }
        Primitive::Rect { x, y, width, height, style } => {
            draw_rect(root, (*x, *y), (x + width, y + height), style)?;
        }
        Primitive::Path { commands, style } => {
            for line in curve::flatten(commands, CURVE_SEGMENTS) {
                let points: Vec<(i32, i32)> = line.into_iter().map(px).collect();
                root.draw(&PathElement::new(points, stroke(style)))
                    .map_err(|e| anyhow!("Failed to draw path: {:?}", e))?;
            }
        }
    }
    Ok(())
}

/// `<path>` elements for every curve in the scene
fn svg_paths(scene: &SceneGraph) -> String {
    let mut out = String::new();
    for primitive in &scene.primitives {
        if let Primitive::Path { commands, style } = primitive {
            if commands.is_empty() {
                continue;
            }
            let RGBColor(r, g, b) = color(&style.color);
            // Writing to a String cannot fail
            let _ = writeln!(
                out,
                r##"<path d="{}" fill="none" stroke="#{:02x}{:02x}{:02x}" stroke-width="{}"/>"##,
                curve::to_svg_path(commands),
                r,
                g,
                b,
                style.width
            );
        }
    }
    out
}

fn draw_rect<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    a: (f64, f64),
    b: (f64, f64),
    style: &RectStyle,
) -> Result<()> {
    let top_left = px((a.0.min(b.0), a.1.min(b.1)));
    let bottom_right = px((a.0.max(b.0), a.1.max(b.1)));

    root.draw(&Rectangle::new([top_left, bottom_right], color(&style.fill).filled()))
        .map_err(|e| anyhow!("Failed to draw rectangle: {:?}", e))?;
    if let Some(outline) = &style.stroke {
        root.draw(&Rectangle::new([top_left, bottom_right], stroke(outline)))
            .map_err(|e| anyhow!("Failed to draw rectangle outline: {:?}", e))?;
    }
    Ok(())
}

fn draw_x_axis<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, x: &BandScale, y: f64) -> Result<()> {
    let (r0, r1) = x.range();
    let y = y.round() as i32;
    root.draw(&PathElement::new(vec![(r0.round() as i32, y), (r1.round() as i32, y)], BLACK.stroke_width(1)))
        .map_err(|e| anyhow!("Failed to draw x axis: {:?}", e))?;

    let style = text_style(12, Pos::new(HPos::Center, VPos::Top));
    for key in x.domain() {
        let center = x.locate(key)? + x.bandwidth() / 2.0;
        let cx = center.round() as i32;
        root.draw(&PathElement::new(vec![(cx, y), (cx, y + TICK_LENGTH)], BLACK.stroke_width(1)))
            .map_err(|e| anyhow!("Failed to draw x tick: {:?}", e))?;
        draw_text(root, key, (cx, y + TICK_LENGTH + 2), &style);
    }
    Ok(())
}

fn draw_y_axis<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, y: &LinearScale, x: f64) -> Result<()> {
    let (r0, r1) = y.range();
    let x = x.round() as i32;
    root.draw(&PathElement::new(vec![(x, r0.round() as i32), (x, r1.round() as i32)], BLACK.stroke_width(1)))
        .map_err(|e| anyhow!("Failed to draw y axis: {:?}", e))?;

    let style = text_style(12, Pos::new(HPos::Right, VPos::Center));
    for tick in y.ticks(Y_TICKS) {
        let ty = y.map(tick).round() as i32;
        root.draw(&PathElement::new(vec![(x - TICK_LENGTH, ty), (x, ty)], BLACK.stroke_width(1)))
            .map_err(|e| anyhow!("Failed to draw y tick: {:?}", e))?;
        draw_text(root, &format_tick(tick), (x - TICK_LENGTH - 3, ty), &style);
    }
    Ok(())
}

/// One swatch and name per color key, stacked down from the top-right
/// corner of the plot area
fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scale: &OrdinalScale,
    right: f64,
    top: f64,
) -> Result<()> {
    const SWATCH: i32 = 12;
    const ROW: i32 = 18;

    let style = text_style(12, Pos::new(HPos::Right, VPos::Center));
    let right = right.round() as i32;
    let top = top.round() as i32;

    for (i, key) in scale.domain().iter().enumerate() {
        let y = top + i as i32 * ROW;
        let fill = color(scale.color(key)?);
        root.draw(&Rectangle::new([(right - SWATCH, y), (right, y + SWATCH)], fill.filled()))
            .map_err(|e| anyhow!("Failed to draw legend swatch: {:?}", e))?;
        draw_text(root, key, (right - SWATCH - 4, y + SWATCH / 2), &style);
    }
    Ok(())
}

fn draw_labels<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &SceneGraph) {
    let width = scene.width as f64;
    let height = scene.height as f64;
    let margin = &scene.margin;
    let center_x = ((margin.left + width - margin.right) / 2.0).round() as i32;

    if let Some(title) = &scene.labels.title {
        let style = text_style(16, Pos::new(HPos::Center, VPos::Top));
        draw_text(root, title, (center_x, 4), &style);
    }
    if let Some(x_label) = &scene.labels.x {
        let style = text_style(13, Pos::new(HPos::Center, VPos::Bottom));
        draw_text(root, x_label, (center_x, height.round() as i32 - 4), &style);
    }
    if let Some(y_label) = &scene.labels.y {
        let center_y = ((margin.top + height - margin.bottom) / 2.0).round() as i32;
        let font = FontDesc::from((FontFamily::SansSerif, 13)).transform(FontTransform::Rotate270);
        let style = TextStyle::from(font)
            .pos(Pos::new(HPos::Center, VPos::Top))
            .color(&BLACK);
        draw_text(root, y_label, (4, center_y), &style);
    }
}

/// Text needs a usable system font; failures are logged and skipped
fn draw_text<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, text: &str, at: (i32, i32), style: &TextStyle) {
    if let Err(e) = root.draw(&Text::new(text.to_string(), at, style.clone())) {
        warn!("Skipping text '{}': {:?}", text, e);
    }
}

fn text_style(size: u32, pos: Pos) -> TextStyle<'static> {
    TextStyle::from((FontFamily::SansSerif, size)).pos(pos).color(&BLACK)
}

fn stroke(style: &LineStyle) -> ShapeStyle {
    color(&style.color).stroke_width(style.width.max(1.0).round() as u32)
}

/// Unknown color names fall back to black
fn color(name: &str) -> RGBColor {
    parse_color(name).unwrap_or_else(|| {
        warn!("Unknown color '{}', using black", name);
        BLACK
    })
}

fn px(point: (f64, f64)) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}

/// Tick label without a trailing `.0` on whole numbers
fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.6}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
