// Chart pipelines: rows -> records -> groups -> scales -> scene graph

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::compiler;
use crate::config::ChartConfig;
use crate::data::PlotData;
use crate::error::{ChartError, ChartWarning};
use crate::graph;
use crate::group::{group_by, group_by_keys, Groups, OrderedKeys};
use crate::ir::{BoxplotStyle, ChartKind, ChartScales, LineStyle, Primitive, SceneGraph};
use crate::record::{parse_records, AveragedRecord, EngagementRecord, TimePoint};
use crate::scale::{extent, BandScale, LinearScale, OrdinalScale};
use crate::stats::summarize_groups;
use crate::OutputFormat;

/// Tick count used when rounding the bar chart's value axis
const NICE_TICKS: usize = 10;

/// Box-plot of likes per platform
pub fn build_boxplot(data: &PlotData, config: &ChartConfig) -> Result<SceneGraph, ChartError> {
    info!("Building boxplot from {} rows", data.len());
    let parsed = parse_records::<EngagementRecord>(data, config.policy)?;
    let records = parsed.records;

    let groups = group_categories(records.iter(), config, |r| r.platform.clone())?;
    debug!("Boxplot groups: {:?}", groups.keys());
    let summaries = summarize_groups(&groups, |r| r.likes)?;

    let (lo, hi) = extent(records.iter().map(|r| r.likes)).ok_or(ChartError::EmptyDataset)?;
    let x = BandScale::new(groups.keys().to_vec(), config.plot_x_range()).with_padding(config.padding);
    let y = LinearScale::new((lo, hi), value_range(config));
    debug!("Boxplot scales: bandwidth {:.2}, y domain {:?}", x.bandwidth(), y.domain());

    let primitives = compiler::boxplot_geometry(&summaries, &x, &y, &BoxplotStyle::default())?;

    Ok(scene(
        ChartKind::Boxplot,
        config,
        ChartScales::Boxplot { x, y },
        primitives,
        parsed.skipped,
    ))
}

/// Grouped bars of average likes per platform, one bar per post type
pub fn build_grouped_bar(data: &PlotData, config: &ChartConfig) -> Result<SceneGraph, ChartError> {
    info!("Building grouped bar chart from {} rows", data.len());
    let parsed = parse_records::<AveragedRecord>(data, config.policy)?;
    let records = parsed.records;
    let mut warnings = parsed.skipped;

    let platforms = group_categories(records.iter(), config, |r| r.platform.clone())?;
    debug!("Grouped bar platforms: {:?}", platforms.keys());

    let post_types: OrderedKeys<String> = records.iter().map(|r| r.post_type.clone()).collect();
    let (_, max) = extent(records.iter().map(|r| r.like_avg)).ok_or(ChartError::EmptyDataset)?;

    let x0 = BandScale::new(platforms.keys().to_vec(), config.plot_x_range()).with_padding(config.padding);
    let x1 = BandScale::new(post_types.iter().cloned(), (0.0, x0.bandwidth()));
    let y = LinearScale::new((0.0, max), value_range(config)).nice(NICE_TICKS);
    let color = OrdinalScale::new(post_types.iter().cloned(), &config.palette);
    debug!(
        "Grouped bar scales: outer bandwidth {:.2}, inner bandwidth {:.2}, y domain {:?}",
        x0.bandwidth(),
        x1.bandwidth(),
        y.domain()
    );

    if let Some(warning) = color.exhaustion() {
        warn!("Grouped bar: {}", warning);
        warnings.push(warning);
    }

    let primitives = compiler::grouped_bar_geometry(&records, &x0, &x1, &y, &color)?;

    Ok(scene(
        ChartKind::GroupedBar,
        config,
        ChartScales::GroupedBar { x0, x1, y, color },
        primitives,
        warnings,
    ))
}

/// Average likes over date labels as a natural-spline curve
pub fn build_line(data: &PlotData, config: &ChartConfig) -> Result<SceneGraph, ChartError> {
    info!("Building line chart from {} rows", data.len());
    let parsed = parse_records::<TimePoint>(data, config.policy)?;
    let points = parsed.records;

    let dates = group_categories(points.iter(), config, |p| p.date.clone())?;
    let (_, max) = extent(points.iter().map(|p| p.like_avg)).ok_or(ChartError::EmptyDataset)?;

    let x = BandScale::new(dates.keys().to_vec(), config.plot_x_range()).with_padding(config.padding);
    let y = LinearScale::new((0.0, max), value_range(config));
    debug!("Line scales: {} dates, y domain {:?}", x.domain().len(), y.domain());

    let primitives = compiler::line_geometry(&points, &x, &y, &LineStyle::new("red", 2.0))?;

    Ok(scene(
        ChartKind::Line,
        config,
        ChartScales::Line { x, y },
        primitives,
        parsed.skipped,
    ))
}

/// Run the pipeline for `kind`
pub fn build_chart(kind: ChartKind, data: &PlotData, config: &ChartConfig) -> Result<SceneGraph, ChartError> {
    match kind {
        ChartKind::Boxplot => build_boxplot(data, config),
        ChartKind::GroupedBar => build_grouped_bar(data, config),
        ChartKind::Line => build_line(data, config),
    }
}

/// One chart to build as part of `build_all`
#[derive(Debug, Clone, Copy)]
pub struct ChartJob<'a> {
    pub kind: ChartKind,
    pub data: &'a PlotData,
    pub config: &'a ChartConfig,
}

/// Build every job independently. A failing chart is logged and
/// reported in its own slot; the others are unaffected.
pub fn build_all(jobs: &[ChartJob<'_>]) -> Vec<(ChartKind, Result<SceneGraph, ChartError>)> {
    jobs.iter()
        .map(|job| {
            let result = build_chart(job.kind, job.data, job.config);
            if let Err(err) = &result {
                warn!("{} chart failed: {}", job.kind, err);
            }
            (job.kind, result)
        })
        .collect()
}

/// Encode a scene graph in the requested output format
pub fn render(scene: &SceneGraph, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => graph::render_png(scene),
        OutputFormat::Svg => graph::render_svg(scene).map(String::into_bytes),
        OutputFormat::Json => serde_json::to_vec_pretty(scene).context("Failed to serialize scene graph"),
    }
}

/// Buckets of the category axis: first-seen order, or the configured
/// order, which must then list every category present
fn group_categories<'r, R, I, F>(records: I, config: &ChartConfig, key_fn: F) -> Result<Groups<String, &'r R>, ChartError>
where
    I: IntoIterator<Item = &'r R>,
    F: Fn(&R) -> String,
{
    match &config.order {
        None => Ok(group_by(records, |r| key_fn(r))),
        Some(order) => group_by_keys(order.iter().cloned(), records, |r| key_fn(r))
            .map_err(|key| ChartError::UnknownKey { key, scale: "band" }),
    }
}

/// Value axis runs bottom-up inside the margins
fn value_range(config: &ChartConfig) -> (f64, f64) {
    let (top, bottom) = config.plot_y_range();
    (bottom, top)
}

fn scene(
    kind: ChartKind,
    config: &ChartConfig,
    scales: ChartScales,
    primitives: Vec<Primitive>,
    warnings: Vec<ChartWarning>,
) -> SceneGraph {
    info!(
        "{} chart: {} primitives, {} warnings",
        kind,
        primitives.len(),
        warnings.len()
    );

    SceneGraph {
        kind,
        width: config.width,
        height: config.height,
        margin: config.margin,
        background: config.background.clone(),
        labels: config.labels.clone(),
        scales,
        primitives,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ParsePolicy;

    fn make_data(headers: &[&str], rows: &[&[&str]]) -> PlotData {
        PlotData::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn engagement() -> PlotData {
        make_data(
            &["Platform", "PostType", "Likes"],
            &[
                &["Instagram", "Image", "10"],
                &["Twitter", "Video", "40"],
                &["Instagram", "Video", "20"],
                &["Twitter", "Image", "60"],
                &["Instagram", "Link", "30"],
            ],
        )
    }

    fn averages() -> PlotData {
        make_data(
            &["Platform", "PostType", "LikeAvg"],
            &[
                &["Facebook", "Image", "40"],
                &["Facebook", "Link", "25"],
                &["Facebook", "Video", "97"],
                &["Twitter", "Image", "30"],
                &["Twitter", "Video", "60"],
            ],
        )
    }

    fn timeline() -> PlotData {
        make_data(
            &["Date", "LikeAvg"],
            &[
                &["3/1/2024", "20"],
                &["3/2/2024", "45"],
                &["3/3/2024", "30"],
                &["3/4/2024", "50"],
            ],
        )
    }

    fn count_rects(scene: &SceneGraph) -> usize {
        scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Rect { .. }))
            .count()
    }

    #[test]
    fn test_boxplot_pipeline() {
        let config = ChartConfig::for_kind(ChartKind::Boxplot);
        let scene = build_boxplot(&engagement(), &config).unwrap();

        assert_eq!(scene.kind, ChartKind::Boxplot);
        assert_eq!(scene.primitives.len(), 6);
        assert_eq!(count_rects(&scene), 2);
        assert!(scene.warnings.is_empty());

        let x = scene.scales.x();
        assert_eq!(x.domain(), &["Instagram".to_string(), "Twitter".to_string()]);
        // Domain spans the whole dataset
        assert_eq!(scene.scales.y().domain(), (10.0, 60.0));
        assert_eq!(scene.scales.y().range(), (350.0, 30.0));
    }

    #[test]
    fn test_boxplot_explicit_order() {
        let mut config = ChartConfig::for_kind(ChartKind::Boxplot);
        config.order = Some(vec!["Twitter".to_string(), "Instagram".to_string()]);
        let scene = build_boxplot(&engagement(), &config).unwrap();
        assert_eq!(scene.scales.x().domain()[0], "Twitter");
    }

    #[test]
    fn test_boxplot_order_with_missing_category() {
        let mut config = ChartConfig::for_kind(ChartKind::Boxplot);
        config.order = Some(vec![
            "Instagram".to_string(),
            "TikTok".to_string(),
            "Twitter".to_string(),
        ]);
        let err = build_boxplot(&engagement(), &config).unwrap_err();
        assert_eq!(err, ChartError::EmptyGroup { key: Some("TikTok".to_string()) });
    }

    #[test]
    fn test_boxplot_order_missing_data_category() {
        let mut config = ChartConfig::for_kind(ChartKind::Boxplot);
        config.order = Some(vec!["Instagram".to_string()]);
        let err = build_boxplot(&engagement(), &config).unwrap_err();
        assert_eq!(err, ChartError::UnknownKey { key: "Twitter".to_string(), scale: "band" });
    }

    #[test]
    fn test_grouped_bar_pipeline() {
        let config = ChartConfig::for_kind(ChartKind::GroupedBar);
        let scene = build_grouped_bar(&averages(), &config).unwrap();

        assert_eq!(count_rects(&scene), 5);
        assert_eq!(scene.scales.y().domain(), (0.0, 100.0));

        match &scene.scales {
            ChartScales::GroupedBar { x0, x1, color, .. } => {
                assert_eq!(x0.domain().len(), 2);
                assert_eq!(x1.domain(), &["Image".to_string(), "Link".to_string(), "Video".to_string()]);
                assert!((x1.range().1 - x0.bandwidth()).abs() < 1e-9);
                assert_eq!(color.color("Video").unwrap(), "#dc143c");
            }
            other => panic!("expected grouped bar scales, got {:?}", other),
        }
    }

    #[test]
    fn test_grouped_bar_palette_exhaustion_is_reported() {
        let mut config = ChartConfig::for_kind(ChartKind::GroupedBar);
        config.palette = crate::palette::ColorPalette::new(vec!["#000000".to_string()]).unwrap();
        let scene = build_grouped_bar(&averages(), &config).unwrap();

        assert_eq!(count_rects(&scene), 5);
        assert_eq!(
            scene.warnings,
            vec![ChartWarning::PaletteExhausted { keys: 3, colors: 1 }]
        );
    }

    #[test]
    fn test_line_pipeline() {
        let config = ChartConfig::for_kind(ChartKind::Line);
        let scene = build_line(&timeline(), &config).unwrap();

        assert_eq!(scene.primitives.len(), 1);
        assert_eq!(scene.scales.y().domain(), (0.0, 50.0));
        assert_eq!(scene.scales.y().range(), (325.0, 50.0));
        match &scene.primitives[0] {
            Primitive::Path { commands, style } => {
                assert_eq!(commands.len(), 4);
                assert_eq!(style.color, "red");
                assert_eq!(style.width, 2.0);
            }
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_row_policies() {
        let data = make_data(
            &["Platform", "Likes"],
            &[&["Instagram", "10"], &["Instagram", "n/a"], &["Twitter", "5"]],
        );

        let mut config = ChartConfig::for_kind(ChartKind::Boxplot);
        let err = build_boxplot(&data, &config).unwrap_err();
        assert!(matches!(err, ChartError::MalformedRecord { row: 1, .. }));

        config.policy = ParsePolicy::SkipRow;
        let scene = build_boxplot(&data, &config).unwrap();
        assert_eq!(scene.warnings.len(), 1);
        assert!(matches!(scene.warnings[0], ChartWarning::SkippedRow { row: 1, .. }));
    }

    #[test]
    fn test_build_all_isolates_failures() {
        let broken = make_data(&["Platform"], &[&["Instagram"]]);
        let boxplot = ChartConfig::for_kind(ChartKind::Boxplot);
        let line = ChartConfig::for_kind(ChartKind::Line);

        let results = build_all(&[
            ChartJob { kind: ChartKind::Boxplot, data: &broken, config: &boxplot },
            ChartJob { kind: ChartKind::Line, data: &timeline(), config: &line },
        ]);

        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Err(ChartError::ColumnNotFound { .. })));
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn test_render_json() {
        let config = ChartConfig::for_kind(ChartKind::Line);
        let scene = build_line(&timeline(), &config).unwrap();
        let bytes = render(&scene, OutputFormat::Json).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], "line");
        assert_eq!(json["primitives"][0]["type"], "path");
        assert_eq!(json["scales"]["kind"], "line");
    }
}
