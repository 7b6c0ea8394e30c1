// Geometry mapper: summaries and records + scales -> pixel-space primitives

use crate::curve::natural_curve;
use crate::error::ChartError;
use crate::group::group_by;
use crate::ir::{BoxplotStyle, LineStyle, Primitive, RectStyle};
use crate::record::{AveragedRecord, TimePoint};
use crate::scale::{BandScale, LinearScale, OrdinalScale};
use crate::stats::QuantileSummary;

// =============================================================================
// Boxplot Geometry Helpers
// =============================================================================

/// Computed geometry for a single box, in pixel space
#[derive(Debug, Clone, PartialEq)]
struct BoxplotGeometry {
    whisker: [(f64, f64); 2],
    box_top: f64,
    box_bottom: f64,
    median_line: [(f64, f64); 2],
}

/// Place one summary in a band starting at `x` with width `bandwidth`
fn compute_boxplot_geometry(x: f64, bandwidth: f64, summary: &QuantileSummary, y: &LinearScale) -> BoxplotGeometry {
    let center = x + bandwidth / 2.0;
    let q1 = y.map(summary.q1);
    let q3 = y.map(summary.q3);
    let median = y.map(summary.median);

    BoxplotGeometry {
        whisker: [(center, y.map(summary.min)), (center, y.map(summary.max))],
        box_top: q1.min(q3),
        box_bottom: q1.max(q3),
        median_line: [(x, median), (x + bandwidth, median)],
    }
}

/// Whisker, box and median primitives for every summarized bucket, in order
pub fn boxplot_geometry(
    summaries: &[(String, QuantileSummary)],
    x: &BandScale,
    y: &LinearScale,
    style: &BoxplotStyle,
) -> Result<Vec<Primitive>, ChartError> {
    let bandwidth = x.bandwidth();
    let mut primitives = Vec::with_capacity(summaries.len() * 3);

    for (key, summary) in summaries {
        let left = x.locate(key)?;
        let geom = compute_boxplot_geometry(left, bandwidth, summary, y);

        primitives.push(Primitive::Segment {
            from: geom.whisker[0],
            to: geom.whisker[1],
            style: style.whisker.clone(),
        });
        primitives.push(Primitive::Rect {
            x: left,
            y: geom.box_top,
            width: bandwidth,
            height: geom.box_bottom - geom.box_top,
            style: style.r#box.clone(),
        });
        primitives.push(Primitive::Segment {
            from: geom.median_line[0],
            to: geom.median_line[1],
            style: style.median.clone(),
        });
    }

    Ok(primitives)
}

// =============================================================================
// Grouped Bars
// =============================================================================

/// One filled rectangle per record, offset inside its platform band by
/// the post-type band. Bars grow from the zero line to the value.
pub fn grouped_bar_geometry(
    records: &[AveragedRecord],
    x0: &BandScale,
    x1: &BandScale,
    y: &LinearScale,
    color: &OrdinalScale,
) -> Result<Vec<Primitive>, ChartError> {
    let baseline = y.map(0.0);

    records
        .iter()
        .map(|record| -> Result<Primitive, ChartError> {
            let x = x0.locate(&record.platform)? + x1.locate(&record.post_type)?;
            let top = y.map(record.like_avg);
            Ok(Primitive::Rect {
                x,
                y: top,
                width: x1.bandwidth(),
                height: baseline - top,
                style: RectStyle {
                    fill: color.color(&record.post_type)?.to_string(),
                    stroke: None,
                },
            })
        })
        .collect()
}

// =============================================================================
// Line
// =============================================================================

/// Pixel positions of the points, ordered by the x scale's domain.
/// Points sharing a date keep their input order.
pub fn line_points(points: &[TimePoint], x: &BandScale, y: &LinearScale) -> Result<Vec<(f64, f64)>, ChartError> {
    let by_date = group_by(points.iter(), |p| p.date.clone());
    for date in by_date.keys() {
        x.locate(date)?;
    }

    let mut pixels = Vec::with_capacity(points.len());
    for date in x.domain() {
        let Some(bucket) = by_date.get(date) else {
            continue;
        };
        let px = x.locate(date)?;
        pixels.extend(bucket.iter().map(|p| (px, y.map(p.like_avg))));
    }
    Ok(pixels)
}

/// A single stroked natural-spline path through the points
pub fn line_geometry(
    points: &[TimePoint],
    x: &BandScale,
    y: &LinearScale,
    style: &LineStyle,
) -> Result<Vec<Primitive>, ChartError> {
    let pixels = line_points(points, x, y)?;
    if pixels.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Primitive::Path {
        commands: natural_curve(&pixels),
        style: style.clone(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PathCommand;
    use crate::palette::ColorPalette;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn bar(platform: &str, post_type: &str, like_avg: f64) -> AveragedRecord {
        AveragedRecord {
            platform: platform.to_string(),
            post_type: post_type.to_string(),
            like_avg,
        }
    }

    fn point(date: &str, like_avg: f64) -> TimePoint {
        TimePoint { date: date.to_string(), like_avg }
    }

    #[test]
    fn test_bar_height_from_zero_line() {
        let x0 = BandScale::new(keys(&["X"]), (0.0, 100.0));
        let x1 = BandScale::new(keys(&["Photo"]), (0.0, x0.bandwidth()));
        // y(0) = 350, y(50) = 150
        let y = LinearScale::new((0.0, 100.0), (350.0, -50.0));
        let color = OrdinalScale::new(keys(&["Photo"]), &ColorPalette::post_types());

        let prims = grouped_bar_geometry(&[bar("X", "Photo", 50.0)], &x0, &x1, &y, &color).unwrap();
        match &prims[0] {
            Primitive::Rect { x, y, width, height, style } => {
                assert_eq!(*x, 0.0);
                assert_eq!(*y, 150.0);
                assert_eq!(*width, 100.0);
                assert_eq!(*height, 200.0);
                assert_eq!(style.fill, "#003366");
                assert!(style.stroke.is_none());
            }
            other => panic!("expected rect, got {:?}", other),
        }
    }

    #[test]
    fn test_bar_nested_offsets() {
        let x0 = BandScale::new(keys(&["A", "B"]), (0.0, 200.0));
        let x1 = BandScale::new(keys(&["Image", "Video"]), (0.0, x0.bandwidth()));
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        let color = OrdinalScale::new(keys(&["Image", "Video"]), &ColorPalette::post_types());

        let records = [bar("B", "Video", 5.0), bar("A", "Image", 10.0)];
        let prims = grouped_bar_geometry(&records, &x0, &x1, &y, &color).unwrap();

        let xs: Vec<f64> = prims
            .iter()
            .map(|p| match p {
                Primitive::Rect { x, .. } => *x,
                _ => f64::NAN,
            })
            .collect();
        assert_eq!(xs, vec![150.0, 0.0]);
    }

    #[test]
    fn test_bar_unknown_post_type() {
        let x0 = BandScale::new(keys(&["A"]), (0.0, 100.0));
        let x1 = BandScale::new(keys(&["Image"]), (0.0, 100.0));
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        let color = OrdinalScale::new(keys(&["Image"]), &ColorPalette::post_types());

        let err = grouped_bar_geometry(&[bar("A", "Poll", 1.0)], &x0, &x1, &y, &color).unwrap_err();
        assert_eq!(err, ChartError::UnknownKey { key: "Poll".to_string(), scale: "band" });
    }

    #[test]
    fn test_boxplot_primitives() {
        let x = BandScale::new(keys(&["A", "B"]), (0.0, 200.0)).with_padding(0.5);
        let y = LinearScale::new((0.0, 100.0), (300.0, 50.0));
        let summary = QuantileSummary { min: 0.0, q1: 20.0, median: 50.0, q3: 80.0, max: 100.0 };

        let prims = boxplot_geometry(
            &[("B".to_string(), summary)],
            &x,
            &y,
            &BoxplotStyle::default(),
        )
        .unwrap();
        assert_eq!(prims.len(), 3);

        // Band "B" starts at 125 with bandwidth 50
        match &prims[0] {
            Primitive::Segment { from, to, style } => {
                assert_eq!(*from, (150.0, 300.0));
                assert_eq!(*to, (150.0, 50.0));
                assert_eq!(style.color, "black");
                assert_eq!(style.width, 1.0);
            }
            other => panic!("expected whisker, got {:?}", other),
        }
        match &prims[1] {
            Primitive::Rect { x, y, width, height, style } => {
                assert_eq!(*x, 125.0);
                assert_eq!(*y, 100.0);
                assert_eq!(*width, 50.0);
                assert_eq!(*height, 150.0);
                assert_eq!(style.fill, "cadetblue");
            }
            other => panic!("expected box, got {:?}", other),
        }
        match &prims[2] {
            Primitive::Segment { from, to, style } => {
                assert_eq!(*from, (125.0, 175.0));
                assert_eq!(*to, (175.0, 175.0));
                assert_eq!(style.color, "red");
                assert_eq!(style.width, 2.0);
            }
            other => panic!("expected median, got {:?}", other),
        }
    }

    #[test]
    fn test_line_follows_domain_order() {
        let x = BandScale::new(keys(&["d1", "d2", "d3"]), (0.0, 300.0));
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        let points = [point("d3", 0.0), point("d1", 10.0), point("d2", 5.0)];

        let pixels = line_points(&points, &x, &y).unwrap();
        assert_eq!(pixels, vec![(0.0, 0.0), (100.0, 50.0), (200.0, 100.0)]);
    }

    #[test]
    fn test_line_duplicate_dates_keep_input_order() {
        let x = BandScale::new(keys(&["d1", "d2"]), (0.0, 200.0));
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        let points = [point("d2", 1.0), point("d1", 2.0), point("d2", 3.0)];

        let pixels = line_points(&points, &x, &y).unwrap();
        assert_eq!(pixels, vec![(0.0, 80.0), (100.0, 90.0), (100.0, 70.0)]);
    }

    #[test]
    fn test_line_geometry_single_path() {
        let x = BandScale::new(keys(&["a", "b", "c"]), (0.0, 300.0));
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        let points = [point("a", 1.0), point("b", 5.0), point("c", 2.0)];

        let prims = line_geometry(&points, &x, &y, &LineStyle::new("red", 2.0)).unwrap();
        assert_eq!(prims.len(), 1);
        match &prims[0] {
            Primitive::Path { commands, style } => {
                assert_eq!(commands.len(), 3);
                assert_eq!(commands[0], PathCommand::MoveTo { to: (0.0, 90.0) });
                assert_eq!(style.color, "red");
            }
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_line_unknown_date() {
        let x = BandScale::new(keys(&["a"]), (0.0, 100.0));
        let y = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        assert!(line_points(&[point("z", 1.0)], &x, &y).is_err());
    }
}
