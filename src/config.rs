// Per-chart settings: built-in defaults, JSON config file, style overrides

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::ir::ChartKind;
use crate::palette::ColorPalette;
use crate::record::ParsePolicy;
use crate::OutputFormat;

/// Largest canvas side, in pixels, a chart may request
pub const MAX_DIMENSION: u32 = 10_000;

/// Space between the canvas edge and the plot area, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
}

/// Chart title and axis titles
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Labels {
    pub title: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Fully resolved settings for one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub background: String,
    /// Band padding of the category axis
    pub padding: f64,
    pub palette: ColorPalette,
    pub labels: Labels,
    /// Explicit category order; must name every category in the data
    pub order: Option<Vec<String>>,
    pub policy: ParsePolicy,
}

impl ChartConfig {
    /// Built-in defaults for each chart
    pub fn for_kind(kind: ChartKind) -> Self {
        let base = ChartConfig {
            width: 600,
            height: 400,
            margin: Margin::new(30.0, 30.0, 50.0, 50.0),
            background: "cornsilk".to_string(),
            padding: 0.5,
            palette: ColorPalette::post_types(),
            labels: Labels::default(),
            order: None,
            policy: ParsePolicy::Abort,
        };

        match kind {
            ChartKind::Boxplot => ChartConfig {
                labels: labels("Platform", "Likes"),
                ..base
            },
            ChartKind::GroupedBar => ChartConfig {
                padding: 0.3,
                labels: labels("Platform", "Average Likes"),
                ..base
            },
            ChartKind::Line => ChartConfig {
                margin: Margin::new(50.0, 30.0, 75.0, 50.0),
                labels: labels("Date", "Average Likes"),
                ..base
            },
        }
    }

    /// Overlay the fields set in `options`
    pub fn apply(&mut self, options: &ChartOptions) -> Result<()> {
        if let Some(width) = options.width {
            self.width = dimension("width", width)?;
        }
        if let Some(height) = options.height {
            self.height = dimension("height", height)?;
        }
        if let Some(margin) = &options.margin {
            self.margin.top = margin.top.unwrap_or(self.margin.top);
            self.margin.right = margin.right.unwrap_or(self.margin.right);
            self.margin.bottom = margin.bottom.unwrap_or(self.margin.bottom);
            self.margin.left = margin.left.unwrap_or(self.margin.left);
        }
        if let Some(background) = &options.background {
            self.background = background.clone();
        }
        if let Some(padding) = options.padding {
            if !(0.0..1.0).contains(&padding) {
                return Err(anyhow!("Band padding must be in [0, 1), got {}", padding));
            }
            self.padding = padding;
        }
        if let Some(colors) = &options.palette {
            // A lone entry may name a built-in palette
            let named = match colors.as_slice() {
                [name] => ColorPalette::named(name),
                _ => None,
            };
            self.palette = named
                .or_else(|| ColorPalette::new(colors.clone()))
                .ok_or_else(|| anyhow!("Palette must contain at least one color"))?;
        }
        if let Some(labels) = &options.labels {
            if labels.title.is_some() {
                self.labels.title = labels.title.clone();
            }
            if labels.x.is_some() {
                self.labels.x = labels.x.clone();
            }
            if labels.y.is_some() {
                self.labels.y = labels.y.clone();
            }
        }
        if let Some(order) = &options.order {
            self.order = Some(order.clone());
        }
        Ok(())
    }

    /// Plot area in pixels: `(left, right)` and `(top, bottom)`
    pub fn plot_x_range(&self) -> (f64, f64) {
        (self.margin.left, self.width as f64 - self.margin.right)
    }

    pub fn plot_y_range(&self) -> (f64, f64) {
        (self.margin.top, self.height as f64 - self.margin.bottom)
    }
}

fn dimension(name: &str, value: u32) -> Result<u32> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(anyhow!(
            "Canvas {} must be between 1 and {} pixels, got {}",
            name,
            MAX_DIMENSION,
            value
        ));
    }
    Ok(value)
}

fn labels(x: &str, y: &str) -> Labels {
    Labels {
        title: None,
        x: Some(x.to_string()),
        y: Some(y.to_string()),
    }
}

/// Optional overrides, from the config file or the style DSL
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub margin: Option<MarginOptions>,
    pub background: Option<String>,
    pub padding: Option<f64>,
    pub palette: Option<Vec<String>>,
    pub labels: Option<LabelOptions>,
    pub order: Option<Vec<String>>,
}

impl ChartOptions {
    /// Combine two override sets; fields set in `other` win
    pub fn merge(mut self, other: ChartOptions) -> Self {
        self.width = other.width.or(self.width);
        self.height = other.height.or(self.height);
        self.margin = match (self.margin, other.margin) {
            (Some(a), Some(b)) => Some(MarginOptions {
                top: b.top.or(a.top),
                right: b.right.or(a.right),
                bottom: b.bottom.or(a.bottom),
                left: b.left.or(a.left),
            }),
            (a, b) => b.or(a),
        };
        self.background = other.background.or(self.background);
        self.padding = other.padding.or(self.padding);
        self.palette = other.palette.or(self.palette);
        self.labels = match (self.labels, other.labels) {
            (Some(a), Some(b)) => Some(LabelOptions {
                title: b.title.or(a.title),
                x: b.x.or(a.x),
                y: b.y.or(a.y),
            }),
            (a, b) => b.or(a),
        };
        self.order = other.order.or(self.order);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarginOptions {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelOptions {
    pub title: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Contents of a `--config` JSON file
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub format: Option<OutputFormat>,
    pub policy: Option<ParsePolicy>,
    pub boxplot: Option<ChartOptions>,
    pub bar: Option<ChartOptions>,
    pub line: Option<ChartOptions>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse config JSON")
    }

    pub fn options_for(&self, kind: ChartKind) -> Option<&ChartOptions> {
        match kind {
            ChartKind::Boxplot => self.boxplot.as_ref(),
            ChartKind::GroupedBar => self.bar.as_ref(),
            ChartKind::Line => self.line.as_ref(),
        }
    }

    /// Defaults, then this file's settings for `kind`, then `style`
    pub fn resolve(&self, kind: ChartKind, style: Option<&ChartOptions>) -> Result<ChartConfig> {
        let mut config = ChartConfig::for_kind(kind);
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(options) = self.options_for(kind) {
            config.apply(options)?;
        }
        if let Some(options) = style {
            config.apply(options)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_chart() {
        let boxplot = ChartConfig::for_kind(ChartKind::Boxplot);
        assert_eq!((boxplot.width, boxplot.height), (600, 400));
        assert_eq!(boxplot.margin, Margin::new(30.0, 30.0, 50.0, 50.0));
        assert_eq!(boxplot.padding, 0.5);
        assert_eq!(boxplot.background, "cornsilk");

        let bar = ChartConfig::for_kind(ChartKind::GroupedBar);
        assert_eq!(bar.padding, 0.3);
        assert_eq!(bar.palette.get_color(1), "#ff7f0e");
        assert_eq!(bar.labels.y.as_deref(), Some("Average Likes"));

        let line = ChartConfig::for_kind(ChartKind::Line);
        assert_eq!(line.margin, Margin::new(50.0, 30.0, 75.0, 50.0));
        assert_eq!(line.plot_y_range(), (50.0, 325.0));
        assert_eq!(line.plot_x_range(), (50.0, 570.0));
    }

    #[test]
    fn test_apply_partial_overrides() {
        let mut config = ChartConfig::for_kind(ChartKind::Boxplot);
        let options = ChartOptions {
            width: Some(800),
            margin: Some(MarginOptions { left: Some(80.0), ..Default::default() }),
            labels: Some(LabelOptions { title: Some("Likes".to_string()), ..Default::default() }),
            ..Default::default()
        };
        config.apply(&options).unwrap();

        assert_eq!(config.width, 800);
        assert_eq!(config.height, 400);
        assert_eq!(config.margin, Margin::new(30.0, 30.0, 50.0, 80.0));
        assert_eq!(config.labels.title.as_deref(), Some("Likes"));
        assert_eq!(config.labels.x.as_deref(), Some("Platform"));
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = ChartConfig::for_kind(ChartKind::GroupedBar);
        let padding = ChartOptions { padding: Some(1.0), ..Default::default() };
        assert!(config.apply(&padding).is_err());

        let palette = ChartOptions { palette: Some(vec![]), ..Default::default() };
        assert!(config.apply(&palette).is_err());
    }

    #[test]
    fn test_apply_rejects_oversized_canvas() {
        let mut config = ChartConfig::for_kind(ChartKind::Line);
        let huge = ChartOptions { width: Some(70_000), height: Some(70_000), ..Default::default() };
        let err = config.apply(&huge).unwrap_err();
        assert!(err.to_string().contains("width"));
        assert_eq!((config.width, config.height), (600, 400));

        let zero = ChartOptions { height: Some(0), ..Default::default() };
        assert!(config.apply(&zero).is_err());

        let largest = ChartOptions { width: Some(MAX_DIMENSION), ..Default::default() };
        config.apply(&largest).unwrap();
        assert_eq!(config.width, MAX_DIMENSION);
    }

    #[test]
    fn test_named_palette() {
        let mut config = ChartConfig::for_kind(ChartKind::GroupedBar);
        let options = ChartOptions { palette: Some(vec!["category10".to_string()]), ..Default::default() };
        config.apply(&options).unwrap();
        assert_eq!(config.palette.len(), 10);
        assert_eq!(config.palette.get_color(2), "#2ca02c");

        // A lone color is still a one-color palette
        let single = ChartOptions { palette: Some(vec!["#111111".to_string()]), ..Default::default() };
        config.apply(&single).unwrap();
        assert_eq!(config.palette.colors(), &["#111111".to_string()]);
    }

    #[test]
    fn test_merge_prefers_later() {
        let file = ChartOptions {
            padding: Some(0.2),
            margin: Some(MarginOptions { top: Some(10.0), ..Default::default() }),
            ..Default::default()
        };
        let style = ChartOptions {
            padding: Some(0.4),
            margin: Some(MarginOptions { bottom: Some(60.0), ..Default::default() }),
            ..Default::default()
        };
        let merged = file.merge(style);
        assert_eq!(merged.padding, Some(0.4));
        let margin = merged.margin.unwrap();
        assert_eq!(margin.top, Some(10.0));
        assert_eq!(margin.bottom, Some(60.0));
    }

    #[test]
    fn test_config_file_layers() {
        let file = ConfigFile::from_json(
            r##"{
                "format": "svg",
                "policy": "skip",
                "bar": { "palette": ["#111111", "#222222"], "order": ["B", "A"] }
            }"##,
        )
        .unwrap();

        assert_eq!(file.format, Some(OutputFormat::Svg));
        let bar = file.resolve(ChartKind::GroupedBar, None).unwrap();
        assert_eq!(bar.policy, ParsePolicy::SkipRow);
        assert_eq!(bar.palette.len(), 2);
        assert_eq!(bar.order, Some(vec!["B".to_string(), "A".to_string()]));

        let style = ChartOptions { padding: Some(0.1), ..Default::default() };
        let line = file.resolve(ChartKind::Line, Some(&style)).unwrap();
        assert_eq!(line.padding, 0.1);
        assert_eq!(line.policy, ParsePolicy::SkipRow);
    }

    #[test]
    fn test_config_file_rejects_unknown_fields() {
        assert!(ConfigFile::from_json(r#"{ "pie": {} }"#).is_err());
    }
}
