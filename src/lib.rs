// Library exports for socialplot

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod palette;
pub mod parser;
pub mod runtime;

// Pipeline Modules
pub mod record;
pub mod group;
pub mod stats;
pub mod scale;
pub mod ir;
pub mod curve;
pub mod compiler;
pub mod config;

use serde::Deserialize;

pub use config::{ChartConfig, ConfigFile};
pub use error::{ChartError, ChartWarning};
pub use ir::{ChartKind, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
    /// The scene graph itself, for external renderers
    #[serde(rename = "json")]
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        }
    }
}
