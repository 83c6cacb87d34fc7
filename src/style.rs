// src/style.rs

//! Presentation settings handed to the renderer alongside each summary table.
//! Nothing here influences aggregation.

use serde::{Deserialize, Serialize};

const MONO: &[&str] = &["#8A0008", "#B20710", "#E50914", "#FF4A55", "#FF7A82", "#FFB4B7"];
const COMPLEMENTARY: &[&str] = &["#E50914", "#09E5DA", "#079C94", "#73FFF6"];
const TRIADIC: &[&str] = &["#E50914", "#1409E5", "#09E514"];
const TETRAD: &[&str] = &["#E50914", "#09E5DA", "#E5DA09", "#5A09E5"];
const ACCENT: &[&str] = &["#E50914"];
const CONTINUOUS_RED: &[(f32, &str)] = &[(0.0, "#221F1F"), (0.5, "#E50914"), (1.0, "#FFB4B7")];
const CONTINUOUS_MAP: &[(f32, &str)] = &[(0.0, "#221F1F"), (0.5, "#E50914"), (1.0, "#FFE5E7")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    Mono,
    Complementary,
    Triadic,
    Tetrad,
    /// Triadic followed by mono, for charts with many categories.
    TriadicMono,
    /// Single brand red.
    Accent,
    ContinuousRed,
    ContinuousMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scale", rename_all = "snake_case")]
pub enum Colors {
    Discrete { colors: Vec<&'static str> },
    Continuous { stops: Vec<(f32, &'static str)> },
}

impl Palette {
    pub fn colors(self) -> Colors {
        let discrete = |c: &[&'static str]| Colors::Discrete { colors: c.to_vec() };
        match self {
            Palette::Mono => discrete(MONO),
            Palette::Complementary => discrete(COMPLEMENTARY),
            Palette::Triadic => discrete(TRIADIC),
            Palette::Tetrad => discrete(TETRAD),
            Palette::TriadicMono => Colors::Discrete {
                colors: TRIADIC.iter().chain(MONO).copied().collect(),
            },
            Palette::Accent => discrete(ACCENT),
            Palette::ContinuousRed => Colors::Continuous {
                stops: CONTINUOUS_RED.to_vec(),
            },
            Palette::ContinuousMap => Colors::Continuous {
                stops: CONTINUOUS_MAP.to_vec(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Page-level colors for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub template: &'static str,
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub font_color: &'static str,
}

impl Theme {
    pub fn layout(self) -> Layout {
        match self {
            Theme::Dark => Layout {
                template: "plotly_dark",
                paper_bgcolor: "#000000",
                plot_bgcolor: "#000000",
                font_color: "#FFFFFF",
            },
            Theme::Light => Layout {
                template: "plotly_white",
                paper_bgcolor: "#FFFFFF",
                plot_bgcolor: "#FFFFFF",
                font_color: "#221F1F",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub theme: Theme,
    /// When set, replaces every chart's own palette.
    pub palette: Option<Palette>,
}

impl StyleConfig {
    pub fn palette_for(&self, chart_default: Palette) -> Palette {
        self.palette.unwrap_or(chart_default)
    }
}
