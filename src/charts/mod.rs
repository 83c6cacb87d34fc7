// src/charts/mod.rs

pub mod calendar;
pub mod catalog;
pub mod counts;
pub mod duration;
pub mod geography;

use arrow::record_batch::RecordBatch;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use tracing::{debug, warn};

use crate::dataset::PreparedTable;
use crate::error::{ChartError, ChartResult};
use crate::style::Palette;

/// The ten chart views. Parsed only from the exact strings `fig1`..`fig10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartId {
    Fig1,
    Fig2,
    Fig3,
    Fig4,
    Fig5,
    Fig6,
    Fig7,
    Fig8,
    Fig9,
    Fig10,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Treemap,
    Box,
    Choropleth,
}

/// Fixed text and presentation hints for one chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartMeta {
    pub title: &'static str,
    pub description: &'static str,
    /// Entry shown in the selection menu.
    pub label: &'static str,
    pub kind: ChartKind,
    pub palette: Palette,
}

pub type Routine = fn(&PreparedTable) -> ChartResult<RecordBatch>;

impl ChartId {
    pub const ALL: [ChartId; 10] = [
        ChartId::Fig1,
        ChartId::Fig2,
        ChartId::Fig3,
        ChartId::Fig4,
        ChartId::Fig5,
        ChartId::Fig6,
        ChartId::Fig7,
        ChartId::Fig8,
        ChartId::Fig9,
        ChartId::Fig10,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::Fig1 => "fig1",
            ChartId::Fig2 => "fig2",
            ChartId::Fig3 => "fig3",
            ChartId::Fig4 => "fig4",
            ChartId::Fig5 => "fig5",
            ChartId::Fig6 => "fig6",
            ChartId::Fig7 => "fig7",
            ChartId::Fig8 => "fig8",
            ChartId::Fig9 => "fig9",
            ChartId::Fig10 => "fig10",
        }
    }

    /// The aggregation behind this chart.
    pub fn routine(&self) -> Routine {
        match self {
            ChartId::Fig1 => catalog::type_counts,
            ChartId::Fig2 => catalog::titles_per_year,
            ChartId::Fig3 => geography::top_countries,
            ChartId::Fig4 => catalog::rating_counts,
            ChartId::Fig5 => catalog::genre_counts,
            ChartId::Fig6 => duration::movie_durations,
            ChartId::Fig7 => duration::mean_duration_by_decade,
            ChartId::Fig8 => geography::country_counts,
            ChartId::Fig9 => calendar::added_per_month,
            ChartId::Fig10 => duration::mean_duration_by_rating_and_type,
        }
    }

    pub fn meta(&self) -> ChartMeta {
        match self {
            ChartId::Fig1 => ChartMeta {
                title: "Chart 1: Movies vs Series",
                description: "How many movies and how many series the catalog holds.",
                label: "1) Movies vs Series",
                kind: ChartKind::Bar,
                palette: Palette::Mono,
            },
            ChartId::Fig2 => ChartMeta {
                title: "Chart 2: Titles released per year",
                description: "How many titles were released each year.",
                label: "2) Titles per year",
                kind: ChartKind::Line,
                palette: Palette::Accent,
            },
            ChartId::Fig3 => ChartMeta {
                title: "Chart 3: Top 10 countries by titles",
                description: "The countries contributing the most content to the catalog.",
                label: "3) Top countries",
                kind: ChartKind::Bar,
                palette: Palette::Complementary,
            },
            ChartId::Fig4 => ChartMeta {
                title: "Chart 4: Rating distribution",
                description: "The most common age ratings in the catalog.",
                label: "4) Ratings",
                kind: ChartKind::Bar,
                palette: Palette::TriadicMono,
            },
            ChartId::Fig5 => ChartMeta {
                title: "Chart 5: Genre treemap",
                description: "The most popular genres in the catalog.",
                label: "5) Genres",
                kind: ChartKind::Treemap,
                palette: Palette::ContinuousRed,
            },
            ChartId::Fig6 => ChartMeta {
                title: "Chart 6: Movie duration",
                description: "Distribution of movie running times.",
                label: "6) Movie duration",
                kind: ChartKind::Box,
                palette: Palette::Accent,
            },
            ChartId::Fig7 => ChartMeta {
                title: "Chart 7: Average duration by decade",
                description: "How the average movie running time has changed over the decades.",
                label: "7) Duration by decade",
                kind: ChartKind::Bar,
                palette: Palette::ContinuousRed,
            },
            ChartId::Fig8 => ChartMeta {
                title: "Chart 8: World map of titles",
                description: "Number of titles per country.",
                label: "8) World map",
                kind: ChartKind::Choropleth,
                palette: Palette::ContinuousMap,
            },
            ChartId::Fig9 => ChartMeta {
                title: "Chart 9: Titles added per month",
                description: "The months in which the most content was added to the catalog.",
                label: "9) Added per month",
                kind: ChartKind::Bar,
                palette: Palette::ContinuousRed,
            },
            ChartId::Fig10 => ChartMeta {
                title: "Chart 10: Duration by rating and type",
                description: "Average duration for each rating, split by type.",
                label: "10) Duration by rating and type",
                kind: ChartKind::Treemap,
                palette: Palette::ContinuousRed,
            },
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartId {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ChartError::UnknownChartId(s.to_string()))
    }
}

/// A summary table ready for rendering.
#[derive(Debug, Clone)]
pub struct Chart {
    pub id: ChartId,
    pub title: &'static str,
    pub description: &'static str,
    pub table: RecordBatch,
}

/// Run the routine for `id` against `table`.
pub fn aggregate_id(id: ChartId, table: &PreparedTable) -> ChartResult<Chart> {
    let meta = id.meta();
    let summary = (id.routine())(table)?;
    debug!(chart = %id, rows = summary.num_rows(), "aggregated");
    Ok(Chart {
        id,
        title: meta.title,
        description: meta.description,
        table: summary,
    })
}

/// Parse `id` and run its routine. Unknown ids fail with `UnknownChartId`.
pub fn aggregate(id: &str, table: &PreparedTable) -> ChartResult<Chart> {
    let id = id.parse::<ChartId>()?;
    aggregate_id(id, table)
}

/// Dispatches chart selections against one prepared table.
#[derive(Debug, Clone)]
pub struct Router {
    table: Arc<PreparedTable>,
}

impl Router {
    pub fn new(table: Arc<PreparedTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PreparedTable {
        &self.table
    }

    /// Handle one selection. An unknown id rejects only this request.
    pub fn select(&self, id: &str) -> ChartResult<Chart> {
        aggregate(id, &self.table).inspect_err(|e| {
            if let ChartError::UnknownChartId(_) = e {
                warn!(selection = id, "rejected chart selection");
            }
        })
    }

    pub fn chart(&self, id: ChartId) -> ChartResult<Chart> {
        aggregate_id(id, &self.table)
    }

    /// Every chart, computed in parallel, returned in `ChartId::ALL` order.
    pub fn aggregate_all(&self) -> Vec<ChartResult<Chart>> {
        ChartId::ALL
            .par_iter()
            .map(|id| aggregate_id(*id, &self.table))
            .collect()
    }
}
