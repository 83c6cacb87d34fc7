// src/render.rs

//! Hand-off to the external chart renderer: a JSON payload describing marks,
//! encodings and colors, or a plain text table for terminals.

use arrow::{error::ArrowError, json::ArrayWriter, record_batch::RecordBatch, util::pretty};
use serde::Serialize;

use crate::charts::{Chart, ChartId, ChartKind};
use crate::error::ChartResult;
use crate::style::{Colors, Layout, StyleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Which summary column feeds which visual channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Encoding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'static str>,
    /// Hierarchy levels for treemaps, outermost first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Box plots draw every underlying point.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub all_points: bool,
}

pub fn encoding_for(id: ChartId) -> Encoding {
    match id {
        ChartId::Fig1 => Encoding {
            x: Some("type"),
            y: Some("count"),
            color: Some("type"),
            text: Some("count"),
            ..Encoding::default()
        },
        ChartId::Fig2 => Encoding {
            x: Some("release_year"),
            y: Some("count"),
            ..Encoding::default()
        },
        ChartId::Fig3 => Encoding {
            x: Some("count"),
            y: Some("country"),
            color: Some("country"),
            orientation: Some(Orientation::Horizontal),
            ..Encoding::default()
        },
        ChartId::Fig4 => Encoding {
            x: Some("rating"),
            y: Some("count"),
            color: Some("rating"),
            ..Encoding::default()
        },
        ChartId::Fig5 => Encoding {
            path: vec!["genre"],
            values: Some("count"),
            color: Some("count"),
            ..Encoding::default()
        },
        ChartId::Fig6 => Encoding {
            y: Some("duration_value"),
            all_points: true,
            ..Encoding::default()
        },
        ChartId::Fig7 => Encoding {
            x: Some("decade"),
            y: Some("duration_value"),
            text: Some("duration_value"),
            color: Some("decade"),
            ..Encoding::default()
        },
        ChartId::Fig8 => Encoding {
            locations: Some("country"),
            location_mode: Some("country names"),
            color: Some("count"),
            ..Encoding::default()
        },
        ChartId::Fig9 => Encoding {
            x: Some("added_month"),
            y: Some("count"),
            color: Some("added_month"),
            ..Encoding::default()
        },
        ChartId::Fig10 => Encoding {
            path: vec!["rating", "type"],
            values: Some("duration_value"),
            color: Some("duration_value"),
            ..Encoding::default()
        },
    }
}

/// Everything the renderer needs for one chart.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPayload {
    pub id: ChartId,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: ChartKind,
    pub encoding: Encoding,
    pub palette: Colors,
    pub layout: Layout,
    pub data: serde_json::Value,
}

pub fn payload(chart: &Chart, style: &StyleConfig) -> ChartResult<RenderPayload> {
    let meta = chart.id.meta();
    Ok(RenderPayload {
        id: chart.id,
        title: chart.title,
        description: chart.description,
        kind: meta.kind,
        encoding: encoding_for(chart.id),
        palette: style.palette_for(meta.palette).colors(),
        layout: style.theme.layout(),
        data: rows_json(&chart.table)?,
    })
}

/// Summary rows as a JSON array of objects keyed by column name.
pub fn rows_json(batch: &RecordBatch) -> ChartResult<serde_json::Value> {
    let mut writer = ArrayWriter::new(Vec::new());
    writer.write(batch)?;
    writer.finish()?;
    let buf = writer.into_inner();
    if buf.is_empty() {
        return Ok(serde_json::Value::Array(Vec::new()));
    }
    let rows: serde_json::Value =
        serde_json::from_slice(&buf).map_err(|e| ArrowError::JsonError(e.to_string()))?;
    Ok(rows)
}

/// Title, table and description as terminal text.
pub fn text_report(chart: &Chart) -> ChartResult<String> {
    let table = pretty::pretty_format_batches(std::slice::from_ref(&chart.table))?;
    Ok(format!(
        "{}\n{}\n\nDescription\n{}\n",
        chart.title, table, chart.description
    ))
}
