// Chart specifications produced by the advisor and read by the transformer

use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of chart a spec describes.
///
/// Unrecognized kind names are kept in `Other` so a spec written by a newer
/// front-end still loads; the transformer renders them as "No data".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
    Radar,
    PolarArea,
    Scatter,
    Bubble,
    Histogram,
    Table,
    Other(String),
}

impl ChartKind {
    pub fn name(&self) -> &str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Radar => "radar",
            ChartKind::PolarArea => "polarArea",
            ChartKind::Scatter => "scatter",
            ChartKind::Bubble => "bubble",
            ChartKind::Histogram => "histogram",
            ChartKind::Table => "table",
            ChartKind::Other(name) => name,
        }
    }
}

impl From<String> for ChartKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "bar" => ChartKind::Bar,
            "line" => ChartKind::Line,
            "pie" => ChartKind::Pie,
            "doughnut" => ChartKind::Doughnut,
            "radar" => ChartKind::Radar,
            "polarArea" => ChartKind::PolarArea,
            "scatter" => ChartKind::Scatter,
            "bubble" => ChartKind::Bubble,
            "histogram" => ChartKind::Histogram,
            "table" => ChartKind::Table,
            _ => ChartKind::Other(name),
        }
    }
}

impl From<ChartKind> for String {
    fn from(kind: ChartKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Comparison applied by a filter predicate. Unknown operators pass every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOp {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
    Other(String),
}

impl From<String> for FilterOp {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => FilterOp::Equals,
            "notEquals" => FilterOp::NotEquals,
            "greaterThan" => FilterOp::GreaterThan,
            "lessThan" => FilterOp::LessThan,
            "contains" => FilterOp::Contains,
            _ => FilterOp::Other(name),
        }
    }
}

impl From<FilterOp> for String {
    fn from(op: FilterOp) -> Self {
        match op {
            FilterOp::Equals => "equals".to_string(),
            FilterOp::NotEquals => "notEquals".to_string(),
            FilterOp::GreaterThan => "greaterThan".to_string(),
            FilterOp::LessThan => "lessThan".to_string(),
            FilterOp::Contains => "contains".to_string(),
            FilterOp::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub operation: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(column: impl Into<String>, operation: FilterOp, value: impl Into<Value>) -> Self {
        Filter {
            column: column.into(),
            operation,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFn {
    Sum,
    Average,
    Count,
    Min,
    Max,
}

/// Aggregation directive: function plus the column it reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub function: AggregateFn,
    pub column: String,
}

impl Aggregation {
    pub fn new(function: AggregateFn, column: impl Into<String>) -> Self {
        Aggregation {
            function,
            column: column.into(),
        }
    }
}

/// Complete chart specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub date_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl ChartSpec {
    /// New spec with a fresh id and both timestamps set to now.
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self::created_at(kind, title, Utc::now())
    }

    pub fn created_at(kind: ChartKind, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        ChartSpec {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            x_axis: None,
            y_axis: None,
            filters: Vec::new(),
            aggregation: None,
            group_by: None,
            color: None,
            date_created: now,
            last_modified: now,
        }
    }

    pub fn with_x_axis(mut self, column: impl Into<String>) -> Self {
        self.x_axis = Some(column.into());
        self
    }

    pub fn with_y_axis(mut self, column: impl Into<String>) -> Self {
        self.y_axis = Some(column.into());
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by = Some(column.into());
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}
