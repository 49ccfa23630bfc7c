use anyhow::Result;
use std::collections::HashMap;
use std::fmt;

use crate::data::{parse_numeric, PlotData};
use crate::error::PlotError;

/// Sort key function for `GroupOrder::ByKey`: receives a group's label and
/// its data series, returns an ordinal.
pub type OrderKeyFn = Box<dyn Fn(&str, &[f64]) -> f64>;

/// How the extracted groups are ordered along the categorical axis.
pub enum GroupOrder {
    /// First-seen order of the category labels.
    Discovery,
    /// Alphabetic by the label itself.
    ByLabel,
    /// Explicit label -> ordinal mapping. Every discovered label must be present.
    ByRank(HashMap<String, f64>),
    /// Ordinal derived from the group's data (e.g. group size or mean).
    ByKey(OrderKeyFn),
}

impl Default for GroupOrder {
    fn default() -> Self {
        GroupOrder::Discovery
    }
}

impl fmt::Debug for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOrder::Discovery => write!(f, "Discovery"),
            GroupOrder::ByLabel => write!(f, "ByLabel"),
            GroupOrder::ByRank(map) => f.debug_tuple("ByRank").field(map).finish(),
            GroupOrder::ByKey(_) => write!(f, "ByKey(<fn>)"),
        }
    }
}

impl GroupOrder {
    /// Parse a CLI ordering spec: "discovery", "label", or a JSON object
    /// mapping labels to ordinals.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "discovery" | "none" => Ok(GroupOrder::Discovery),
            "label" => Ok(GroupOrder::ByLabel),
            _ => serde_json::from_str::<HashMap<String, f64>>(raw)
                .map(GroupOrder::ByRank)
                .map_err(|_| {
                    PlotError::InvalidArgument {
                        argument: "group_order",
                        value: raw.to_string(),
                    }
                    .into()
                }),
        }
    }
}

/// Index-aligned group labels and data series. `labels[i]` names the group
/// whose observations are `values[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl Groups {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Split the value column into ordered per-category series.
///
/// Without `group_by` there is exactly one group, labelled by the value
/// column's name. With `group_by`, categories are discovered in row order
/// and then arranged according to `order`; `reverse` flips the final order
/// in every mode.
pub fn extract_groups(
    data: &PlotData,
    column: &str,
    group_by: Option<&str>,
    order: &GroupOrder,
    reverse: bool,
) -> Result<Groups> {
    let Some(group_col) = group_by else {
        let mut groups = Groups {
            labels: vec![column.to_string()],
            values: vec![data.numeric_column(column)?],
        };
        if reverse {
            groups.labels.reverse();
            groups.values.reverse();
        }
        return Ok(groups);
    };

    let (mut labels, mut values) = split_by_category(data, column, group_col)?;

    match order {
        GroupOrder::Discovery => {}
        GroupOrder::ByLabel => {
            let mut pairs: Vec<(String, Vec<f64>)> =
                labels.into_iter().zip(values).collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            (labels, values) = pairs.into_iter().unzip();
        }
        GroupOrder::ByRank(map) => {
            // Resolve every rank up front so a missing label fails before
            // anything is reordered or drawn.
            let keys: Vec<f64> = labels
                .iter()
                .map(|label| {
                    map.get(label).copied().ok_or(PlotError::MissingKey {
                        argument: "group_order",
                        label: label.clone(),
                    })
                })
                .collect::<Result<_, _>>()?;
            (labels, values) = sort_by_keys(keys, labels, values);
        }
        GroupOrder::ByKey(key_fn) => {
            let keys: Vec<f64> = labels
                .iter()
                .zip(&values)
                .map(|(label, series)| key_fn(label, series))
                .collect();
            (labels, values) = sort_by_keys(keys, labels, values);
        }
    }

    if reverse {
        labels.reverse();
        values.reverse();
    }

    Ok(Groups { labels, values })
}

/// Partition rows by the grouping column, categories in first-seen order.
fn split_by_category(
    data: &PlotData,
    column: &str,
    group_col: &str,
) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let value_idx = data.column_index(column)?;
    let group_idx = data.column_index(group_col)?;

    let mut labels: Vec<String> = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for row in &data.rows {
        let label = &row[group_idx];
        let value = parse_numeric(&row[value_idx], column)?;
        let slot = *slots.entry(label.clone()).or_insert_with(|| {
            labels.push(label.clone());
            values.push(Vec::new());
            labels.len() - 1
        });
        values[slot].push(value);
    }

    Ok((labels, values))
}

/// Stable-sort index-aligned labels/values by precomputed keys.
fn sort_by_keys(
    keys: Vec<f64>,
    labels: Vec<String>,
    values: Vec<Vec<f64>>,
) -> (Vec<String>, Vec<Vec<f64>>) {
    let mut triples: Vec<(f64, String, Vec<f64>)> = keys
        .into_iter()
        .zip(labels.into_iter().zip(values))
        .map(|(key, (label, series))| (key, label, series))
        .collect();
    triples.sort_by(|a, b| a.0.total_cmp(&b.0));
    triples.into_iter().map(|(_, label, series)| (label, series)).unzip()
}
