use anyhow::Result;
use std::collections::HashMap;

use crate::error::PlotError;
use crate::group::Groups;

/// How each group's cloud is shrunk relative to its full width.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CloudScale {
    /// No scaling: every cloud at full width.
    #[default]
    None,
    /// Scale each cloud by its group's size relative to the largest group.
    Max,
    /// Explicit label -> factor mapping; every factor must lie in [0, 1].
    ByLabel(HashMap<String, f64>),
}

impl CloudScale {
    /// Parse a CLI scaling spec: "none", "max", or a JSON object mapping
    /// labels to factors.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "none" => Ok(CloudScale::None),
            "max" => Ok(CloudScale::Max),
            _ => serde_json::from_str::<HashMap<String, f64>>(raw)
                .map(CloudScale::ByLabel)
                .map_err(|_| {
                    PlotError::InvalidArgument {
                        argument: "scale_clouds",
                        value: raw.to_string(),
                    }
                    .into()
                }),
        }
    }
}

/// Compute one scale factor per group, index-aligned with `groups`.
/// Every returned factor lies in [0, 1].
pub fn resolve_scales(groups: &Groups, scale: &CloudScale) -> Result<Vec<f64>> {
    match scale {
        CloudScale::None => Ok(vec![1.0; groups.len()]),

        CloudScale::Max => {
            let largest = groups.values.iter().map(|v| v.len()).max().unwrap_or(0);
            Ok(groups
                .values
                .iter()
                .map(|series| {
                    if largest == 0 || series.len() == largest {
                        1.0
                    } else {
                        series.len() as f64 / largest as f64
                    }
                })
                .collect())
        }

        CloudScale::ByLabel(map) => {
            let mut out_of_bounds: Vec<(String, f64)> = map
                .iter()
                .filter(|(_, &v)| !(0.0..=1.0).contains(&v))
                .map(|(k, &v)| (k.clone(), v))
                .collect();
            if !out_of_bounds.is_empty() {
                // Deterministic message order regardless of map iteration.
                out_of_bounds.sort_by(|a, b| a.0.cmp(&b.0));
                return Err(PlotError::OutOfRange {
                    entries: out_of_bounds,
                }
                .into());
            }

            groups
                .labels
                .iter()
                .map(|label| {
                    map.get(label).copied().ok_or_else(|| {
                        PlotError::MissingKey {
                            argument: "scale_clouds",
                            label: label.clone(),
                        }
                        .into()
                    })
                })
                .collect()
        }
    }
}
