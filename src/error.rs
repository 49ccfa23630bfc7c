use thiserror::Error;

/// Errors raised by the raincloud pipeline before any drawing happens.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("{argument} arg not recognised as valid: {value}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },

    #[error("some scale values are out of bounds: {}", format_pairs(.entries))]
    OutOfRange { entries: Vec<(String, f64)> },

    #[error("group '{label}' is missing from the {argument} map")]
    MissingKey {
        argument: &'static str,
        label: String,
    },
}

fn format_pairs(entries: &[(String, f64)]) -> String {
    entries
        .iter()
        .map(|(label, value)| format!("('{}', {})", label, value))
        .collect::<Vec<_>>()
        .join(", ")
}
