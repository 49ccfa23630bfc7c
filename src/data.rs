use anyhow::{anyhow, Context, Result};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct PlotData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PlotData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create PlotData from an existing CsvData struct (for CLI support)
    pub fn from_csv(csv: crate::csv_reader::CsvData) -> Self {
        Self {
            headers: csv.headers,
            rows: csv.rows,
        }
    }

    /// Create PlotData from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        // Extract headers from the first object
        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::new();
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::new();
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => "".to_string(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Find a column position by name (case-insensitive).
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Column '{}' not found", name))
    }

    /// Extract a whole column parsed as numbers, in stored row order.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .map(|row| parse_numeric(&row[idx], name))
            .collect()
    }
}

pub(crate) fn parse_numeric(raw: &str, column: &str) -> Result<f64> {
    raw.parse::<f64>()
        .with_context(|| format!("Failed to parse value '{}' in column '{}'", raw, column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let value = json!([
            {"x": 1.5, "group": "a"},
            {"x": 2, "group": "b"}
        ]);
        let data = PlotData::from_json(&value).unwrap();
        assert_eq!(data.headers.len(), 2);
        assert_eq!(data.rows.len(), 2);
    }

    #[test]
    fn test_column_index_case_insensitive() {
        let data = PlotData::new(
            vec!["Value".to_string()],
            vec![vec!["1.0".to_string()]],
        );
        assert_eq!(data.column_index("value").unwrap(), 0);
        assert!(data.column_index("missing").is_err());
    }

    #[test]
    fn test_numeric_column() {
        let data = PlotData::new(
            vec!["x".to_string()],
            vec![vec!["1.0".to_string()], vec!["2.5".to_string()]],
        );
        assert_eq!(data.numeric_column("x").unwrap(), vec![1.0, 2.5]);
    }

    #[test]
    fn test_numeric_column_rejects_non_numeric() {
        let data = PlotData::new(
            vec!["x".to_string()],
            vec![vec!["oops".to_string()]],
        );
        assert!(data.numeric_column("x").is_err());
    }
}
