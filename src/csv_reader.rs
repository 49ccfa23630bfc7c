use anyhow::{Context, Result};
use std::io::Read;

/// Raw tabular data read from a CSV source.
#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV data from stdin (the CLI's input channel).
pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(std::io::stdin().lock())
}

/// Read CSV data from any reader. The first record is treated as headers.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    if rows.is_empty() {
        anyhow::bail!("CSV must contain at least one data row");
    }

    Ok(CsvData { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv() {
        let csv = "x,group\n1.0,a\n2.0,b\n";
        let data = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["x", "group"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0], vec!["1.0", "a"]);
    }

    #[test]
    fn test_read_csv_rejects_header_only() {
        let csv = "x,group\n";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_csv_trims_fields() {
        let csv = "x, group\n1.0 , a\n";
        let data = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.headers[1], "group");
        assert_eq!(data.rows[0][1], "a");
    }
}
