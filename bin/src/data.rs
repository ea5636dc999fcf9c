//! Data loading utilities for the ronda CLI.

use std::path::Path;

use ndarray::Array2;
use polars::prelude::*;
use ronda_traits::{Date, Panel, Result, RondaError};

/// Load a wide price table from a delimited file.
///
/// The first column holds the observation date; every remaining column is one
/// asset's price series, with the header row supplying the symbols. Files
/// ending in `.tsv` or `.txt` are read as tab-separated, everything else as
/// comma-separated. Empty cells become undefined entries in the panel.
pub(crate) fn load_price_panel(path: &Path) -> Result<Panel> {
    let separator = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv" | "txt") => b'\t',
        _ => b',',
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    panel_from_frame(&df)
}

/// Convert a wide dataframe (date column first, one column per asset) into a
/// price panel.
pub(crate) fn panel_from_frame(df: &DataFrame) -> Result<Panel> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();

    let date_name = names
        .first()
        .ok_or_else(|| RondaError::MissingColumn("price table has no columns".to_string()))?;
    if names.len() < 2 {
        return Err(RondaError::MissingColumn(
            "price table has no asset columns".to_string(),
        ));
    }

    let dates = column_dates(df.column(date_name)?.as_materialized_series())?;
    let symbols: Vec<String> = names[1..].to_vec();

    let mut values = Array2::from_elem((dates.len(), symbols.len()), f64::NAN);
    for (a, name) in symbols.iter().enumerate() {
        let series = df
            .column(name.as_str())?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        for (t, v) in series.f64()?.into_iter().enumerate() {
            values[[t, a]] = v.unwrap_or(f64::NAN);
        }
    }

    Panel::new(dates, symbols, values)
}

/// Decode a date column that may arrive as a native date, an integer in
/// YYYYMMDD form, or a string.
fn column_dates(series: &Series) -> Result<Vec<Date>> {
    match series.dtype() {
        DataType::Date => series
            .date()?
            .into_iter()
            .map(|d| {
                let days = d.ok_or_else(|| {
                    RondaError::InvalidDate("date column contains a null entry".to_string())
                })?;
                // Polars stores dates as days since the Unix epoch; chrono
                // counts from the common era. 719163 bridges the two.
                Date::from_num_days_from_ce_opt(days + 719_163).ok_or_else(|| {
                    RondaError::InvalidDate(format!("day offset {days} out of range"))
                })
            })
            .collect(),
        DataType::Int32 | DataType::Int64 => {
            let casted = series.cast(&DataType::Int64)?;
            casted
                .i64()?
                .into_iter()
                .map(|v| {
                    let v = v.ok_or_else(|| {
                        RondaError::InvalidDate("date column contains a null entry".to_string())
                    })?;
                    parse_yyyymmdd(v)
                })
                .collect()
        }
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| {
                let v = v.ok_or_else(|| {
                    RondaError::InvalidDate("date column contains a null entry".to_string())
                })?;
                parse_date(v)
            })
            .collect(),
        other => Err(RondaError::InvalidDate(format!(
            "unsupported date column type: {other}"
        ))),
    }
}

/// Parse a compact integer date such as `20240115`.
fn parse_yyyymmdd(v: i64) -> Result<Date> {
    let year = i32::try_from(v / 10_000)
        .map_err(|_| RondaError::InvalidDate(format!("{v} is not a YYYYMMDD date")))?;
    let month = ((v / 100) % 100) as u32;
    let day = (v % 100) as u32;
    Date::from_ymd_opt(year, month, day)
        .ok_or_else(|| RondaError::InvalidDate(format!("{v} is not a YYYYMMDD date")))
}

/// Parse a date string in YYYY-MM-DD, YYYY/MM/DD, or YYYYMMDD format.
pub(crate) fn parse_date(date_str: &str) -> Result<Date> {
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(d) = Date::parse_from_str(date_str, fmt) {
            return Ok(d);
        }
    }
    Err(RondaError::InvalidDate(format!(
        "could not parse '{date_str}' as a date"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-01-15").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);

        assert_eq!(parse_date("2024/01/15").unwrap(), date);
        assert_eq!(parse_date("20240115").unwrap(), date);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("invalid").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_parse_yyyymmdd() {
        let date = parse_yyyymmdd(20231231).unwrap();
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), 12);
        assert_eq!(date.day(), 31);

        assert!(parse_yyyymmdd(20230230).is_err());
    }

    #[test]
    fn test_panel_from_frame() {
        let df = df!(
            "Date" => ["2024-01-02", "2024-01-03", "2024-01-04"],
            "AAA" => [100.0, 101.0, 102.0],
            "BBB" => [Some(50.0), None, Some(51.0)],
        )
        .unwrap();

        let panel = panel_from_frame(&df).unwrap();
        assert_eq!(panel.n_dates(), 3);
        assert_eq!(panel.symbols(), &["AAA".to_string(), "BBB".to_string()]);
        assert_eq!(panel.get(0, 0), 100.0);
        assert!(panel.get(1, 1).is_nan());
        assert_eq!(panel.get(2, 1), 51.0);
    }

    #[test]
    fn test_panel_from_frame_integer_dates() {
        let df = df!(
            "Date" => [20240102i64, 20240103],
            "AAA" => [100.0, 101.0],
        )
        .unwrap();

        let panel = panel_from_frame(&df).unwrap();
        assert_eq!(panel.dates()[0], Date::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(panel.dates()[1], Date::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_panel_from_frame_no_assets() {
        let df = df!("Date" => ["2024-01-02"]).unwrap();
        assert!(matches!(
            panel_from_frame(&df),
            Err(RondaError::MissingColumn(_))
        ));
    }
}
