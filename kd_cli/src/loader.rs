use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use kd_core::{DailyPriceRecord, ErrCode, KdError, TradeDate};

/// Column positions resolved from the CSV header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    close: usize,
    high: usize,
    low: usize,
    open: Option<usize>,
    volume: Option<usize>,
}

fn find_column(header: &StringRecord, names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

fn require_column(header: &StringRecord, names: &[&str]) -> Result<usize, KdError> {
    find_column(header, names).ok_or_else(|| {
        KdError::new(
            format!("missing column {:?} in header {:?}", names[0], header),
            ErrCode::SrcDataFormatError,
        )
    })
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, KdError> {
        Ok(Self {
            date: require_column(header, &["date", "time", "timestamp"])?,
            close: require_column(header, &["close", "close_price"])?,
            high: require_column(header, &["high", "high_price"])?,
            low: require_column(header, &["low", "low_price"])?,
            open: find_column(header, &["open", "open_price"]),
            volume: find_column(header, &["volume", "vol"]),
        })
    }
}

fn parse_number(
    record: &StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> Result<f64, KdError> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|e| {
        KdError::new(
            format!("line {}: cannot parse {} {:?}: {}", line, column, raw, e),
            ErrCode::SrcDataFormatError,
        )
    })
}

fn parse_csv_record(
    record: &StringRecord,
    cols: &Columns,
    line: u64,
) -> Result<DailyPriceRecord, KdError> {
    let date: TradeDate = record
        .get(cols.date)
        .unwrap_or("")
        .parse()
        .map_err(|e: KdError| KdError::new(format!("line {}: {}", line, e.msg), e.errcode))?;

    let mut rec = DailyPriceRecord::new(
        date,
        parse_number(record, cols.close, "close", line)?,
        parse_number(record, cols.high, "high", line)?,
        parse_number(record, cols.low, "low", line)?,
    );
    if let Some(idx) = cols.open {
        rec = rec.with_open(parse_number(record, idx, "open", line)?);
    }
    if let Some(idx) = cols.volume {
        rec = rec.with_volume(parse_number(record, idx, "volume", line)?);
    }
    Ok(rec)
}

/// Read daily bars from CSV with a header row naming the columns.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<DailyPriceRecord>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let cols = Columns::from_header(rdr.headers()?)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        records.push(parse_csv_record(&record, &cols, line)?);
    }
    Ok(records)
}

pub fn read_csv_file(path: &Path) -> Result<Vec<DailyPriceRecord>, Box<dyn Error>> {
    let file = File::open(path)?;
    read_records(file)
}

/// Expand directories into the `*.csv` files they contain, sorted by name.
pub fn collect_inputs(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in fs::read_dir(path)? {
                let entry_path = entry?.path();
                if entry_path.extension().and_then(|s| s.to_str()) == Some("csv") {
                    found.push(entry_path);
                }
            }
            found.sort();
            inputs.extend(found);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records() {
        let data = "\
date,open,high,low,close,volume
2020-01-02,10.0,12.0,9.5,11.0,1000
20200103,11.0,13.0,10.5,12.5,1500
";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, TradeDate::from_yyyymmdd(20200102).unwrap());
        assert_eq!(records[0].close_price, 11.0);
        assert_eq!(records[0].high_price, 12.0);
        assert_eq!(records[0].low_price, 9.5);
        assert_eq!(records[0].open_price, Some(10.0));
        assert_eq!(records[1].volume, Some(1500.0));
    }

    #[test]
    fn test_header_is_case_insensitive_and_open_optional() {
        let data = "Date,Close,High,Low\n2020-01-02 00:00:00, 11 ,12,9.5\n";
        let records = read_records(data.as_bytes()).unwrap();
        assert_eq!(records[0].close_price, 11.0);
        assert_eq!(records[0].open_price, None);
    }

    #[test]
    fn test_missing_column() {
        let data = "date,high,low\n2020-01-02,12,9.5\n";
        let err = read_records(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing column \"close\""));
    }

    #[test]
    fn test_bad_price_names_line() {
        let data = "date,close,high,low\n2020-01-02,11,12,9.5\n2020-01-03,abc,12,9.5\n";
        let err = read_records(data.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("SRC_DATA_FORMAT_ERROR"), "{}", msg);
        assert!(msg.contains("line 3"), "{}", msg);
        assert!(msg.contains("cannot parse close \"abc\""), "{}", msg);
    }

    #[test]
    fn test_bad_volume_names_column() {
        let data = "date,close,high,low,volume\n2020-01-02,11,12,9.5,n/a\n";
        let msg = read_records(data.as_bytes()).unwrap_err().to_string();
        assert!(msg.contains("line 2: cannot parse volume \"n/a\""), "{}", msg);
    }

    #[test]
    fn test_collect_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "").unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let single = dir.path().join("a.csv");

        let inputs = collect_inputs(&[dir.path().to_path_buf(), single.clone()]).unwrap();
        assert_eq!(
            inputs,
            vec![dir.path().join("a.csv"), dir.path().join("b.csv"), single]
        );
    }

    #[test]
    fn test_read_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(&path, "date,close,high,low\n20200102,11,12,9.5\n").unwrap();
        assert_eq!(read_csv_file(&path).unwrap().len(), 1);
        assert!(read_csv_file(&dir.path().join("missing.csv")).is_err());
    }
}
