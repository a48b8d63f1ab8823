use std::collections::HashMap;

use log::debug;

use crate::holdings::HistoryPoint;
use crate::utils::parse_iso_date;

/// One decoded CSV record keyed by the raw header cell text.
pub type RawRecord = HashMap<String, String>;

/// Decodes a delimited holdings payload into header-keyed records.
///
/// The first line supplies the header. The delimiter is a comma unless the
/// header contains none and a tab instead. Cells are taken verbatim with no
/// quoting rules; records shorter than the header get empty strings for the
/// missing trailing fields.
pub fn parse_delimited(text: &str) -> Vec<RawRecord> {
    let mut lines = text
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let delimiter = detect_delimiter(header_line);
    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|cell| cell.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for line in lines {
        let cells: Vec<&str> = line.split(delimiter).collect();
        let mut record = RawRecord::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let cell = cells.get(idx).map(|c| c.trim()).unwrap_or("");
            record.insert(header.clone(), cell.to_string());
        }
        records.push(record);
    }
    records
}

fn detect_delimiter(header_line: &str) -> char {
    if header_line.contains(',') {
        ','
    } else if header_line.contains('\t') {
        '\t'
    } else {
        ','
    }
}

/// Parses an externally supplied portfolio-value history CSV.
///
/// Rows need a parseable ISO date and a finite positive value under one of
/// the accepted value headers; everything else is dropped. The result is
/// sorted by date ascending.
pub fn parse_history_csv(text: &str) -> Vec<HistoryPoint> {
    let mut points: Vec<HistoryPoint> = parse_delimited(text)
        .into_iter()
        .filter_map(|record| {
            let date_raw = lookup(&record, &["date", "Date", "DATE"])?;
            let value_raw = lookup(&record, &["total value", "Total Value", "value", "Value", "total", "Total"])?;
            let date = match parse_iso_date(date_raw) {
                Some(date) => date,
                None => {
                    debug!("Skipping history row with unparseable date: {date_raw}");
                    return None;
                }
            };
            let value: f64 = value_raw.parse().ok()?;
            if !value.is_finite() || value <= 0.0 {
                return None;
            }
            Some(HistoryPoint { date, value })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

fn lookup<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| record.get(*key))
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimited_comma() {
        let records = parse_delimited("ticker,shares,price\nNVDA,10,181.50\nAAPL,5,");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["ticker"], "NVDA");
        assert_eq!(records[0]["price"], "181.50");
        assert_eq!(records[1]["price"], "");
    }

    #[test]
    fn test_parse_delimited_tab_fallback() {
        let records = parse_delimited("ticker\tshares\nMSFT\t3");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["shares"], "3");
    }

    #[test]
    fn test_parse_delimited_skips_blank_lines_and_crlf() {
        let records = parse_delimited("ticker,shares\r\n\r\nNVDA,10\r\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["ticker"], "NVDA");
    }

    #[test]
    fn test_parse_delimited_empty_input() {
        assert!(parse_delimited("").is_empty());
        assert!(parse_delimited("   \n  ").is_empty());
    }

    #[test]
    fn test_parse_history_csv_filters_and_sorts() {
        let csv = "date,total value\n2026-03-02,101000\nnot-a-date,5\n2026-03-01,100000\n2026-03-03,0\n";
        let points = parse_history_csv(csv);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date.to_string(), "2026-03-01");
        assert_eq!(points[1].value, 101000.0);
    }

    #[test]
    fn test_parse_history_csv_accepts_value_alias() {
        let csv = "date,value\n2026-03-01,42.5\n";
        let points = parse_history_csv(csv);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 42.5);
    }
}
