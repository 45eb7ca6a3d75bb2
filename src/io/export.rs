//! CSV export for community forecasts.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::forecast::CommunityForecast;

/// Column header for CSV forecast export.
const HEADER: &str = "hour,production_kw,expected_consumption_kw,expected_surplus_kw,in_window";

/// Exports a forecast to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour. Produces deterministic
/// output for identical inputs.
///
/// # Arguments
///
/// * `forecast` - Community forecast to export
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(forecast: &CommunityForecast, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(forecast, buf)
}

/// Writes a forecast as CSV to any writer.
///
/// # Arguments
///
/// * `forecast` - Community forecast to export
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(forecast: &CommunityForecast, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for p in &forecast.forecast {
        wtr.write_record(&[
            p.hour.to_string(),
            format!("{:.4}", p.production_kw),
            format!("{:.4}", p.expected_consumption_kw),
            format!("{:.4}", p.expected_surplus_kw),
            forecast.window_at(p.hour).is_some().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::forecast::compute_forecast;
    use crate::history::HistoricalData;

    fn sample() -> CommunityForecast {
        let data = HistoricalData::new(50.0, 100.0, 30.0).unwrap();
        compute_forecast("org", &data, &EngineConfig::baseline()).unwrap()
    }

    #[test]
    fn header_and_row_count() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], HEADER);
        // 1 header + 24 hourly rows
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn window_flag_matches_windows() {
        let fc = sample();
        let mut buf = Vec::new();
        write_csv(&fc, &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        for record in rdr.records() {
            let rec = record.unwrap();
            let hour: u8 = rec[0].parse().unwrap();
            let flagged: bool = rec[4].parse().unwrap();
            assert_eq!(flagged, fc.window_at(hour).is_some(), "hour {hour}");
            let surplus: f64 = rec[3].parse().unwrap();
            assert!(surplus.is_finite());
        }
    }

    #[test]
    fn deterministic_output() {
        let fc = sample();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_csv(&fc, &mut buf1).unwrap();
        write_csv(&fc, &mut buf2).unwrap();
        assert_eq!(buf1, buf2);
    }
}
