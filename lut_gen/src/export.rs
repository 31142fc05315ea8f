//! CSV rendering of the lookup table.
//!
//! Layout: a `#`-prefixed header block carrying the grid dimensions, then
//! one record per grid cell in row-major order: x, z, the four whole-degree
//! joint angles, and the solved flag. Rendering is deterministic, so the
//! same table always produces byte-identical text.

use std::path::Path;

use arm_kinematics::{AxisSummary, LookupTable};

/// Error type for table export.
#[derive(Debug)]
pub enum ExportError {
    /// CSV writer error (malformed record)
    Csv(csv::Error),
    /// Filesystem or writer I/O error
    Io(std::io::Error),
    /// The rendered table was not valid UTF-8
    Utf8(std::string::FromUtf8Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Csv(e) => write!(f, "CSV format error: {}", e),
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Utf8(e) => write!(f, "Encoding error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<std::string::FromUtf8Error> for ExportError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        ExportError::Utf8(e)
    }
}

fn axis_header(name: &str, axis: &AxisSummary) -> String {
    format!(
        "# {}: min {} max {} step {} count {}\n",
        name, axis.min, axis.max, axis.step, axis.count
    )
}

/// Render the logical table as CSV text.
pub fn to_csv(table: &LookupTable) -> Result<String, ExportError> {
    let mut out = String::new();
    out.push_str("# arm reach lookup table, whole degrees per joint\n");
    out.push_str(&axis_header("x", &table.x));
    out.push_str(&axis_header("z", &table.z));
    out.push_str(&format!("# y: {}\n", table.y));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "x",
        "z",
        "base_deg",
        "shoulder_deg",
        "elbow_deg",
        "wrist_deg",
        "solved",
    ])?;

    for row in &table.rows {
        let mut fields = vec![row.x.to_string(), row.z.to_string()];
        fields.extend(row.angles.iter().map(|angle| angle.to_string()));
        fields.push(row.solved.to_string());
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    out.push_str(&String::from_utf8(bytes)?);
    Ok(out)
}

/// Render the table and write it to `path`.
pub fn write_csv_file<P: AsRef<Path>>(path: P, table: &LookupTable) -> Result<(), ExportError> {
    let text = to_csv(table)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use arm_kinematics::{AxisSummary, TableRow};

    use super::*;

    fn sample_table() -> LookupTable {
        LookupTable {
            x: AxisSummary {
                min: 0.0,
                max: 10.0,
                step: 10.0,
                count: 2,
            },
            z: AxisSummary {
                min: 200.0,
                max: 200.0,
                step: 10.0,
                count: 1,
            },
            y: 100.0,
            rows: vec![
                TableRow {
                    x: 0.0,
                    z: 200.0,
                    angles: [0, -21, -64, -79],
                    solved: true,
                },
                TableRow {
                    x: 10.0,
                    z: 200.0,
                    angles: [3, -22, -63, -80],
                    solved: false,
                },
            ],
        }
    }

    #[test]
    fn test_export_is_idempotent() {
        let table = sample_table();
        let first = to_csv(&table).unwrap();
        let second = to_csv(&table).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_layout() {
        let text = to_csv(&sample_table()).unwrap();
        println!("{}", text);

        assert!(text.starts_with("# arm reach lookup table"));
        assert!(text.contains("# x: min 0 max 10 step 10 count 2\n"));
        assert!(text.contains("# z: min 200 max 200 step 10 count 1\n"));
        assert!(text.contains("# y: 100\n"));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[4], "x,z,base_deg,shoulder_deg,elbow_deg,wrist_deg,solved");
        assert_eq!(lines[5], "0,200,0,-21,-64,-79,true");
        assert_eq!(lines[6], "10,200,3,-22,-63,-80,false");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_write_csv_file_round_trips() {
        let table = sample_table();
        let dir = std::env::temp_dir();
        let path = dir.join("lut_gen_export_test.csv");

        write_csv_file(&path, &table).unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, to_csv(&table).unwrap());

        std::fs::remove_file(&path).ok();
    }
}
