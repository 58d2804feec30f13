use anyhow::{Context, Result};
use solde_core::{Value, format_minor_units};
use solde_finance::DocumentFailure;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Console listing of one document's series. Deltas are taken against the
/// previous value of the same document; the first one is zero.
pub fn value_lines(values: &[Value]) -> Vec<String> {
    let mut prev: Option<i64> = None;
    values
        .iter()
        .map(|v| {
            let delta = prev.map_or(0, |p| v.value - p);
            prev = Some(v.value);
            format!(
                "{} - {:>10} / {:>8} - {}",
                v.date.format("%Y-%m-%d"),
                format_minor_units(v.value),
                format_minor_units(delta),
                v.source
            )
        })
        .collect()
}

pub fn write_json(path: &Path, values: &[Value]) -> Result<()> {
    let fp = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(fp);
    serde_json::to_writer(&mut w, values).with_context(|| format!("write {}", path.display()))?;
    w.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<Vec<Value>> {
    let fp = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(fp)).with_context(|| format!("parse {}", path.display()))
}

pub fn write_csv(path: &Path, values: &[Value]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    for v in values {
        wtr.serialize(v)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the raw bytes of a stream that failed to tokenize to
/// `<dir>/<file-stem>.stream`. Other failures have nothing to dump.
pub fn dump_raw_stream(dir: &Path, failure: &DocumentFailure) -> Result<Option<PathBuf>> {
    let Some(raw) = failure.error.raw_stream() else {
        return Ok(None);
    };
    let stem = failure
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let p = dir.join(format!("{stem}.stream"));
    fs::write(&p, raw).with_context(|| format!("write {}", p.display()))?;
    Ok(Some(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use solde_core::ExtractError;

    fn value(day: u32, source: &str, value: i64) -> Value {
        Value {
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            source: source.to_string(),
            value,
        }
    }

    #[test]
    fn test_value_lines() {
        let lines = value_lines(&[value(1, "SOLDE", 100_000), value(2, "CARTE", 97_550), value(3, "VIR", 100_000)]);
        assert_eq!(lines[0], "2021-01-01 -    1000.00 /     0.00 - SOLDE");
        assert_eq!(lines[1], "2021-01-02 -     975.50 /   -24.50 - CARTE");
        assert_eq!(lines[2], "2021-01-03 -    1000.00 /    24.50 - VIR");
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.json");
        let values = vec![value(1, "SOLDE", 100), value(2, "CARTE", 50)];
        write_json(&path, &values).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(r#"[{"date":"2021-01-01","source":"SOLDE","value":100}"#));
        assert_eq!(read_json(&path).unwrap(), values);
    }

    #[test]
    fn test_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("values.csv");
        write_csv(&path, &[value(1, "SOLDE AU 01.01.2021", 100), value(2, "CARTE, MONOP", -50)]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "date,source,value\n2021-01-01,SOLDE AU 01.01.2021,100\n2021-01-02,\"CARTE, MONOP\",-50\n"
        );
    }

    #[test]
    fn test_dump_raw_stream() {
        let dir = tempfile::tempdir().unwrap();
        let failure = DocumentFailure {
            path: PathBuf::from("/statements/releve-2021-01.pdf"),
            error: ExtractError::Tokenize {
                reason: "unterminated string".to_string(),
                parsed: 1,
                raw: b"BT (abc".to_vec(),
            },
        };
        let written = dump_raw_stream(dir.path(), &failure).unwrap().unwrap();
        assert_eq!(written, dir.path().join("releve-2021-01.stream"));
        assert_eq!(fs::read(&written).unwrap(), b"BT (abc");

        let failure = DocumentFailure {
            path: PathBuf::from("other.pdf"),
            error: ExtractError::OrphanChange("CARTE".to_string()),
        };
        assert!(dump_raw_stream(dir.path(), &failure).unwrap().is_none());
    }
}
