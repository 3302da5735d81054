// CSV and JSON ingestion into the normalized dataset

use crate::config::AnalysisConfig;
use crate::dataset::{DataFile, Dataset, FileFormat, Record};
use crate::error::{IngestError, Result};
use crate::value::Value;
use csv::ReaderBuilder;
use indexmap::IndexSet;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Parse uploaded bytes with the default upload limit.
pub fn parse_file(name: &str, bytes: &[u8]) -> Result<DataFile> {
    parse_file_with_config(name, bytes, &AnalysisConfig::default())
}

/// Validate and parse an upload. The extension and size are checked before
/// any byte is parsed.
pub fn parse_file_with_config(
    name: &str,
    bytes: &[u8],
    config: &AnalysisConfig,
) -> Result<DataFile> {
    let format = FileFormat::from_file_name(name).ok_or_else(|| IngestError::UnsupportedExtension {
        name: name.to_string(),
    })?;
    check_size(bytes.len() as u64, config.max_upload_bytes)?;

    let dataset = match format {
        FileFormat::Csv => parse_csv(bytes)?,
        FileFormat::Json => parse_json(bytes)?,
    };

    info!(
        file = %name,
        ?format,
        records = dataset.len(),
        columns = dataset.columns.len(),
        "parsed upload"
    );
    Ok(DataFile::new(name, format, dataset))
}

/// Read a file from disk and parse it like an upload named after the file.
pub fn parse_path(path: &Path) -> Result<DataFile> {
    parse_path_with_config(path, &AnalysisConfig::default())
}

pub fn parse_path_with_config(path: &Path, config: &AnalysisConfig) -> Result<DataFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if FileFormat::from_file_name(&name).is_none() {
        return Err(IngestError::UnsupportedExtension { name });
    }

    let read_err = |source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    };
    let size = std::fs::metadata(path).map_err(read_err)?.len();
    check_size(size, config.max_upload_bytes)?;

    let bytes = std::fs::read(path).map_err(read_err)?;
    parse_file_with_config(&name, &bytes, config)
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(IngestError::FileTooLarge { size, limit });
    }
    Ok(())
}

/// Parse CSV with a header row. Cells are typed: empty is null, boolean
/// literals become booleans and numeric text becomes a number.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let columns = unique_headers(&headers);

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let record: Record = columns
            .iter()
            .zip(row.iter())
            .map(|(column, raw)| (column.clone(), type_cell(raw)))
            .collect();
        records.push(record);
    }

    debug!(columns = columns.len(), records = records.len(), "read CSV");
    Ok(Dataset::new(columns, records))
}

/// Make header names unique by suffixing repeats with `_1`, `_2`, ...
fn unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}_{}", header, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        columns.push(name);
    }

    columns
}

fn type_cell(raw: &str) -> Value {
    match raw {
        "" => Value::Null,
        "true" | "TRUE" => Value::Bool(true),
        "false" | "FALSE" => Value::Bool(false),
        _ if looks_numeric(raw) => match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        },
        _ => Value::Text(raw.to_string()),
    }
}

/// Plain decimal notation only: no `inf`, `NaN` or hex.
fn looks_numeric(raw: &str) -> bool {
    let s = raw.trim();
    let s = s.strip_prefix('-').unwrap_or(s);
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());

    let mantissa_ok = all_digits(int_part)
        && frac_part.map_or(true, all_digits)
        && (!int_part.is_empty() || frac_part.is_some_and(|f| !f.is_empty()));

    let exponent_ok = exponent.map_or(true, |e| {
        let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
        !digits.is_empty() && all_digits(digits)
    });

    mantissa_ok && exponent_ok
}

/// Parse JSON holding either an array of flat objects or an object whose
/// first array-valued property holds them.
pub fn parse_json(bytes: &[u8]) -> Result<Dataset> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;

    let items = match &document {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map
            .values()
            .find_map(|v| v.as_array())
            .ok_or_else(|| IngestError::InvalidJsonStructure {
                reason: "object has no array-valued property".to_string(),
            })?,
        _ => {
            return Err(IngestError::InvalidJsonStructure {
                reason: "expected an array of objects".to_string(),
            })
        }
    };

    let mut columns: IndexSet<String> = IndexSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| IngestError::InvalidJsonStructure {
            reason: format!("item {} is not an object", index),
        })?;

        let record: Record = object
            .iter()
            .map(|(key, value)| {
                columns.insert(key.clone());
                (key.clone(), json_cell(value))
            })
            .collect();
        records.push(record);
    }

    debug!(columns = columns.len(), records = records.len(), "read JSON");
    Ok(Dataset::new(columns.into_iter().collect(), records))
}

fn json_cell(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Text(s.clone()),
        nested => Value::Text(nested.to_string()),
    }
}
