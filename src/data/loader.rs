use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use calamine::{open_workbook_auto, Data, Reader};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{columns, CellValue, Row, Table};
use super::schema::ColumnMap;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an annual-report table from a file.  Dispatch by extension.
///
/// Headers are renamed to canonical column names through `mapping`; when no
/// mapping is given it is detected from the headers ([`ColumnMap::detect`]).
///
/// Supported formats:
/// * `.csv`     – header row, one company-year per line
/// * `.json`    – `[{ "company_id": "000001", "year": 2019, ... }, ...]`
/// * `.parquet` – flat scalar columns, as written by `df.to_parquet()`
/// * `.xlsx` / `.xls` – first worksheet, first row as headers
pub fn load_file(path: &Path, mapping: Option<&ColumnMap>) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, mapping)?,
        "json" => load_json(path, mapping)?,
        "parquet" | "pq" => load_parquet(path, mapping)?,
        "xlsx" | "xls" => load_excel(path, mapping)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    if table.is_empty() {
        log::warn!("{} contains no rows", path.display());
    } else {
        log::info!(
            "loaded {} rows × {} columns from {}",
            table.len(),
            table.column_names.len(),
            path.display()
        );
    }
    Ok(table)
}

fn resolve_mapping<S: AsRef<str>>(mapping: Option<&ColumnMap>, headers: &[S]) -> ColumnMap {
    match mapping {
        Some(m) => m.clone(),
        None => ColumnMap::detect(headers),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Identifier and name columns are never type-guessed: stock codes like
/// `000001` keep their leading zeros and a name like `3.10` stays `3.10`.
fn is_text_column(name: &str) -> bool {
    name == columns::COMPANY_ID || name == columns::COMPANY_NAME
}

/// CSV layout: header row with column names, one record per line.
/// Text columns are kept verbatim; every other cell is type-guessed.
fn load_csv(path: &Path, mapping: Option<&ColumnMap>) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let source_headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mapping = resolve_mapping(mapping, &source_headers);
    let headers: Vec<String> = source_headers
        .iter()
        .map(|h| mapping.canonical_name(h))
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut row = Row::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                bail!("CSV row {row_no}: more fields than headers");
            };
            let cell = if is_text_column(col_name) {
                text_cell(value)
            } else {
                guess_cell_type(value)
            };
            row.insert(col_name.clone(), cell);
        }

        rows.push(row);
    }

    Ok(Table::with_columns(headers, rows))
}

fn text_cell(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "company_id": "000001", "company_name": "Ping An Bank", "year": 2019, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path, mapping: Option<&ColumnMap>) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let first_keys: Vec<&str> = records
        .first()
        .and_then(|r| r.as_object())
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let mapping = resolve_mapping(mapping, &first_keys);

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let row: Row = obj
            .iter()
            .map(|(key, val)| (mapping.canonical_name(key), json_to_cell(val)))
            .collect();
        rows.push(row);
    }

    Ok(Table::from_rows(rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per attribute.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, mapping: Option<&ColumnMap>) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let source_headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let mapping = resolve_mapping(mapping, &source_headers);
    let headers: Vec<String> = source_headers
        .iter()
        .map(|h| mapping.canonical_name(h))
        .collect();

    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row_idx in 0..batch.num_rows() {
            let mut row = Row::new();
            for (col_idx, col_name) in headers.iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row_idx)
                    .with_context(|| format!("Row {row_idx}: failed to read '{col_name}'"))?;
                row.insert(col_name.clone(), value);
            }
            rows.push(row);
        }
    }

    Ok(Table::with_columns(headers, rows))
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Load the first worksheet of an `.xlsx` / `.xls` workbook, first row as
/// headers (`pd.read_excel` defaults).
fn load_excel(path: &Path, mapping: Option<&ColumnMap>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut sheet_rows = range.rows();
    let source_headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|h| h.to_string().trim().to_string())
            .collect(),
        None => return Ok(Table::default()),
    };

    let mapping = resolve_mapping(mapping, &source_headers);
    let headers: Vec<String> = source_headers
        .iter()
        .map(|h| mapping.canonical_name(h))
        .collect();

    let mut rows = Vec::new();

    for (row_no, sheet_row) in sheet_rows.enumerate() {
        let mut row = Row::new();
        for (col_name, data) in headers.iter().zip(sheet_row) {
            if col_name.is_empty() {
                continue;
            }
            row.insert(col_name.clone(), excel_cell(data, is_text_column(col_name)));
        }
        if row.values().all(CellValue::is_null) {
            log::debug!("skipping blank worksheet row {row_no}");
            continue;
        }
        rows.push(row);
    }

    Ok(Table::with_columns(
        headers.into_iter().filter(|h| !h.is_empty()).collect(),
        rows,
    ))
}

/// Excel stores every number as a float; in text columns integral numbers
/// are rendered without a fractional part.
fn excel_cell(data: &Data, as_text: bool) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) if as_text => text_cell(s),
        Data::String(s) => guess_cell_type(s),
        Data::Int(i) if as_text => CellValue::String(i.to_string()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if as_text && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            CellValue::String((*f as i64).to_string())
        }
        Data::Float(f) if as_text => CellValue::String(f.to_string()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_string_opt::<i32>().context("expected StringArray")?;
            CellValue::String(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_string_opt::<i64>()
                .context("expected LargeStringArray")?;
            CellValue::String(arr.value(row).to_string())
        }
        DataType::Int32 => {
            let arr = col
                .as_primitive_opt::<Int32Type>()
                .context("expected Int32Array")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_primitive_opt::<Int64Type>()
                .context("expected Int64Array")?;
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_primitive_opt::<Float32Type>()
                .context("expected Float32Array")?;
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_primitive_opt::<Float64Type>()
                .context("expected Float64Array")?;
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_boolean_opt().context("expected BooleanArray")?;
            CellValue::Bool(arr.value(row))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}
