#![allow(dead_code)]

use dti_explorer::data::model::{columns, CellValue, KeywordCounts, Record, Row, Table};

pub fn record(company_id: &str, year: i32, index: f64, tech: f64, app: f64) -> Record {
    Record {
        company_id: company_id.to_string(),
        company_name: format!("{company_id} Co."),
        year,
        digital_transformation_index: index,
        technology_dimension: tech,
        application_dimension: app,
        keywords: KeywordCounts {
            artificial_intelligence: 3,
            big_data: 7,
            cloud_computing: 2,
            blockchain: 0,
            digital_technology: 11,
        },
    }
}

pub fn row_of(record: &Record) -> Row {
    let mut row = Row::new();
    row.insert(columns::COMPANY_ID.into(), CellValue::String(record.company_id.clone()));
    row.insert(
        columns::COMPANY_NAME.into(),
        CellValue::String(record.company_name.clone()),
    );
    row.insert(columns::YEAR.into(), CellValue::Integer(record.year as i64));
    row.insert(
        columns::DIGITAL_TRANSFORMATION_INDEX.into(),
        CellValue::Float(record.digital_transformation_index),
    );
    row.insert(
        columns::TECHNOLOGY_DIMENSION.into(),
        CellValue::Float(record.technology_dimension),
    );
    row.insert(
        columns::APPLICATION_DIMENSION.into(),
        CellValue::Float(record.application_dimension),
    );
    let k = &record.keywords;
    for (col, v) in [
        (columns::AI_FREQUENCY, k.artificial_intelligence),
        (columns::BIG_DATA_FREQUENCY, k.big_data),
        (columns::CLOUD_COMPUTING_FREQUENCY, k.cloud_computing),
        (columns::BLOCKCHAIN_FREQUENCY, k.blockchain),
        (columns::DIGITAL_TECHNOLOGY_FREQUENCY, k.digital_technology),
    ] {
        row.insert(col.into(), CellValue::Integer(v as i64));
    }
    row
}

pub fn table_of(records: &[Record]) -> Table {
    Table::with_columns(
        columns::REQUIRED.iter().map(|c| c.to_string()).collect(),
        records.iter().map(row_of).collect(),
    )
}

/// (A, 2018, 10, 5, 5), (A, 2019, 20, 8, 12), (B, 2018, 50, ...), stored
/// out of year order.
pub fn scenario() -> Table {
    table_of(&[
        record("A", 2019, 20.0, 8.0, 12.0),
        record("B", 2018, 50.0, 30.0, 20.0),
        record("A", 2018, 10.0, 5.0, 5.0),
    ])
}
