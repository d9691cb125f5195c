use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::model::columns;

// ---------------------------------------------------------------------------
// ColumnMap – source header → canonical column
// ---------------------------------------------------------------------------

/// Names of the source headers that carry each canonical column.
///
/// Deserializes from JSON with per-field defaults, so a config file only has
/// to list the headers that differ from the canonical names:
///
/// ```json
/// { "company_id": "ticker", "year": "fiscal_year" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub company_id: String,
    pub company_name: String,
    pub year: String,
    pub digital_transformation_index: String,
    pub technology_dimension: String,
    pub application_dimension: String,
    pub ai_frequency: String,
    pub big_data_frequency: String,
    pub cloud_computing_frequency: String,
    pub blockchain_frequency: String,
    pub digital_technology_frequency: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ColumnMap {
    /// Source headers already use the canonical names.
    pub fn canonical() -> Self {
        Self {
            company_id: columns::COMPANY_ID.into(),
            company_name: columns::COMPANY_NAME.into(),
            year: columns::YEAR.into(),
            digital_transformation_index: columns::DIGITAL_TRANSFORMATION_INDEX.into(),
            technology_dimension: columns::TECHNOLOGY_DIMENSION.into(),
            application_dimension: columns::APPLICATION_DIMENSION.into(),
            ai_frequency: columns::AI_FREQUENCY.into(),
            big_data_frequency: columns::BIG_DATA_FREQUENCY.into(),
            cloud_computing_frequency: columns::CLOUD_COMPUTING_FREQUENCY.into(),
            blockchain_frequency: columns::BLOCKCHAIN_FREQUENCY.into(),
            digital_technology_frequency: columns::DIGITAL_TECHNOLOGY_FREQUENCY.into(),
        }
    }

    /// Headers of the merged annual-report spreadsheet.
    pub fn annual_report() -> Self {
        Self {
            company_id: "股票代码".into(),
            company_name: "企业名称".into(),
            year: "年份".into(),
            digital_transformation_index: "数字化转型指数".into(),
            technology_dimension: "技术维度".into(),
            application_dimension: "应用维度".into(),
            ai_frequency: "人工智能词频数".into(),
            big_data_frequency: "大数据词频数".into(),
            cloud_computing_frequency: "云计算词频数".into(),
            blockchain_frequency: "区块链词频数".into(),
            digital_technology_frequency: "数字技术运用词频数".into(),
        }
    }

    /// Read a (possibly partial) mapping from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading column map {}", path.display()))?;
        serde_json::from_str(&text).context("parsing column map JSON")
    }

    /// Pick the built-in preset whose company-id header appears in `headers`.
    /// Falls back to [`ColumnMap::canonical`].
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let annual = Self::annual_report();
        if headers.iter().any(|h| h.as_ref() == annual.company_id) {
            annual
        } else {
            Self::canonical()
        }
    }

    /// (source header, canonical name) pairs.
    pub fn pairs(&self) -> [(&str, &'static str); 11] {
        [
            (self.company_id.as_str(), columns::COMPANY_ID),
            (self.company_name.as_str(), columns::COMPANY_NAME),
            (self.year.as_str(), columns::YEAR),
            (
                self.digital_transformation_index.as_str(),
                columns::DIGITAL_TRANSFORMATION_INDEX,
            ),
            (self.technology_dimension.as_str(), columns::TECHNOLOGY_DIMENSION),
            (self.application_dimension.as_str(), columns::APPLICATION_DIMENSION),
            (self.ai_frequency.as_str(), columns::AI_FREQUENCY),
            (self.big_data_frequency.as_str(), columns::BIG_DATA_FREQUENCY),
            (
                self.cloud_computing_frequency.as_str(),
                columns::CLOUD_COMPUTING_FREQUENCY,
            ),
            (self.blockchain_frequency.as_str(), columns::BLOCKCHAIN_FREQUENCY),
            (
                self.digital_technology_frequency.as_str(),
                columns::DIGITAL_TECHNOLOGY_FREQUENCY,
            ),
        ]
    }

    /// Canonical name for a source header; unmapped headers pass through.
    pub fn canonical_name(&self, header: &str) -> String {
        self.pairs()
            .into_iter()
            .find(|(source, _)| *source == header)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or_else(|| header.to_string())
    }
}
