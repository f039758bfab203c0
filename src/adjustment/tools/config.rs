//! Tool configuration.
//!
//! Every field carries a default matching the stock reporting workflow, so an
//! empty JSON object and no configuration file at all behave identically.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjustment::tools::error::{Result, ToolError};
use crate::adjustment::tools::model::{CellValue, Sheet};

pub const SELL_BRANCH_COLUMN: &str = "Code (Sell Branch)";
pub const ABS_COST_COLUMN: &str = "ABS Cost";
pub const ADJUSTMENT_TYPE_COLUMN: &str = "Code (Adjustment Type)";

pub const DATE_FORMAT: &str = "MM/DD/YYYY";
pub const AMOUNT_FORMAT: &str = "#,##0.00";
pub const CURRENCY_FORMAT: &str = "$#,##0.00_);($#,##0.00)";

/// Top-level configuration shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub columns: KeyColumns,
    pub number_formats: Vec<NumberFormatRule>,
    pub highlight: HighlightRules,
    pub purge: PurgeConfig,
    pub split: SplitConfig,
    pub summary: SummaryConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            columns: KeyColumns::default(),
            number_formats: default_number_formats(),
            highlight: HighlightRules::default(),
            purge: PurgeConfig::default(),
            split: SplitConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl ToolConfig {
    /// Reads a configuration file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let config: ToolConfig = serde_json::from_str(&data)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Header names of the columns the pipeline keys on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyColumns {
    pub sell_branch: String,
    pub abs_cost: String,
    pub adjustment_type: String,
}

impl Default for KeyColumns {
    fn default() -> Self {
        Self {
            sell_branch: SELL_BRANCH_COLUMN.to_string(),
            abs_cost: ABS_COST_COLUMN.to_string(),
            adjustment_type: ADJUSTMENT_TYPE_COLUMN.to_string(),
        }
    }
}

/// Column selector: 1-based position or exact header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl ColumnRef {
    /// Resolves the selector to a zero-based column index of `sheet`.
    ///
    /// Returns `Ok(None)` for a position past the sheet's last column; an
    /// unknown name or a zero position is an error.
    pub fn resolve(&self, sheet: &Sheet) -> Result<Option<usize>> {
        match self {
            ColumnRef::Index(0) => Err(ToolError::Config(
                "column positions are 1-based; 0 is not a valid column".into(),
            )),
            ColumnRef::Index(position) if *position <= sheet.width() => Ok(Some(position - 1)),
            ColumnRef::Index(_) => Ok(None),
            ColumnRef::Name(name) => sheet
                .column_index(name)
                .map(Some)
                .ok_or_else(|| ToolError::MissingColumn(name.clone())),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Index(position) => write!(f, "column {position}"),
            ColumnRef::Name(name) => write!(f, "column '{name}'"),
        }
    }
}

impl std::str::FromStr for ColumnRef {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match raw.parse::<usize>() {
            Ok(position) => ColumnRef::Index(position),
            Err(_) => ColumnRef::Name(raw.to_string()),
        })
    }
}

/// Display format applied to every data cell of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberFormatRule {
    pub column: ColumnRef,
    pub format: String,
}

impl NumberFormatRule {
    pub fn new(column: ColumnRef, format: impl Into<String>) -> Self {
        Self {
            column,
            format: format.into(),
        }
    }
}

/// Positional layout of the stock adjustment report: date in column A,
/// amounts in columns K, L and N.
pub fn default_number_formats() -> Vec<NumberFormatRule> {
    vec![
        NumberFormatRule::new(ColumnRef::Index(1), DATE_FORMAT),
        NumberFormatRule::new(ColumnRef::Index(11), AMOUNT_FORMAT),
        NumberFormatRule::new(ColumnRef::Index(12), AMOUNT_FORMAT),
        NumberFormatRule::new(ColumnRef::Index(14), AMOUNT_FORMAT),
    ]
}

/// Adjustment-type sets and cost thresholds driving the highlight fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightRules {
    /// Types highlighted green once the cost exceeds `threshold`.
    pub threshold_types: Vec<String>,
    pub threshold: f64,
    /// Types that are red above `tier_upper` and green in `(tier_lower, tier_upper]`.
    pub tiered_types: Vec<String>,
    pub tier_lower: f64,
    pub tier_upper: f64,
    /// Types that are green for any numeric cost.
    pub always_types: Vec<String>,
}

impl Default for HighlightRules {
    fn default() -> Self {
        Self {
            threshold_types: codes(&[
                "B", "BP", "CC", "CL", "CYC", "DFC", "DIT", "FAB", "LIT", "SNP", "VC", "WO",
            ]),
            threshold: 300.0,
            tiered_types: codes(&["DC"]),
            tier_lower: 300.0,
            tier_upper: 1000.0,
            always_types: codes(&["HJ", "JWW", "MTD", "NA", "PO", "PPV", "TFT", "US", "PI"]),
        }
    }
}

/// Row deletion settings for the `purge` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PurgeConfig {
    pub sheet: String,
    pub column: ColumnRef,
    pub codes: Vec<String>,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            sheet: "Data".to_string(),
            column: ColumnRef::Index(4),
            codes: codes(&["D", "DAM", "BSM", "TR", "bsm", "PM", "WAR"]),
        }
    }
}

/// Branch groups for the `split` command, kept in the order they are listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    pub groups: IndexMap<String, Vec<BranchCode>>,
}

/// Source and target of the `summarize` command.
///
/// Rows are keyed by [`KeyColumns::sell_branch`]; the first cross-tab's
/// columns come from [`KeyColumns::adjustment_type`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    pub data_sheet: String,
    pub sheet: String,
    pub cost: String,
    pub division: String,
    pub written_by: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            data_sheet: "Data".to_string(),
            sheet: "Pivot Tables".to_string(),
            cost: "Cost".to_string(),
            division: "Division (Product)".to_string(),
            written_by: "Code (Written By)".to_string(),
        }
    }
}

/// A branch code as written in configuration: either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BranchCode {
    Number(f64),
    Text(String),
}

impl BranchCode {
    /// Text form comparable with [`CellValue::code_text`].
    pub fn code_text(&self) -> String {
        match self {
            BranchCode::Number(value) => CellValue::Number(*value).code_text(),
            BranchCode::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for BranchCode {
    fn from(raw: &str) -> Self {
        BranchCode::Text(raw.trim().to_string())
    }
}

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
