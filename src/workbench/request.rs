//! Conversion requests, outcomes, and their JSON wire shapes
//!
//! Requests are built fresh for every call and discarded once their outcome
//! has been projected into the workbench state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ClientError;

/// Which source grammar is being translated to DAX.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionMode {
    /// SQL queries
    #[default]
    #[serde(rename = "sql_to_dax")]
    SqlToTarget,
    /// Spotfire expression language
    #[serde(rename = "spotfire_to_dax")]
    ExpressionToTarget,
}

impl ConversionMode {
    /// Wire identifier sent as `conversion_type`.
    pub fn as_wire(&self) -> &'static str {
        match self {
            ConversionMode::SqlToTarget => "sql_to_dax",
            ConversionMode::ExpressionToTarget => "spotfire_to_dax",
        }
    }

    /// Example text shown in an empty input buffer for this grammar.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ConversionMode::SqlToTarget => SQL_PLACEHOLDER,
            ConversionMode::ExpressionToTarget => SPOTFIRE_PLACEHOLDER,
        }
    }
}

const SQL_PLACEHOLDER: &str = "Paste your SQL query here...

Example:
SELECT
    CustomerID,
    SUM(OrderAmount) as TotalAmount,
    COUNT(*) as OrderCount
FROM Orders
WHERE OrderDate >= '2023-01-01'
GROUP BY CustomerID";

const SPOTFIRE_PLACEHOLDER: &str = "Paste your Spotfire expression here...

Examples:
Sum([Sales]) OVER ([Region])
If([Category] = 'Electronics', [Sales] * 1.1, [Sales])
Case When [Status] = 'Active' Then [Value] Else 0 End";

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sql" | "sql_to_dax" => Ok(ConversionMode::SqlToTarget),
            "spotfire" | "spotfire_to_dax" => Ok(ConversionMode::ExpressionToTarget),
            other => Err(format!(
                "unknown conversion mode '{other}' (expected sql or spotfire)"
            )),
        }
    }
}

/// A single convert/validate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    /// Trimmed, non-empty source text
    #[serde(rename = "source_code")]
    source_text: String,
    /// Grammar of the source text
    #[serde(rename = "conversion_type")]
    mode: ConversionMode,
}

impl ConversionRequest {
    /// Build a request from raw buffer contents.
    ///
    /// Returns `None` when the text is empty after trimming.
    pub fn new(source: &str, mode: ConversionMode) -> Option<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            source_text: trimmed.to_string(),
            mode,
        })
    }

    /// Source text as it will be sent
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Conversion mode
    pub fn mode(&self) -> ConversionMode {
        self.mode
    }
}

/// Objects the service identified in the source.
///
/// Order is the service's order; duplicates pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectCollection {
    /// Referenced tables
    pub tables: Vec<String>,
    /// Referenced columns
    pub columns: Vec<String>,
    /// Functions used
    pub functions: Vec<String>,
    /// Aliases declared
    pub aliases: Vec<String>,
}

impl ObjectCollection {
    /// True when every category is empty
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.columns.is_empty()
            && self.functions.is_empty()
            && self.aliases.is_empty()
    }
}

/// Result of a convert call that reached the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Conversion produced DAX
    Success {
        /// Converted DAX code
        converted_code: String,
        /// Objects found in the source
        identified_objects: ObjectCollection,
        /// Conversion warnings
        warnings: Vec<String>,
        /// Conversion notes
        notes: Vec<String>,
    },
    /// The service reported a structured failure
    Failure {
        /// Failure message
        message: String,
        /// Suggestions for fixing the input
        suggestions: Vec<String>,
    },
}

/// Result of a validate call that reached the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The source is valid
    Valid,
    /// The source has problems
    Invalid {
        /// Suggestions for fixing the input
        suggestions: Vec<String>,
        /// Individual validation errors
        errors: Vec<String>,
    },
}

/// Raw `/convert` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConvertResponse {
    success: bool,
    #[serde(default)]
    converted_code: Option<String>,
    #[serde(default)]
    objects_identified: Option<ObjectCollection>,
    #[serde(default)]
    warnings: Option<Vec<String>>,
    #[serde(default)]
    conversion_notes: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

impl TryFrom<ConvertResponse> for ConversionOutcome {
    type Error = ClientError;

    fn try_from(response: ConvertResponse) -> Result<Self, Self::Error> {
        if response.success {
            let converted_code = response.converted_code.ok_or_else(|| {
                ClientError::MalformedResponse(
                    "successful conversion is missing converted_code".to_string(),
                )
            })?;
            Ok(ConversionOutcome::Success {
                converted_code,
                identified_objects: response.objects_identified.unwrap_or_default(),
                warnings: response.warnings.unwrap_or_default(),
                notes: response.conversion_notes.unwrap_or_default(),
            })
        } else {
            let message = response.error.ok_or_else(|| {
                ClientError::MalformedResponse("failed conversion is missing error".to_string())
            })?;
            Ok(ConversionOutcome::Failure {
                message,
                suggestions: response.suggestions.unwrap_or_default(),
            })
        }
    }
}

/// Raw `/validate` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ValidateResponse {
    valid: bool,
    #[serde(default)]
    errors: Option<Vec<String>>,
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

impl From<ValidateResponse> for ValidationOutcome {
    fn from(response: ValidateResponse) -> Self {
        if response.valid {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid {
                suggestions: response.suggestions.unwrap_or_default(),
                errors: response.errors.unwrap_or_default(),
            }
        }
    }
}

/// Decode a `/convert` body.
pub(crate) fn decode_convert(body: &[u8]) -> Result<ConversionOutcome, ClientError> {
    let response: ConvertResponse = serde_json::from_slice(body)?;
    response.try_into()
}

/// Decode a `/validate` body.
pub(crate) fn decode_validate(body: &[u8]) -> Result<ValidationOutcome, ClientError> {
    let response: ValidateResponse = serde_json::from_slice(body)?;
    Ok(response.into())
}
