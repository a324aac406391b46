use colored::*;
use surrealtest_core::{DecodeError, check::CheckError};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// Decoded records, printed either pretty or one per line.
pub struct RecordList {
    pub records: Vec<serde_json::Value>,
    pub compact: bool,
}

/// A decode error that did not prevent the other records from being printed.
pub struct PartialFailure(pub DecodeError);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<RecordList> for FormattedString {
    fn from(RecordList { records, compact }: RecordList) -> Self {
        if records.is_empty() {
            return FormattedString("No records found.".yellow().to_string());
        }

        if compact {
            let lines: Vec<_> = records.iter().map(|r| r.to_string()).collect();
            return FormattedString(lines.join("\n"));
        }

        FormattedString::from(serde_json::Value::Array(records))
    }
}

impl From<DecodeError> for FormattedString {
    fn from(err: DecodeError) -> Self {
        FormattedString(format!(
            "{}\n\n{}",
            "Decode Failed:".red().bold(),
            error_lines(&err)
        ))
    }
}

impl From<PartialFailure> for FormattedString {
    fn from(PartialFailure(err): PartialFailure) -> Self {
        FormattedString(format!(
            "{}\n\n{}",
            "Some statements failed:".yellow().bold(),
            error_lines(&err)
        ))
    }
}

impl From<CheckError> for FormattedString {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::StatementsFailed(failures) => {
                let mut out = format!("{}\n", "Query Failed:".red().bold());
                for failure in failures {
                    out.push_str(&format!("  - {}\n", failure));
                }
                FormattedString(out.trim_end().to_string())
            }
            err @ CheckError::Malformed(_) => FormattedString(format!(
                "{}\n\n'{}'",
                "Malformed Response:".red().bold(),
                err
            )),
        }
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!("{}\n\n'{:#}'", "Failed to read input:".red().bold(), err))
    }
}

fn error_lines(err: &DecodeError) -> String {
    err.iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
