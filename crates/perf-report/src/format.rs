//! Case-insensitive configuration enums shared by the CLI tools.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Report file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    // Values arrive from flags or PERF_* environment variables in whatever
    // casing the operator typed, so parsing is case-insensitive. Unknown
    // values are an error, never a silent default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("'{other}' is not a valid output format (csv, json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Console log level, mapped onto a tracing filter by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Verbose,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// The tracing filter directive equivalent to this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VERBOSE" => Ok(LogLevel::Verbose),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!(
                "'{other}' is not a valid log level (VERBOSE, DEBUG, INFO, WARN, ERROR)"
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Verbose => write!(f, "VERBOSE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("cSv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
    }

    #[test]
    fn output_format_rejects_unknown_values() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("yaml"));
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("Warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!("VERBOSE".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
        assert!("chatty".parse::<LogLevel>().is_err());
    }
}
