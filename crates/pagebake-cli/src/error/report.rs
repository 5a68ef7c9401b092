//! Conversion of CLI errors into miette reports.

use crate::error::CliError;
use miette::Report;

/// Convert a `CliError` into a miette `Report`.
///
/// Pipeline errors keep their diagnostic code and help text.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Pipeline(e) => Report::new(e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_pipeline_error_keeps_code() {
        let err = CliError::Pipeline(pagebake::Error::InvalidConfig("bad".into()));
        let report = cli_error_to_miette(err);
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("pagebake::invalid_config"));
    }

    #[test]
    fn test_other_errors_keep_message() {
        let report = cli_error_to_miette(CliError::FileNotFound(PathBuf::from("index.html")));
        assert_eq!(report.to_string(), "File not found: index.html");
    }
}
