//! Rendering of search outcomes for the command line
use crate::config::OutputFormat;
use crate::error::{EntryAccessError, Result};
use crate::search::SearchOutcome;
use colored::*;
use serde_json::json;
use std::io::Write;

/// Writes the result in the requested format.
pub fn write_outcome<W: Write>(
    out: &mut W,
    outcome: &SearchOutcome,
    format: OutputFormat,
    include_errors: bool,
) -> Result<()> {
    match format {
        OutputFormat::Lines => {
            for path in outcome.result.iter() {
                writeln!(out, "{}", path.display())?;
            }
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&outcome.result)?;
            if include_errors {
                value["errors"] = serde_json::to_value(&outcome.diagnostics)?;
            }
            if outcome.cancelled {
                value["cancelled"] = json!(true);
            }
            serde_json::to_writer_pretty(&mut *out, &value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Prints per-entry problems, one per line.
pub fn write_diagnostics<W: Write>(err: &mut W, diagnostics: &[EntryAccessError]) -> Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    writeln!(
        err,
        "{}",
        format!("{} entries could not be read:", diagnostics.len())
            .yellow()
            .bold()
    )?;
    for diagnostic in diagnostics {
        writeln!(err, "  {}", diagnostic.to_string().red())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Collector;
    use crate::error::AccessErrorKind;
    use std::path::PathBuf;

    fn outcome() -> SearchOutcome {
        let mut collector = Collector::new();
        collector.push(PathBuf::from("/bin/su"));
        collector.push(PathBuf::from("/bin/mount"));
        SearchOutcome {
            result: collector.finish(),
            diagnostics: vec![EntryAccessError {
                path: Some(PathBuf::from("/bin/private")),
                depth: 1,
                kind: AccessErrorKind::PermissionDenied,
                message: "Permission denied".to_string(),
            }],
            ..SearchOutcome::default()
        }
    }

    #[test]
    fn test_lines() {
        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome(), OutputFormat::Lines, true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "/bin/su\n/bin/mount\n");
    }

    #[test]
    fn test_json() {
        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value, json!({"files": ["/bin/su", "/bin/mount"], "matched": 2}));

        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome(), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["errors"][0]["kind"], "permission_denied");
        assert_eq!(value["errors"][0]["path"], "/bin/private");
    }

    #[test]
    fn test_diagnostics() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        write_diagnostics(&mut buf, &outcome().diagnostics).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("1 entries could not be read:"));
        assert!(text.contains("/bin/private: Permission denied"));
    }
}
