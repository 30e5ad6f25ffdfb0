use anyhow::{Context, Result};
use colored::Colorize;
use modcheck_core::{BatchReport, FileResult};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::EXIT_TEST_FAILED;

/// Print one batch entry as it completes.
pub(crate) fn print_entry(index: usize, total: usize, result: &FileResult) {
    let progress = format!("[{}/{}]", index + 1, total).cyan().bold();
    if result.success {
        match &result.output {
            Some(output) => println!(
                "{} {} {} {}",
                progress,
                "✓".green().bold(),
                result.file.display(),
                format!("-> {}", output.display()).dimmed()
            ),
            None => println!("{} {} {}", progress, "✓".green().bold(), result.file.display()),
        }
    } else {
        println!(
            "{} {} {}",
            progress,
            "✗".red().bold(),
            result.file.display()
        );
        if let Some(error) = &result.error {
            println!("      {}", error.red());
        }
    }
}

/// Print the end-of-batch summary, listing every failure again.
pub(crate) fn print_summary(title: &str, report: &BatchReport) {
    println!("\n{}", "=".repeat(60));
    println!("{}", title.bold());
    println!("  Total:     {}", report.total);
    println!(
        "  Succeeded: {}",
        if report.failed == 0 {
            report.succeeded.to_string().green()
        } else {
            report.succeeded.to_string().normal()
        }
    );
    println!(
        "  Failed:    {}",
        if report.failed > 0 {
            report.failed.to_string().red()
        } else {
            report.failed.to_string().normal()
        }
    );

    if report.failed > 0 {
        println!("\n{}", "Failures:".red().bold());
        for failure in report.failures() {
            println!(
                "  {} {}: {}",
                "✗".red(),
                failure.file.display(),
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Write the report as pretty JSON.
pub(crate) fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write report to: {}", path.display()))?;
    Ok(())
}

/// Emit a finished batch in the requested form and map it to an exit code.
pub(crate) fn finish_batch(
    title: &str,
    report: &BatchReport,
    report_path: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    if let Some(path) = report_path {
        write_report(report, Path::new(path))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        if report.total == 0 {
            println!("{}", "No matching files found.".yellow());
        }
        print_summary(title, report);
        if let Some(path) = report_path {
            println!("Report: {}", path);
        }
    }

    Ok(batch_exit_code(report))
}

pub(crate) fn batch_exit_code(report: &BatchReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_TEST_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modcheck_core::HarnessError;

    #[test]
    fn test_write_report_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.json");

        let mut report = BatchReport::new();
        report.push(FileResult::ok("a.mod", Some("a.mod.inc".into())));
        report.push(FileResult::failed(
            "b.mod",
            None,
            &HarnessError::OutputMissing("b.mod.wav".into()),
        ));

        write_report(&report, &path).unwrap();

        let parsed: BatchReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, report);
    }
}
