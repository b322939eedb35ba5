//! Human-readable run and scan summaries.

use std::io::{self, Write};
use std::path::Path;

use dispatcher::RunReport;
use ingestion::{DirSummary, MetricsSnapshot as IngestionSnapshot};

/// Failed jobs listed individually before the list is elided
const MAX_LISTED_FAILURES: usize = 10;

/// Print detailed summary of a finished run
pub fn print_run_summary(
    report: &RunReport,
    ingestion: &IngestionSnapshot,
    out_file: &Path,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "\n╔══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                        Run Statistics                        ║")?;
    writeln!(out, "╚══════════════════════════════════════════════════════════════╝\n")?;

    writeln!(out, "📊 Overview")?;
    writeln!(out, "   ├─ Duration: {:.2}s", report.duration.as_secs_f64())?;
    writeln!(out, "   ├─ Workers: {}", report.workers)?;
    writeln!(
        out,
        "   ├─ Files read: {} ({} lines)",
        ingestion.files_finished, ingestion.lines_read
    )?;
    writeln!(out, "   ├─ Jobs submitted: {}", report.submitted)?;
    writeln!(out, "   ├─ Jobs succeeded: {}", report.succeeded)?;
    writeln!(
        out,
        "   ├─ Jobs failed: {} ({:.2}%)",
        report.failed(),
        report.failure_rate()
    )?;
    writeln!(out, "   ├─ Throughput: {:.2} jobs/s", report.throughput())?;
    writeln!(out, "   └─ Output: {}", out_file.display())?;

    if !report.is_clean() {
        writeln!(out, "\n⚠️  Failed Jobs")?;
        for job in report.failed_jobs.iter().take(MAX_LISTED_FAILURES) {
            writeln!(out, "   ├─ {job}")?;
        }
        if report.failed_jobs.len() > MAX_LISTED_FAILURES {
            writeln!(
                out,
                "   └─ ... and {} more",
                report.failed_jobs.len() - MAX_LISTED_FAILURES
            )?;
        }
    }

    writeln!(out)
}

/// Print the dry-run scan of the data directory
pub fn print_scan_summary(summary: &DirSummary, workers: usize, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\n=== Dry Run Summary ===\n")?;
    writeln!(out, "Data directory: {}", summary.dir.display())?;
    writeln!(out, "Workers: {}", workers)?;
    writeln!(out, "\nFiles ({}):", summary.files.len())?;
    for file in &summary.files {
        writeln!(out, "  - {} ({} lines)", file.path.display(), file.lines)?;
    }
    writeln!(out, "\nJobs that would be submitted: {}", summary.total_lines)?;
    writeln!(out)
}
