use crate::diff::{ChangeKind, ChangeReport};

pub fn print_report(report: &ChangeReport) {
    for line in format_report_lines(report) {
        println!("{}", line);
    }
}

fn format_report_lines(report: &ChangeReport) -> Vec<String> {
    let mut lines = vec![String::new(), "--- INTEGRITY REPORT ---".to_string()];

    for change in report.deviations() {
        let tag = match change.kind {
            ChangeKind::Deleted => "DELETED",
            ChangeKind::Modified => "MODIFIED",
            ChangeKind::New => "NEW FILE DETECTED",
        };
        lines.push(format!("[!] {}: {}", tag, change.path));
    }

    if report.is_clean() {
        lines.push("[OK] No changes detected. System is clean.".to_string());
    } else {
        lines.push(String::new());
        lines.push("[WARNING] Integrity deviations detected!".to_string());
    }

    lines
}
