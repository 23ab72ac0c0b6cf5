//! Finding filters and summary

use crate::analyzer::types::{Severity, Vulnerability, VulnerabilitySummary};

/// Keep findings at or above `min`. `Unspecified` keeps everything.
pub fn filter_by_severity(vulnerabilities: Vec<Vulnerability>, min: Severity) -> Vec<Vulnerability> {
    if min == Severity::Unspecified {
        return vulnerabilities;
    }

    vulnerabilities
        .into_iter()
        .filter(|v| {
            log::trace!(
                "Evaluating vulnerability for severity filter: vulnerability_id={} severity={} severity_level={} threshold_level={}",
                v.id,
                v.severity,
                v.severity.level(),
                min.level()
            );
            v.severity >= min
        })
        .collect()
}

/// Keep findings that have a fixed version
pub fn filter_fixable(vulnerabilities: Vec<Vulnerability>) -> Vec<Vulnerability> {
    vulnerabilities.into_iter().filter(Vulnerability::is_fixable).collect()
}

pub fn build_summary(vulnerabilities: &[Vulnerability]) -> VulnerabilitySummary {
    let mut summary = VulnerabilitySummary {
        total_count: vulnerabilities.len(),
        ..Default::default()
    };

    for v in vulnerabilities {
        *summary.count_by_severity.entry(v.severity).or_insert(0) += 1;
        if v.is_fixable() {
            summary.fixable_count += 1;
        }
    }
    summary
}
