//! Outcome report for edits broadcast across an instrument's regions

/// How loudly the surrounding application should present a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSeverity {
    Info,
    Warning,
}

/// Counts of sibling regions skipped during an all-regions broadcast
///
/// Distinguishes regions lacking the edited dimension kind entirely (minor)
/// from regions declaring it with a different zone count (critical).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub missing_dimension: usize,
    pub zone_count_mismatch: usize,
}

impl BroadcastReport {
    pub fn is_empty(&self) -> bool {
        self.missing_dimension == 0 && self.zone_count_mismatch == 0
    }

    pub fn severity(&self) -> ReportSeverity {
        if self.zone_count_mismatch > 0 {
            ReportSeverity::Warning
        } else {
            ReportSeverity::Info
        }
    }

    /// User-facing message, or `None` when nothing was skipped
    pub fn message(&self) -> Option<String> {
        match (self.missing_dimension, self.zone_count_mismatch) {
            (0, 0) => None,
            (m, 0) => Some(format!(
                "{} regions have been ignored since they don't have that dimension type.",
                m
            )),
            (0, c) => Some(format!(
                "{} regions have been ignored due to different amount of dimension zones!",
                c
            )),
            (m, c) => Some(format!(
                "{} regions have been ignored due to different amount of dimension zones \
                 (and {} regions have been ignored since they don't have that dimension type)!",
                c, m
            )),
        }
    }
}
