use crate::{cli::exit_status::ExitStatus, core::RunReport};

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub report: RunReport,
    pub is_apply: bool,
    /// Translation table path as configured.
    pub translations_file: String,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running glotmod commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Extract(summary) => {
                let totals = &summary.report.totals;
                if !summary.report.errors.is_empty() {
                    ExitStatus::Error
                } else if totals.missing > 0 || (!summary.is_apply && totals.files_changed > 0) {
                    ExitStatus::Failure
                } else {
                    ExitStatus::Success
                }
            }
            CommandSummary::Init(summary) if summary.error.is_some() => ExitStatus::Failure,
            CommandSummary::Init(_) => ExitStatus::Success,
        }
    }
}
