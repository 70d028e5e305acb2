use anyhow::{Context, Result};

use super::super::args::ExtractCommand;
use super::{CommandResult, CommandSummary, ExtractSummary};
use crate::core::{ExtractContext, HashKeyGenerator};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let mut ctx = ExtractContext::new(&args.common)?;

    // Key resolution is the only await point; files stay strictly sequential.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start async runtime")?;
    let outcome = runtime.block_on(ctx.run(&mut HashKeyGenerator, args.apply))?;

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary {
            report: outcome.report,
            is_apply: outcome.applied,
            translations_file: ctx.config.translations_file.clone(),
        }),
    })
}
