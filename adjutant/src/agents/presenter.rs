//! Present step: summarize the executed command's output for the user.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::reasoning::strip_reasoning;
use crate::io::gateway::Gateway;
use crate::io::prompt::PromptEngine;
use crate::pipeline::PipelineState;

/// Ask the gateway for a human-readable summary.
///
/// Any reasoning segment in the reply is discarded, not scratchpadded. The
/// summary overwrites `state.output`; callers wanting the raw execution text
/// must capture it before this step runs.
#[instrument(skip_all, fields(step = state.step_count))]
pub fn present<G: Gateway + ?Sized>(
    state: &mut PipelineState,
    gateway: &G,
    prompts: &PromptEngine,
) -> Result<()> {
    let prompt = prompts.render_presenter(&state.command, &state.output)?;
    let reply = gateway.complete(&prompt).context("presenter completion failed")?;

    state.output = strip_reasoning(&reply);
    state.step_count += 1;
    debug!(summary_chars = state.output.len(), "presenter summarized output");
    Ok(())
}
