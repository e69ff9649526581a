//! Plan step: turn the task (plus scratchpad) into one candidate command.

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::core::reasoning::extract_reasoning;
use crate::io::gateway::Gateway;
use crate::io::prompt::PromptEngine;
use crate::pipeline::PipelineState;

/// Ask the gateway for a candidate command.
///
/// The reply's reasoning segment, if present, is appended to the scratchpad
/// tagged with the step number it belongs to; the remainder becomes the
/// candidate command. A failed completion aborts the run: substituting an
/// empty command for a failed call would silently turn a fault into a no-op.
#[instrument(skip_all, fields(step = state.step_count))]
pub fn plan<G: Gateway + ?Sized>(
    state: &mut PipelineState,
    gateway: &G,
    prompts: &PromptEngine,
) -> Result<()> {
    let prompt = prompts.render_planner(&state.task, &state.scratchpad_text())?;
    let reply = gateway.complete(&prompt).context("planner completion failed")?;

    let (reasoning, command) = extract_reasoning(&reply);
    if let Some(thought) = reasoning {
        state.record_reasoning(thought);
    }
    debug!(command = %command, "planner extracted command");
    state.command = command;
    state.step_count += 1;
    Ok(())
}
