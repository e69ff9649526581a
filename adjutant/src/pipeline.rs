//! Fixed-topology pipeline for one task: Plan -> Execute -> Present.
//!
//! A step budget guards against unbounded replanning: the bound is checked
//! immediately after Plan, and the Safety state terminates the run before
//! Execute is ever reached. There is no loop-back edge: one run performs at
//! most one Plan, one Execute, and one Present.

use anyhow::Result;
use tracing::{debug, instrument, warn};

use crate::agents::{planner, presenter};
use crate::core::policy::ExecPolicy;
use crate::io::gateway::Gateway;
use crate::io::prompt::PromptEngine;
use crate::io::shell;

/// Maximum pipeline steps before the safety state aborts the run.
pub const MAX_STEPS: u32 = 5;

/// Output stored by the safety state when the step budget runs out.
pub const SAFETY_NOTICE: &str = "[SAFETY] Maximum steps exceeded";

/// One reasoning fragment recorded during a Plan step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchpadEntry {
    /// 1-based number of the Plan step that produced the fragment.
    pub step: u32,
    pub thought: String,
}

/// Mutable state of one pipeline run. Created fresh per task, mutated only by
/// stage transitions, and discarded when the run completes; nothing persists
/// across runs.
#[derive(Debug, Clone)]
pub struct PipelineState {
    /// Original user request; immutable for the run.
    pub task: String,
    /// Append-only reasoning fragments, in step order.
    pub scratchpad: Vec<ScratchpadEntry>,
    /// Current candidate command; overwritten by each Plan step.
    pub command: String,
    /// Current result text; overwritten by Execute, then again by Present.
    pub output: String,
    /// Completed pipeline steps.
    pub step_count: u32,
}

impl PipelineState {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            scratchpad: Vec::new(),
            command: String::new(),
            output: String::new(),
            step_count: 0,
        }
    }

    /// Append a reasoning fragment tagged with the step it belongs to.
    pub fn record_reasoning(&mut self, thought: String) {
        self.scratchpad.push(ScratchpadEntry {
            step: self.step_count + 1,
            thought,
        });
    }

    /// Scratchpad rendered for the planner prompt, one `Step N: ...` block
    /// per entry.
    pub fn scratchpad_text(&self) -> String {
        self.scratchpad
            .iter()
            .map(|entry| format!("Step {}: {}", entry.step, entry.thought))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Pipeline stages. `Done` is terminal; `Safety` is reachable only from
/// `Plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Plan,
    Execute,
    Present,
    Safety,
    Done,
}

/// Run one stage against the state and return the next stage.
///
/// Gateway failures abort the run; every other condition (denial, timeout,
/// spawn fault) lands in `state.output` as displayable text.
#[instrument(skip_all, fields(stage = ?stage, step = state.step_count))]
pub fn advance<G: Gateway + ?Sized>(
    stage: Stage,
    state: &mut PipelineState,
    gateway: &G,
    prompts: &PromptEngine,
    policy: &ExecPolicy,
) -> Result<Stage> {
    match stage {
        Stage::Plan => {
            planner::plan(state, gateway, prompts)?;
            if state.step_count >= MAX_STEPS {
                warn!(step_count = state.step_count, "step budget exceeded");
                Ok(Stage::Safety)
            } else {
                Ok(Stage::Execute)
            }
        }
        Stage::Execute => {
            let result = shell::execute(&state.command, policy);
            debug!(kind = ?result.kind, "command executed");
            state.output = result.text;
            state.step_count += 1;
            Ok(Stage::Present)
        }
        Stage::Present => {
            presenter::present(state, gateway, prompts)?;
            Ok(Stage::Done)
        }
        Stage::Safety => {
            state.output = SAFETY_NOTICE.to_string();
            Ok(Stage::Done)
        }
        Stage::Done => Ok(Stage::Done),
    }
}
