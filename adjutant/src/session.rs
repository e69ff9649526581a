//! Drives the pipeline for one task and collects the artifacts callers care
//! about: the planned command, the raw execution output, and the summary.

use anyhow::Result;
use tracing::{info, instrument};

use crate::core::policy::ExecPolicy;
use crate::core::types::TaskReport;
use crate::io::gateway::Gateway;
use crate::io::prompt::PromptEngine;
use crate::pipeline::{self, PipelineState, Stage};

/// One configured runner. Holds borrowed collaborators so a single gateway
/// and prompt engine can serve many runs (the REPL reuses one session).
pub struct Session<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
    prompts: &'a PromptEngine,
    policy: ExecPolicy,
}

impl<'a, G: Gateway + ?Sized> Session<'a, G> {
    pub fn new(gateway: &'a G, prompts: &'a PromptEngine, policy: ExecPolicy) -> Self {
        Self {
            gateway,
            prompts,
            policy,
        }
    }

    /// Run one task through the pipeline. Callers must reject empty tasks
    /// before calling; a blank task would still burn a gateway round-trip.
    #[instrument(skip_all)]
    pub fn run(&self, task: &str) -> Result<TaskReport> {
        self.run_from_state(PipelineState::new(task))
    }

    /// Run the pipeline from pre-built state. Exposed so callers can resume
    /// or pre-seed runs; `run` is the common entry point.
    pub fn run_from_state(&self, mut state: PipelineState) -> Result<TaskReport> {
        let mut stage = Stage::Plan;
        let mut command = String::new();
        let mut raw_output = None;
        while stage != Stage::Done {
            let current = stage;
            stage = pipeline::advance(
                current,
                &mut state,
                self.gateway,
                self.prompts,
                &self.policy,
            )?;
            // Snapshot artifacts before later stages overwrite the state.
            match current {
                Stage::Plan => command = state.command.clone(),
                Stage::Execute => raw_output = Some(state.output.clone()),
                Stage::Present | Stage::Safety | Stage::Done => {}
            }
        }
        info!(
            steps = state.step_count,
            executed = raw_output.is_some(),
            "run complete"
        );
        Ok(TaskReport {
            command,
            raw_output,
            summary: state.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::ExecutionMode;
    use crate::io::shell::NO_COMMAND_NOTICE;
    use crate::pipeline::{MAX_STEPS, SAFETY_NOTICE};
    use crate::test_support::{FailingGateway, ScriptedGateway};
    use std::time::Duration;

    fn stable(allowed: &[&str]) -> ExecPolicy {
        ExecPolicy {
            mode: ExecutionMode::Stable,
            allowed_commands: allowed.iter().map(|c| (*c).to_string()).collect(),
            timeout: Duration::from_secs(5),
        }
    }

    /// A report keeps all three artifacts distinct: the planned command, the
    /// untouched execution output, and the presenter's summary.
    #[test]
    fn report_retains_command_raw_output_and_summary() {
        let gateway = ScriptedGateway::new([
            "bash -c \"echo out; echo err 1>&2\"",
            "Both streams were captured.",
        ]);
        let prompts = PromptEngine::new();
        let session = Session::new(&gateway, &prompts, stable(&["bash"]));

        let report = session.run("exercise both streams").expect("run");

        assert_eq!(report.command, "bash -c \"echo out; echo err 1>&2\"");
        assert_eq!(report.raw_output.as_deref(), Some("out\n\n[STDERR]\nerr"));
        assert_eq!(report.summary, "Both streams were captured.");
        gateway.assert_drained();
    }

    /// An empty planner reply surfaces the no-op notice as the raw output
    /// rather than failing the run.
    #[test]
    fn empty_command_reports_the_no_op_notice() {
        let gateway = ScriptedGateway::new(["", "There was nothing to run."]);
        let prompts = PromptEngine::new();
        let session = Session::new(&gateway, &prompts, stable(&[]));

        let report = session.run("do nothing").expect("run");

        assert_eq!(report.command, "");
        assert_eq!(report.raw_output.as_deref(), Some(NO_COMMAND_NOTICE));
        assert_eq!(report.summary, "There was nothing to run.");
        gateway.assert_drained();
    }

    /// When the safety state fires, nothing executed: `raw_output` stays
    /// absent and the summary is the safety notice itself.
    #[test]
    fn safety_abort_leaves_raw_output_absent() {
        let gateway = ScriptedGateway::new(["ls"]);
        let prompts = PromptEngine::new();
        let session = Session::new(&gateway, &prompts, stable(&[]));
        let mut state = PipelineState::new("anything");
        state.step_count = MAX_STEPS;

        let report = session.run_from_state(state).expect("run");

        assert_eq!(report.raw_output, None);
        assert_eq!(report.summary, SAFETY_NOTICE);
        gateway.assert_drained();
    }

    #[test]
    fn presenter_failure_aborts_the_run() {
        let gateway = ScriptedGateway::new(["uptime"]);
        let prompts = PromptEngine::new();
        let session = Session::new(&gateway, &prompts, stable(&["uptime"]));

        let err = session.run("how long has this host been up").unwrap_err();
        assert!(format!("{err:#}").contains("presenter completion failed"));
    }

    #[test]
    fn planner_failure_aborts_the_run() {
        let gateway = FailingGateway;
        let prompts = PromptEngine::new();
        let session = Session::new(&gateway, &prompts, stable(&[]));

        let err = session.run("anything").unwrap_err();
        assert!(format!("{err:#}").contains("planner completion failed"));
    }
}
