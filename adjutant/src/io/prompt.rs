//! Prompt rendering for the planner and presenter roles.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

const PLANNER_TEMPLATE: &str = include_str!("prompts/planner.md");
const PRESENTER_TEMPLATE: &str = include_str!("prompts/presenter.md");

/// Template engine wrapper around minijinja.
///
/// Templates are embedded at compile time; registration failure means a
/// broken template in the binary itself, not a runtime condition.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_template("planner", PLANNER_TEMPLATE)
            .expect("planner template should be valid");
        env.add_template("presenter", PRESENTER_TEMPLATE)
            .expect("presenter template should be valid");
        Self { env }
    }

    /// Render the planner prompt from the task and accumulated scratchpad.
    pub fn render_planner(&self, task: &str, scratchpad: &str) -> Result<String> {
        let template = self.env.get_template("planner")?;
        let rendered = template
            .render(context! {
                task => task.trim(),
                scratchpad => (!scratchpad.trim().is_empty()).then(|| scratchpad.trim()),
            })
            .context("render planner prompt")?;
        Ok(rendered)
    }

    /// Render the presenter prompt from the executed command and its output.
    pub fn render_presenter(&self, command: &str, output: &str) -> Result<String> {
        let template = self.env.get_template("presenter")?;
        let rendered = template
            .render(context! {
                command => command,
                output => output,
            })
            .context("render presenter prompt")?;
        Ok(rendered)
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_prompt_carries_task_and_rules() {
        let engine = PromptEngine::new();
        let prompt = engine.render_planner("show disk usage", "").expect("render");
        assert!(prompt.contains("User request: show disk usage"));
        assert!(prompt.contains("EXACTLY ONE shell command"));
        assert!(prompt.contains("<think>"));
    }

    /// The scratchpad section only appears once there is something to show.
    #[test]
    fn planner_prompt_omits_empty_scratchpad() {
        let engine = PromptEngine::new();
        let without = engine.render_planner("task", "  ").expect("render");
        assert!(!without.contains("Current scratchpad:"));

        let with = engine
            .render_planner("task", "Step 1: check mounts")
            .expect("render");
        assert!(with.contains("Current scratchpad:"));
        assert!(with.contains("Step 1: check mounts"));
    }

    #[test]
    fn presenter_prompt_embeds_command_and_output() {
        let engine = PromptEngine::new();
        let prompt = engine
            .render_presenter("df -h", "Filesystem  Size")
            .expect("render");
        assert!(prompt.contains("Command executed: `df -h`"));
        assert!(prompt.contains("Filesystem  Size"));
    }
}
