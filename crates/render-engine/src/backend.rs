//! Render backend abstraction.

use docwarp_common::error::DocwarpResult;

use crate::plan::ScenePlan;

/// Prefix of the status lines the engine driver prints on stdout.
pub const STATUS_PREFIX: &str = "docwarp:";

/// Trait for engines that can execute a [`ScenePlan`].
///
/// Implementations own a single, globally stateful engine. Execution takes
/// `&mut self`, so two plans can never run on one backend at the same time.
pub trait RenderBackend: Send {
    /// Execute every step of the plan, blocking until the still render has
    /// been written or the engine has failed.
    fn execute(&mut self, plan: &ScenePlan) -> DocwarpResult<BackendReport>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// What the engine reported while executing a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendReport {
    /// Steps the engine acknowledged, in order.
    pub steps_completed: Vec<String>,

    /// Whether the target object was found in the preset scene.
    pub target_found: bool,

    /// Whether the document material was assigned to the target.
    pub texture_attached: bool,

    /// Whether the engine reported a finished render.
    pub render_finished: bool,

    /// Last error message printed by the driver, if any.
    pub error: Option<String>,
}

impl BackendReport {
    /// Fold one `docwarp:key=value` line into the report. Lines without the
    /// prefix are ignored.
    pub fn apply_status_line(&mut self, line: &str) {
        let Some(status) = line.trim().strip_prefix(STATUS_PREFIX) else {
            return;
        };
        let Some((key, value)) = status.split_once('=') else {
            return;
        };

        match key {
            "step" => self.steps_completed.push(value.to_string()),
            "target" => self.target_found = value == "found",
            "texture" => self.texture_attached = value == "attached",
            "render" => self.render_finished = value == "finished",
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }

    /// Whether the engine acknowledged the given step.
    pub fn completed(&self, op: &str) -> bool {
        self.steps_completed.iter().any(|s| s == op)
    }
}
