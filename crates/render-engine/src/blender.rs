//! Blender subprocess backend.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use docwarp_common::error::{DocwarpError, DocwarpResult};

use crate::backend::{BackendReport, RenderBackend};
use crate::plan::{SceneStep, ScenePlan};

const DRIVER_SCRIPT: &str = include_str!("../assets/blender_driver.py");

/// Driver exit codes (see `assets/blender_driver.py`).
const EXIT_IMAGE_LOAD: i32 = 3;
const EXIT_RENDER: i32 = 4;
const EXIT_PRESET: i32 = 5;

/// Lines of stderr kept in failure messages.
const STDERR_TAIL_LINES: usize = 20;

/// Runs each plan in a fresh headless Blender process.
#[derive(Debug, Clone)]
pub struct BlenderBackend {
    binary: PathBuf,
}

impl BlenderBackend {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments passed to Blender for a plan stored at `plan_path`.
    fn command_args(plan_path: &Path) -> Vec<String> {
        vec![
            "--background".to_string(),
            "--factory-startup".to_string(),
            "--python-exit-code".to_string(),
            "1".to_string(),
            "--python-expr".to_string(),
            DRIVER_SCRIPT.to_string(),
            "--".to_string(),
            plan_path.display().to_string(),
        ]
    }

    fn write_plan(plan: &ScenePlan) -> DocwarpResult<PathBuf> {
        let output = plan
            .output_path()
            .ok_or_else(|| DocwarpError::render("Scene plan does not configure an output"))?;
        let plan_path = output.with_extension("plan.json");
        std::fs::write(&plan_path, plan.to_json()?).map_err(|e| {
            DocwarpError::render(format!(
                "Failed to write scene plan {}: {e}",
                plan_path.display()
            ))
        })?;
        Ok(plan_path)
    }

    fn run_blender(&self, plan: &ScenePlan, plan_path: &Path) -> DocwarpResult<BackendReport> {
        let args = Self::command_args(plan_path);
        tracing::debug!(
            binary = %self.binary.display(),
            plan = %plan_path.display(),
            "Running blender"
        );

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Keep terminal Ctrl-C away from blender: batches only stop between
        // effects, never mid-render.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let start = std::time::Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| DocwarpError::render(format!("Failed to start blender: {e}")))?;

        tracing::info!(
            pid = child.id(),
            effect = %plan.effect_id,
            steps = plan.steps.len(),
            "blender process started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DocwarpError::render("Failed to capture blender stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| DocwarpError::render("Failed to capture blender stderr"))?;

        // Drain stderr concurrently so blender never blocks on a full pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read blender stderr: {err}>"),
            }
        });

        let mut report = BackendReport::default();
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        loop {
            line.clear();
            let bytes = reader
                .read_line(&mut line)
                .map_err(|e| DocwarpError::render(format!("Failed reading blender output: {e}")))?;
            if bytes == 0 {
                break;
            }
            tracing::trace!(line = line.trim_end(), "blender");
            report.apply_status_line(&line);
        }

        let status = child
            .wait()
            .map_err(|e| DocwarpError::render(format!("Failed to wait on blender: {e}")))?;

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        tracing::info!(
            effect = %plan.effect_id,
            elapsed_secs = start.elapsed().as_secs_f64(),
            steps_completed = report.steps_completed.len(),
            status = %status,
            "blender process finished"
        );

        check_exit(status, &report, plan, &stderr_output)?;
        Ok(report)
    }
}

impl Default for BlenderBackend {
    fn default() -> Self {
        Self::new("blender")
    }
}

impl RenderBackend for BlenderBackend {
    fn execute(&mut self, plan: &ScenePlan) -> DocwarpResult<BackendReport> {
        let plan_path = Self::write_plan(plan)?;
        let result = self.run_blender(plan, &plan_path);
        if let Err(err) = std::fs::remove_file(&plan_path) {
            tracing::debug!(error = %err, path = %plan_path.display(), "Failed to remove scene plan");
        }
        result
    }

    fn is_available(&self) -> bool {
        if self.binary.components().count() > 1 {
            return self.binary.is_file();
        }
        command_exists(&self.binary.to_string_lossy())
    }

    fn name(&self) -> &str {
        "blender"
    }
}

/// Map the driver's exit status onto the error taxonomy.
fn check_exit(
    status: ExitStatus,
    report: &BackendReport,
    plan: &ScenePlan,
    stderr_output: &str,
) -> DocwarpResult<()> {
    if status.success() && report.render_finished {
        return Ok(());
    }

    let detail = report
        .error
        .clone()
        .unwrap_or_else(|| stderr_tail(stderr_output, STDERR_TAIL_LINES));

    match status.code() {
        Some(0) => Err(DocwarpError::render(format!(
            "blender exited without finishing the render for {:?}",
            plan.effect_id
        ))),
        Some(EXIT_IMAGE_LOAD) => {
            let image = plan
                .steps
                .iter()
                .find_map(|step| match step {
                    SceneStep::AttachImageMaterial { image, .. } => Some(image.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            Err(DocwarpError::image_load(image, detail))
        }
        Some(EXIT_PRESET) => Err(DocwarpError::render(format!(
            "blender could not open the preset: {detail}"
        ))),
        Some(EXIT_RENDER) => Err(DocwarpError::render(format!(
            "blender render did not finish: {detail}"
        ))),
        _ => Err(DocwarpError::render(format!(
            "blender failed (status {status}): {detail}"
        ))),
    }
}

fn stderr_tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v '{binary}' >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
