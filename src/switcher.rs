//! The orchestrator that turns a [`SwitchRequest`] into window-manager
//! commands.
//!
//! The focused output must always end up showing the requested workspace.
//! When that workspace is currently on another output the two outputs'
//! workspaces are swapped instead of focus simply jumping over there.
//!
//! Planning ([`plan_switch`]) is a pure function of one [`Snapshot`] of the
//! topology; [`WorkspaceSwitcher`] takes the snapshot, plans, and executes
//! the plan step by step against a [`WindowManager`].

use crate::command::{workspace_selector, OutputInfo, SwitchRequest, WmCommand, WorkspaceInfo};
use crate::traits::WindowManager;
use log::{debug, info};
use std::time::Duration;

/// Pause before the final `focus output`.
///
/// i3 applies `move workspace to output` asynchronously with respect to the
/// IPC connection; focusing the output right away can land on the wrong one.
pub const SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Possible errors from the switcher.
#[derive(Debug, thiserror::Error)]
pub enum SwitcherError {
    /// Malformed user input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The window manager reported a topology the switcher cannot work with.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// The window manager returned an error.
    #[error("window manager error: {0}")]
    Ipc(String),
}

impl SwitcherError {
    fn ipc(e: impl std::error::Error) -> Self {
        SwitcherError::Ipc(e.to_string())
    }
}

/// Outputs and workspaces as read at one point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub workspaces: Vec<WorkspaceInfo>,
    pub outputs: Vec<OutputInfo>,
}

//  State queries

/// The one workspace that has input focus.
pub fn focused_workspace(workspaces: &[WorkspaceInfo]) -> Result<&WorkspaceInfo, SwitcherError> {
    let mut focused = workspaces.iter().filter(|w| w.focused);
    match (focused.next(), focused.next()) {
        (Some(ws), None) => Ok(ws),
        _ => Err(SwitcherError::InvariantViolation(format!(
            "expected exactly one focused workspace, found {}",
            workspaces.iter().filter(|w| w.focused).count()
        ))),
    }
}

/// Outputs that are currently enabled.
pub fn active_outputs(outputs: &[OutputInfo]) -> Vec<&OutputInfo> {
    outputs.iter().filter(|o| o.active).collect()
}

/// The workspace numbered `num`, or `None` if i3 has not created it.
pub fn find_workspace(
    workspaces: &[WorkspaceInfo],
    num: i32,
) -> Result<Option<&WorkspaceInfo>, SwitcherError> {
    let mut matches = workspaces.iter().filter(|w| w.num == num);
    match (matches.next(), matches.next()) {
        (ws, None) => Ok(ws),
        (_, Some(_)) => Err(SwitcherError::InvariantViolation(format!(
            "more than one workspace numbered {}",
            num
        ))),
    }
}

fn output_of(ws: &WorkspaceInfo) -> Result<&str, SwitcherError> {
    ws.output.as_deref().ok_or_else(|| {
        SwitcherError::InvariantViolation(format!("workspace {:?} has no output", ws.name))
    })
}

//  Planning

/// Compute the commands that bring workspace `request.num` onto the focused
/// output.
///
/// Cases, first match wins:
///
/// 1. the focused workspace already is the target: nothing to do;
/// 2. the target does not exist: switching to it creates it here;
/// 3. the target lives on the focused output: a plain switch;
/// 4. the target is hidden on another output: switch to it, then swap as in 5;
/// 5. the target is visible on another output: swap the two outputs'
///    workspaces, re-show what the other output displayed, wait
///    `settle_delay` and give focus back to the original output.
pub fn plan_switch(
    request: &SwitchRequest,
    snapshot: &Snapshot,
    settle_delay: Duration,
) -> Result<Vec<WmCommand>, SwitcherError> {
    let num = request.num;
    let name = request.name.as_deref();
    let focused = focused_workspace(&snapshot.workspaces)?;
    debug!(
        "switching to workspace {} from {:?} on output {:?}",
        request, focused.name, focused.output
    );

    if focused.num == num {
        debug!("already on workspace {}", num);
        return Ok(Vec::new());
    }

    let wanted = match find_workspace(&snapshot.workspaces, num)? {
        Some(ws) => ws,
        None => {
            debug!("workspace {} does not exist, switching creates it", num);
            return Ok(vec![WmCommand::switch_named(num, name)]);
        }
    };
    debug!("wanted workspace: {:?}", wanted);

    if wanted.output == focused.output {
        debug!("wanted workspace already on the focused output");
        return Ok(vec![WmCommand::switch_named(num, name)]);
    }

    let original_output = output_of(focused)?;
    let wanted_output = output_of(wanted)?;

    let other_output = active_outputs(&snapshot.outputs)
        .into_iter()
        .find(|o| o.name == wanted_output)
        .ok_or_else(|| {
            SwitcherError::InvariantViolation(format!(
                "workspace {} is on output {:?} which is not active",
                num, wanted_output
            ))
        })?;
    debug!("other output: {:?}", other_output);

    let other_workspace = other_output
        .current_workspace
        .as_deref()
        .and_then(|current| snapshot.workspaces.iter().find(|w| w.name == current))
        .ok_or_else(|| {
            SwitcherError::InvariantViolation(format!(
                "output {:?} shows no known workspace ({:?})",
                other_output.name, other_output.current_workspace
            ))
        })?;
    debug!("other workspace: {:?}", other_workspace);

    let mut plan = Vec::with_capacity(8);

    // A hidden target gets a plain switch first and then still goes through
    // the swap below.
    if !wanted.visible {
        debug!("wanted workspace is hidden on output {:?}", wanted_output);
        plan.push(WmCommand::switch_named(num, name));
    }

    debug!("wanted workspace is on another output, swapping");
    plan.extend([
        WmCommand::switch(wanted.num),
        WmCommand::MoveWorkspaceToOutput(original_output.to_string()),
        WmCommand::switch(focused.num),
        WmCommand::MoveWorkspaceToOutput(wanted_output.to_string()),
        // The requested name travels with this switch as well.
        WmCommand::switch_named(other_workspace.num, name),
        WmCommand::Settle(settle_delay),
        WmCommand::FocusOutput(original_output.to_string()),
    ]);
    Ok(plan)
}

//  Execution

/// Drives a [`WindowManager`] to satisfy [`SwitchRequest`]s.
///
/// Generic over the window manager so the same logic runs against i3 and
/// against the recording mocks in the tests.
pub struct WorkspaceSwitcher<W: WindowManager> {
    wm: W,
    settle_delay: Duration,
}

impl<W: WindowManager> WorkspaceSwitcher<W> {
    /// Create a switcher using the default [`SETTLE_DELAY`].
    pub fn new(wm: W) -> Self {
        Self {
            wm,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Replace the pause taken before the final `focus output` of a swap.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// The pause taken before the final `focus output` of a swap.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// The window manager commands are sent to.
    pub fn wm(&self) -> &W {
        &self.wm
    }

    /// Read the current workspaces and outputs.
    pub fn snapshot(&self) -> Result<Snapshot, SwitcherError> {
        Ok(Snapshot {
            workspaces: self.wm.workspaces().map_err(SwitcherError::ipc)?,
            outputs: self.wm.outputs().map_err(SwitcherError::ipc)?,
        })
    }

    /// Switch to `request` xmonad-style.
    ///
    /// Returns the plan that was executed.  If a command fails midway the
    /// commands before it have **already** been applied; nothing is rolled
    /// back.
    pub fn switch_to(&self, request: &SwitchRequest) -> Result<Vec<WmCommand>, SwitcherError> {
        let snapshot = self.snapshot()?;
        let plan = plan_switch(request, &snapshot, self.settle_delay)?;
        info!("switch to {}: {} step(s)", request, plan.len());
        self.execute(&plan)?;
        Ok(plan)
    }

    /// Issue each command in order, stopping at the first failure.
    pub fn execute(&self, plan: &[WmCommand]) -> Result<(), SwitcherError> {
        for cmd in plan {
            debug!("{}", cmd);
            match cmd {
                WmCommand::Switch { num, name } => self
                    .wm
                    .focus_workspace(&workspace_selector(*num, name.as_deref()))
                    .map_err(SwitcherError::ipc)?,
                WmCommand::MoveWorkspaceToOutput(output) => self
                    .wm
                    .run_command("move", &format!("workspace to output {}", output))
                    .map_err(SwitcherError::ipc)?,
                WmCommand::Settle(delay) => std::thread::sleep(*delay),
                WmCommand::FocusOutput(output) => self
                    .wm
                    .run_command("focus", &format!("output {}", output))
                    .map_err(SwitcherError::ipc)?,
            }
        }
        Ok(())
    }
}

//  Tests
