//! The seam between the switcher and a concrete window manager.
//!
//! The [`WorkspaceSwitcher`](crate::switcher::WorkspaceSwitcher) only depends
//! on [`WindowManager`]; the i3 IPC client in [`crate::i3`] is one
//! implementation, the recording mocks in the tests are others.

use crate::command::{OutputInfo, WorkspaceInfo};

/// Abstraction over a window manager that can report its outputs and
/// workspaces and accept workspace and output commands.
///
/// An implementation might talk to i3 via IPC, or it might be a recording
/// stub used in tests.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Return every workspace the window manager knows about.
    fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, Self::Error>;

    /// Return every output, active or not.
    fn outputs(&self) -> Result<Vec<OutputInfo>, Self::Error>;

    /// Focus the workspace matching `selector`.
    ///
    /// `selector` is either `number N` or `N:name`; see
    /// [`workspace_selector`](crate::command::workspace_selector).
    fn focus_workspace(&self, selector: &str) -> Result<(), Self::Error>;

    /// Run an arbitrary command, `verb` followed by `args`
    /// (e.g. `"move"`, `"workspace to output DP-1"`).
    fn run_command(&self, verb: &str, args: &str) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// A test double that records every command sent to it.
    #[derive(Debug, Default)]
    struct MockWm {
        log: RefCell<Vec<String>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl WindowManager for MockWm {
        type Error = MockError;

        fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, MockError> {
            Ok(vec![WorkspaceInfo {
                num: 1,
                name: "1".into(),
                output: Some("MOCK-1".into()),
                visible: true,
                focused: true,
            }])
        }

        fn outputs(&self) -> Result<Vec<OutputInfo>, MockError> {
            Ok(vec![OutputInfo {
                name: "MOCK-1".into(),
                active: true,
                current_workspace: Some("1".into()),
            }])
        }

        fn focus_workspace(&self, selector: &str) -> Result<(), MockError> {
            self.log.borrow_mut().push(format!("workspace {}", selector));
            Ok(())
        }

        fn run_command(&self, verb: &str, args: &str) -> Result<(), MockError> {
            self.log.borrow_mut().push(format!("{} {}", verb, args));
            Ok(())
        }
    }

    #[test]
    fn mock_wm_records_commands() {
        let wm = MockWm::default();
        wm.focus_workspace("number 4").unwrap();
        wm.run_command("focus", "output MOCK-1").unwrap();
        assert_eq!(
            *wm.log.borrow(),
            vec!["workspace number 4".to_string(), "focus output MOCK-1".to_string()]
        );
    }

    #[test]
    fn mock_wm_works_behind_a_reference() {
        fn focused_name<W: WindowManager>(wm: &W) -> Option<String> {
            wm.workspaces()
                .ok()?
                .into_iter()
                .find(|w| w.focused)
                .map(|w| w.name)
        }
        assert_eq!(focused_name(&MockWm::default()).as_deref(), Some("1"));
    }
}
