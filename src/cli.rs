//! Command-line policy.
//!
//! A bad command line is the only thing that makes wkswitch exit non-zero.
//! Once the argument is accepted, a failed switch is logged and the process
//! still exits 0, since it runs from a key binding with nobody watching.

use crate::command::SwitchRequest;
use crate::switcher::{SwitcherError, WorkspaceSwitcher};
use crate::traits::WindowManager;
use log::{debug, error, info};
use std::error::Error;
use std::time::Duration;

/// Exit status after the argument was accepted, whatever the switch did.
pub const EXIT_OK: u8 = 0;
/// Exit status for a malformed command line.
pub const EXIT_USAGE: u8 = 1;

/// Why the command line was rejected.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Usage: {0} WORKSPACE_NUM")]
    Usage(String),
    #[error("{0}")]
    Request(#[from] SwitcherError),
}

impl CliError {
    pub fn exit_status(&self) -> u8 {
        EXIT_USAGE
    }
}

/// Validate `args` (program name included) and parse the workspace argument.
pub fn parse_args(args: &[String]) -> Result<SwitchRequest, CliError> {
    match args {
        [_, workspace] => Ok(workspace.parse()?),
        _ => {
            let prog = args.first().map(String::as_str).unwrap_or("wkswitch");
            Err(CliError::Usage(prog.to_string()))
        }
    }
}

/// Connect with `connect`, perform the switch and log any failure.
///
/// Always returns [`EXIT_OK`].
pub fn switch_and_report<W, E, C>(request: &SwitchRequest, settle_delay: Duration, connect: C) -> u8
where
    W: WindowManager,
    E: Error,
    C: FnOnce() -> Result<W, E>,
{
    let result = connect()
        .map_err(|e| SwitcherError::Ipc(e.to_string()))
        .and_then(|wm| {
            WorkspaceSwitcher::new(wm)
                .with_settle_delay(settle_delay)
                .switch_to(request)
        });

    match result {
        Ok(plan) => info!("switched to {} with {} command(s)", request, plan.len()),
        Err(e) => {
            error!("an error occurred switching to {}: {}", request, error_chain(&e));
            debug!("{:?}", e);
        }
    }
    EXIT_OK
}

/// Render `e` and all of its sources as `outer: inner: ...`.
fn error_chain(e: &dyn Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{OutputInfo, WorkspaceInfo};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_argument_is_a_usage_error() {
        let err = parse_args(&args(&["wkswitch"])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.to_string(), "Usage: wkswitch WORKSPACE_NUM");
        assert_eq!(err.exit_status(), EXIT_USAGE);
    }

    #[test]
    fn too_many_arguments_is_a_usage_error() {
        let err = parse_args(&args(&["/usr/bin/wkswitch", "1", "2"])).unwrap_err();
        assert_eq!(err.to_string(), "Usage: /usr/bin/wkswitch WORKSPACE_NUM");
        assert_eq!(err.exit_status(), 1);
    }

    #[test]
    fn empty_argv_still_prints_usage() {
        let err = parse_args(&[]).unwrap_err();
        assert_eq!(err.to_string(), "Usage: wkswitch WORKSPACE_NUM");
    }

    #[test]
    fn non_numeric_argument_exits_with_usage_status() {
        let err = parse_args(&args(&["wkswitch", "abc"])).unwrap_err();
        assert!(matches!(
            err,
            CliError::Request(SwitcherError::InvalidArgument(_))
        ));
        assert_eq!(err.exit_status(), EXIT_USAGE);
    }

    #[test]
    fn valid_argument_is_parsed() {
        let request = parse_args(&args(&["wkswitch", " 3 : web "])).unwrap();
        assert_eq!(request, SwitchRequest::named(3, "web"));
    }

    /// Window manager whose every call fails.
    #[derive(Debug)]
    struct BrokenWm;

    #[derive(Debug, thiserror::Error)]
    #[error("socket closed")]
    struct BrokenErr;

    impl WindowManager for BrokenWm {
        type Error = BrokenErr;

        fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, BrokenErr> {
            Err(BrokenErr)
        }

        fn outputs(&self) -> Result<Vec<OutputInfo>, BrokenErr> {
            Err(BrokenErr)
        }

        fn focus_workspace(&self, _: &str) -> Result<(), BrokenErr> {
            Err(BrokenErr)
        }

        fn run_command(&self, _: &str, _: &str) -> Result<(), BrokenErr> {
            Err(BrokenErr)
        }
    }

    #[test]
    fn failing_window_manager_still_exits_ok() {
        let status = switch_and_report(&SwitchRequest::new(2), Duration::ZERO, || {
            Ok::<_, BrokenErr>(BrokenWm)
        });
        assert_eq!(status, EXIT_OK);
    }

    #[test]
    fn failing_connection_still_exits_ok() {
        let status = switch_and_report(&SwitchRequest::new(2), Duration::ZERO, || {
            Err::<BrokenWm, _>(BrokenErr)
        });
        assert_eq!(status, EXIT_OK);
    }

    #[test]
    fn error_chain_includes_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] BrokenErr);

        assert_eq!(error_chain(&Outer(BrokenErr)), "outer: socket closed");
    }
}
