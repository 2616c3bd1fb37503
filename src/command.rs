//! Requests, commands and types used throughout wkswitch.
//!
//! [`SwitchRequest`] is what the user asks for, [`WmCommand`] is one step of
//! the plan the switcher derives from it, and [`OutputInfo`] /
//! [`WorkspaceInfo`] describe the window-manager topology the plan is
//! computed from.
//!
//! The CLI forwards the raw argument; parsing accepts `"N"` or `"N:name"`
//! (whitespace around either part is ignored).

use crate::switcher::SwitcherError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A request to switch to workspace `num`, optionally naming it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRequest {
    pub num: i32,
    pub name: Option<String>,
}

impl SwitchRequest {
    pub fn new(num: i32) -> Self {
        Self { num, name: None }
    }

    pub fn named(num: i32, name: impl Into<String>) -> Self {
        Self {
            num,
            name: Some(name.into()),
        }
    }
}

/// True when `s` has the shape `<ws><digits><ws>:<something>`.
///
/// The match is anchored at the start only; anything may follow the first
/// non-newline character after the colon.
fn has_name_part(s: &str) -> bool {
    let rest = s.trim_start();
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return false;
    }
    let rest = rest[digits..].trim_start();
    match rest.strip_prefix(':') {
        Some(after) => after.chars().next().is_some_and(|c| c != '\n'),
        None => false,
    }
}

fn parse_num(s: &str) -> Result<i32, SwitcherError> {
    s.parse()
        .map_err(|_| SwitcherError::InvalidArgument(format!("invalid workspace number: {:?}", s)))
}

/// Parses `"N"` or `"N:name"`, splitting on the first colon.
///
/// A name that is blank after trimming is dropped, so `"5: "` selects
/// `number 5` instead of sending i3 the empty-named `5:`.
impl FromStr for SwitchRequest {
    type Err = SwitcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if has_name_part(s) {
            if let Some((num, name)) = s.split_once(':') {
                let name = name.trim();
                return Ok(Self {
                    num: parse_num(num.trim())?,
                    name: (!name.is_empty()).then(|| name.to_string()),
                });
            }
        }
        Ok(Self::new(parse_num(s.trim())?))
    }
}

impl fmt::Display for SwitchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}:{}", self.num, name),
            None => write!(f, "{}", self.num),
        }
    }
}

/// Workspace selector understood by i3's `workspace` command.
///
/// Without a name i3 must be told to match by number (`number N`), otherwise
/// `N:name` both selects and, if needed, creates the named workspace.
pub fn workspace_selector(num: i32, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}:{}", num, name),
        None => format!("number {}", num),
    }
}

/// One step of a switch plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WmCommand {
    /// Focus (and create if missing) a workspace.
    Switch { num: i32, name: Option<String> },
    /// Move the focused workspace to the named output.
    MoveWorkspaceToOutput(String),
    /// Wait for the window manager to apply pending output moves.
    Settle(Duration),
    /// Give input focus to the named output.
    FocusOutput(String),
}

impl WmCommand {
    pub fn switch(num: i32) -> Self {
        WmCommand::Switch { num, name: None }
    }

    pub fn switch_named(num: i32, name: Option<&str>) -> Self {
        WmCommand::Switch {
            num,
            name: name.map(str::to_string),
        }
    }
}

impl fmt::Display for WmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WmCommand::Switch { num, name } => {
                write!(f, "workspace {}", workspace_selector(*num, name.as_deref()))
            }
            WmCommand::MoveWorkspaceToOutput(output) => {
                write!(f, "move workspace to output {}", output)
            }
            WmCommand::Settle(delay) => write!(f, "settle {}ms", delay.as_millis()),
            WmCommand::FocusOutput(output) => write!(f, "focus output {}", output),
        }
    }
}

/// An output (monitor) as reported by the window manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfo {
    pub name: String,
    pub active: bool,
    /// Name of the workspace shown on this output, if any.
    #[serde(default)]
    pub current_workspace: Option<String>,
}

/// A workspace as reported by the window manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    /// Numeric prefix of the name; i3 reports `-1` for purely named ones.
    pub num: i32,
    pub name: String,
    #[serde(default)]
    pub output: Option<String>,
    pub visible: bool,
    pub focused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_number() {
        let r: SwitchRequest = "3".parse().unwrap();
        assert_eq!(r, SwitchRequest::new(3));
    }

    #[test]
    fn parse_number_and_name() {
        let r: SwitchRequest = "3:web".parse().unwrap();
        assert_eq!(r, SwitchRequest::named(3, "web"));
    }

    #[test]
    fn parse_trims_both_parts() {
        let r: SwitchRequest = " 3 : web ".parse().unwrap();
        assert_eq!(r, SwitchRequest::named(3, "web"));
    }

    #[test]
    fn parse_splits_on_first_colon_only() {
        let r: SwitchRequest = "4:irc:libera".parse().unwrap();
        assert_eq!(r, SwitchRequest::named(4, "irc:libera"));
    }

    #[test]
    fn parse_blank_name_is_none() {
        let r: SwitchRequest = "5:   ".parse().unwrap();
        assert_eq!(r, SwitchRequest::new(5));
        assert_eq!(workspace_selector(r.num, r.name.as_deref()), "number 5");
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = "abc".parse::<SwitchRequest>().unwrap_err();
        assert!(matches!(err, SwitcherError::InvalidArgument(_)));
    }

    #[test]
    fn parse_rejects_name_without_number() {
        let err = ":web".parse::<SwitchRequest>().unwrap_err();
        assert!(matches!(err, SwitcherError::InvalidArgument(_)));
    }

    #[test]
    fn parse_rejects_dangling_colon() {
        // "7:" has nothing after the colon, so it is parsed as a plain number.
        let err = "7:".parse::<SwitchRequest>().unwrap_err();
        assert!(matches!(err, SwitcherError::InvalidArgument(_)));
    }

    #[test]
    fn request_display() {
        assert_eq!(SwitchRequest::new(2).to_string(), "2");
        assert_eq!(SwitchRequest::named(2, "mail").to_string(), "2:mail");
    }

    #[test]
    fn selectors() {
        assert_eq!(workspace_selector(3, None), "number 3");
        assert_eq!(workspace_selector(3, Some("web")), "3:web");
    }

    #[test]
    fn command_display_matches_i3_syntax() {
        assert_eq!(WmCommand::switch(1).to_string(), "workspace number 1");
        assert_eq!(
            WmCommand::switch_named(1, Some("www")).to_string(),
            "workspace 1:www"
        );
        assert_eq!(
            WmCommand::MoveWorkspaceToOutput("HDMI-1".into()).to_string(),
            "move workspace to output HDMI-1"
        );
        assert_eq!(
            WmCommand::FocusOutput("eDP-1".into()).to_string(),
            "focus output eDP-1"
        );
    }

    #[test]
    fn deserialize_i3_workspace() {
        let json = r#"{
            "id": 94135283401440,
            "num": 2,
            "name": "2:web",
            "visible": true,
            "focused": false,
            "urgent": false,
            "rect": {"x": 1920, "y": 0, "width": 1920, "height": 1080},
            "output": "HDMI-1"
        }"#;
        let ws: WorkspaceInfo = serde_json::from_str(json).unwrap();
        assert_eq!(ws.num, 2);
        assert_eq!(ws.name, "2:web");
        assert_eq!(ws.output.as_deref(), Some("HDMI-1"));
        assert!(ws.visible);
        assert!(!ws.focused);
    }

    #[test]
    fn deserialize_inactive_output() {
        let json = r#"{"name": "xroot-0", "active": false, "primary": false, "current_workspace": null}"#;
        let out: OutputInfo = serde_json::from_str(json).unwrap();
        assert_eq!(out.name, "xroot-0");
        assert!(!out.active);
        assert_eq!(out.current_workspace, None);
    }
}
