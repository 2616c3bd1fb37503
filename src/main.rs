//! Entry point for **wkswitch**.
//!
//! Usually bound to a key, e.g. `bindsym $mod+2 exec wkswitch 2`.  Errors
//! during the switch go to the log file and the process still exits 0; only
//! a malformed command line exits non-zero.

use log::{info, warn};
use std::process::ExitCode;
use wkswitch::cli;
use wkswitch::config::Config;
use wkswitch::i3::wm::I3Wm;
use wkswitch::logging;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let request = match cli::parse_args(&args) {
        Ok(r) => r,
        Err(e) => {
            println!("{}", e);
            return ExitCode::from(e.exit_status());
        }
    };

    let config_path = Config::default_path();
    let (config, config_err) = match Config::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let level = config.level_filter().unwrap_or(log::LevelFilter::Debug);
    let _guard = match logging::init(&config.log_file, level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            // Without a log there is nowhere to report switch failures, but
            // the switch itself can still go ahead.
            eprintln!("wkswitch: {}", e);
            None
        }
    };

    match config_err {
        None => info!("loaded config from {}", config_path.display()),
        Some(e) if e.is_missing() => info!("no config file ({}), using defaults", e),
        Some(e) => warn!("ignoring config: {}; using defaults", e),
    }

    ExitCode::from(cli::switch_and_report(&request, config.settle_delay(), || {
        let wm = I3Wm::new()?;
        info!("using IPC socket {}", wm.socket_path().display());
        Ok::<_, wkswitch::i3::wm::I3WmError>(wm)
    }))
}
