use std::{
    env,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::Result;
use sysinfo::{get_current_pid, Signal, System};

use crate::daemon::args::CollectorArgs;

use super::daemon_path::to_daemon_path;

pub fn kill_previous_daemons(name: &Path) {
    let system = System::new_all();
    let current_id = get_current_pid().unwrap();
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
        {
            // This will forcefully terminate the process on Windows. Anything
            // better will require a lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
        }
    }
}

pub fn daemon_binary_path() -> PathBuf {
    to_daemon_path(env::current_exe().expect("Can't operate without an executable"))
}

/// Intended for shutting down a previous collector and starting a new one.
/// The daemon binary detaches itself, so spawning it directly is enough.
pub fn restart_daemon(collector: &CollectorArgs) -> Result<()> {
    let daemon = daemon_binary_path();
    kill_previous_daemons(&daemon);

    let mut command = std::process::Command::new(&daemon);
    command.args([
        "--poll-interval",
        &collector.poll_interval.to_string(),
        "--idle-threshold",
        &collector.idle_threshold.to_string(),
        "--browser",
        &collector.browser,
    ]);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
    }

    println!("Starting collector daemon");
    #[allow(clippy::zombie_processes)]
    let _ = command.spawn()?;
    println!("Success");
    Ok(())
}
