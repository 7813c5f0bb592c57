use std::process::Command;

use anyhow::{bail, Context, Result};

use super::DesktopProbe;

const FRONTMOST_SCRIPT: &str = "tell application \"System Events\" \
     to get name of first application process whose frontmost is true";

/// Probe backed by `ioreg` and `osascript`.
pub struct MacosProbe {
    tab_script: String,
}

impl MacosProbe {
    pub fn new(browser: &str) -> Self {
        // Iterating windows in z-order and picking the first non-minimized one
        // is more reliable than "front window" when several windows are open.
        let tab_script = format!(
            "tell application \"{browser}\"\n\
             \x20 repeat with w in windows\n\
             \x20   if not minimized of w then\n\
             \x20     return (title of active tab of w) & \" | \" & (URL of active tab of w)\n\
             \x20   end if\n\
             \x20 end repeat\n\
             end tell"
        );
        Self { tab_script }
    }
}

fn osascript(script: &str) -> Result<String> {
    let output = Command::new("osascript")
        .args(["-e", script])
        .output()
        .context("Failed to run osascript")?;
    if !output.status.success() {
        bail!("osascript exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

impl DesktopProbe for MacosProbe {
    fn idle_seconds(&mut self) -> Result<f64> {
        let output = Command::new("ioreg")
            .args(["-c", "IOHIDSystem", "-d", "4"])
            .output()
            .context("Failed to run ioreg")?;
        if !output.status.success() {
            bail!("ioreg exited with {}", output.status);
        }
        let text = String::from_utf8_lossy(&output.stdout);
        for line in text.lines() {
            if line.contains("HIDIdleTime") {
                // Value is in nanoseconds
                let value = line.split('=').next_back().unwrap_or("").trim();
                let idle_ns: u64 = value.parse().context("Failed to parse HIDIdleTime")?;
                return Ok(idle_ns as f64 / 1_000_000_000.0);
            }
        }
        bail!("HIDIdleTime was not reported")
    }

    fn frontmost_app(&mut self) -> Result<String> {
        osascript(FRONTMOST_SCRIPT)
    }

    fn active_tab(&mut self) -> Result<Option<String>> {
        let tab = osascript(&self.tab_script)?;
        Ok((!tab.is_empty()).then_some(tab))
    }
}
