//! Contains logic for querying desktop state from the operating system.
//! [GenericProbe] is the main artifact of this module that abstracts
//! the queries.

#[cfg(feature = "macos")]
pub mod macos;

use anyhow::Result;

/// Intended to serve as the contract every platform backend must implement.
/// All three queries are best-effort; callers substitute safe defaults on
/// failure instead of halting the poll loop.
#[cfg_attr(test, mockall::automock)]
pub trait DesktopProbe: Send {
    /// Seconds since the last keyboard or mouse input.
    fn idle_seconds(&mut self) -> Result<f64>;

    /// Display name of the currently focused application.
    fn frontmost_app(&mut self) -> Result<String>;

    /// `"title | url"` of the tracked browser's active tab. `None` when the
    /// browser has no usable window.
    fn active_tab(&mut self) -> Result<Option<String>>;
}

/// Serves as a cross-compatible [DesktopProbe] implementation.
pub struct GenericProbe {
    inner: Box<dyn DesktopProbe>,
}

impl GenericProbe {
    pub fn new(browser: &str) -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "macos")] {
                Ok(Self {
                    inner: Box::new(macos::MacosProbe::new(browser)),
                })
            }
            else {
                let _ = browser;
                // This runtime error is needed to allow the project to be compiled during testing.
                unimplemented!("No desktop probe backend was enabled")
            }
        }
    }
}

impl DesktopProbe for GenericProbe {
    fn idle_seconds(&mut self) -> Result<f64> {
        self.inner.idle_seconds()
    }

    fn frontmost_app(&mut self) -> Result<String> {
        self.inner.frontmost_app()
    }

    fn active_tab(&mut self) -> Result<Option<String>> {
        self.inner.active_tab()
    }
}
