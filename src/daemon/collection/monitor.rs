use std::time::Duration;

use ansi_term::Colour;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::{
    log::event::{EventKind, EventRecord, TIMESTAMP_FORMAT},
    probe::DesktopProbe,
    utils::clock::Clock,
};

use super::idle::IdleClassifier;

/// Everything the poll loop remembers between polls. Created at process
/// start, discarded at exit; nothing here is persisted.
#[derive(Debug, Default)]
struct SessionState {
    app: Option<String>,
    tab: Option<String>,
    /// `None` until the first poll classified the user.
    active: Option<bool>,
}

/// Polls the desktop probe on a fixed cadence and emits a record for every
/// state transition worth logging. Emitting only on change keeps the log
/// compact; the replay side reconstructs state with last-value-wins.
pub struct ActivityMonitor {
    next: mpsc::Sender<EventRecord>,
    probe: Box<dyn DesktopProbe>,
    shutdown: CancellationToken,
    idle: IdleClassifier,
    poll_interval: Duration,
    browser: String,
    time_provider: Box<dyn Clock>,
    state: SessionState,
}

impl ActivityMonitor {
    pub fn new(
        next: mpsc::Sender<EventRecord>,
        probe: Box<dyn DesktopProbe>,
        shutdown: CancellationToken,
        idle: IdleClassifier,
        poll_interval: Duration,
        browser: String,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            probe,
            shutdown,
            idle,
            poll_interval,
            browser,
            time_provider,
            state: SessionState::default(),
        }
    }

    /// Runs the transition rules against one round of probe queries. Returns
    /// at most one activity record and at most one app-or-tab record.
    fn poll(&mut self) -> Vec<EventRecord> {
        let timestamp = self.time_provider.time().naive_local();
        let mut out = Vec::new();

        let idle_seconds = match self.probe.idle_seconds() {
            Ok(v) => v,
            Err(e) => {
                warn!("Idle query failed, assuming no idle time {e:?}");
                0.0
            }
        };
        let now_active = self.idle.is_active(idle_seconds);
        if self.state.active != Some(now_active) {
            out.push(if now_active {
                EventRecord::new(timestamp, EventKind::Active, "User returned")
            } else {
                EventRecord::new(
                    timestamp,
                    EventKind::Inactive,
                    format!("Idle for {idle_seconds:.0}s"),
                )
            });
            self.state.active = Some(now_active);
        }

        // App and tab are only tracked while the user is present.
        if !now_active {
            return out;
        }

        let app = match self.probe.frontmost_app() {
            Ok(v) => v,
            Err(e) => {
                warn!("Frontmost app query failed {e:?}");
                "Unknown".to_string()
            }
        };
        if self.state.app.as_deref() != Some(app.as_str()) {
            out.push(EventRecord::new(timestamp, EventKind::App, app.clone()));
            self.state.app = Some(app);
            // A new app invalidates any remembered tab.
            self.state.tab = None;
        } else if app == self.browser {
            let tab = self.probe.active_tab().unwrap_or_else(|e| {
                warn!("Tab query failed {e:?}");
                None
            });
            if let Some(tab) = tab.filter(|t| !t.is_empty()) {
                if self.state.tab.as_deref() != Some(tab.as_str()) {
                    out.push(EventRecord::new(timestamp, EventKind::Tab, tab.clone()));
                    self.state.tab = Some(tab);
                }
            }
        }

        out
    }

    async fn emit(&mut self, record: EventRecord) -> Result<()> {
        announce(&record);
        debug!("Sending event {:?}", record);
        self.next
            .send(record)
            .await
            .inspect_err(|e| error!("Event pipeline closed {e:?}"))?;
        Ok(())
    }

    /// Executes the monitor event loop.
    pub async fn run(self) -> Result<()> {
        let shutdown = self.shutdown.clone();
        let result = self.run_inner().await;
        if result.is_err() {
            // Wake up the shutdown watcher so the daemon exits instead of
            // waiting on a signal.
            shutdown.cancel();
        }
        result
    }

    async fn run_inner(mut self) -> Result<()> {
        let start = EventRecord::new(
            self.time_provider.time().naive_local(),
            EventKind::Start,
            format!(
                "Monitoring (idle threshold: {}s, poll: {}s)",
                self.idle.threshold_seconds(),
                self.poll_interval.as_secs()
            ),
        );
        self.emit(start).await?;

        let mut collection_point = self.time_provider.instant();
        loop {
            collection_point += self.poll_interval;

            for record in self.poll() {
                self.emit(record).await?;
            }

            tokio::select! {
                // Cancelation means we stop execution of the event loop. Which
                // means we also drop the sender channel and consequently stop
                // the writer module.
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                _ = self.time_provider.sleep_until(collection_point) => ()
            }
        }
    }
}

/// One human-readable console line per emitted event.
fn announce(record: &EventRecord) {
    let colour = match record.kind {
        EventKind::Start => Colour::White,
        EventKind::Active => Colour::Green,
        EventKind::Inactive => Colour::Red,
        EventKind::App => Colour::Blue,
        EventKind::Tab => Colour::Purple,
    };
    println!(
        "[{}] {} {}",
        record.timestamp.format(TIMESTAMP_FORMAT),
        colour.paint(format!("{:<10}", record.kind.label())),
        record.detail
    );
}
