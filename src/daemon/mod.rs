use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use collection::{idle::IdleClassifier, monitor::ActivityMonitor};
use processing::{log_append::LogAppender, ProcessingModule};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    log::{event::EventRecord, store::CsvEventLog},
    probe::{DesktopProbe, GenericProbe},
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod collection;
pub mod processing;
pub mod shutdown;

/// Name of the event log file inside the application directory.
pub const LOG_FILE_NAME: &str = "activity_log.csv";

#[derive(Debug, Clone)]
pub struct DaemonSettings {
    pub poll_interval: Duration,
    pub idle_threshold_seconds: u32,
    pub browser: String,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            idle_threshold_seconds: 60,
            browser: "Google Chrome".to_string(),
        }
    }
}

/// Represents the starting point for the daemon
pub async fn start_daemon(dir: PathBuf, settings: DaemonSettings) -> Result<()> {
    std::env::set_current_dir("/")?;

    let (sender, receiver) = mpsc::channel::<EventRecord>(16);
    let probe = GenericProbe::new(&settings.browser)?;

    let shutdown_token = CancellationToken::new();

    let monitor = create_monitor(sender, probe, &shutdown_token, &settings, DefaultClock);

    let writer = create_writer(dir.join(LOG_FILE_NAME), receiver);

    let (_, monitor_result, writer_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        monitor.run(),
        writer.run(),
    );

    if let Err(monitor_result) = monitor_result {
        error!("Monitor module got an error {:?}", monitor_result);
    }

    // A writer error means events were about to be dropped; surface it.
    writer_result?;

    Ok(())
}

fn create_monitor(
    sender: mpsc::Sender<EventRecord>,
    probe: impl DesktopProbe + 'static,
    shutdown_token: &CancellationToken,
    settings: &DaemonSettings,
    clock: impl Clock,
) -> ActivityMonitor {
    ActivityMonitor::new(
        sender,
        Box::new(probe),
        shutdown_token.clone(),
        IdleClassifier::from_seconds(settings.idle_threshold_seconds),
        settings.poll_interval,
        settings.browser.clone(),
        Box::new(clock),
    )
}

fn create_writer(
    log_path: PathBuf,
    receiver: mpsc::Receiver<EventRecord>,
) -> ProcessingModule<LogAppender<CsvEventLog>> {
    ProcessingModule::new(receiver, LogAppender::new(CsvEventLog::new(log_path)))
}

#[cfg(test)]
mod daemon_tests {
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
    use tempfile::tempdir;
    use tokio::{sync::mpsc, time::Instant};
    use tokio_util::sync::CancellationToken;

    use crate::{
        daemon::{create_monitor, create_writer, DaemonSettings, LOG_FILE_NAME},
        log::{
            event::{EventKind, EventRecord},
            store::{CsvEventLog, EventLog},
        },
        probe::MockDesktopProbe,
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    #[derive(Clone)]
    struct TestClock {
        start_time: DateTime<Local>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Local> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    /// Very simple smoke test to check that the monitor and the writer work
    /// together end to end.
    #[tokio::test]
    async fn smoke_test_daemon() -> Result<()> {
        *TEST_LOGGING;
        let mut probe = MockDesktopProbe::new();
        probe.expect_idle_seconds().returning(|| Ok(0.0));
        let mut apps = ["Terminal", "Terminal", "Safari"].into_iter().cycle();
        probe
            .expect_frontmost_app()
            .returning(move || Ok(apps.next().unwrap().to_string()));
        probe.expect_active_tab().returning(|| Ok(None));

        let shutdown_token = CancellationToken::new();

        let (sender, receiver) = mpsc::channel::<EventRecord>(16);
        let test_clock = TestClock {
            start_time: Local.from_local_datetime(&TEST_START_DATE).unwrap(),
            reference: Instant::now(),
        };
        let settings = DaemonSettings {
            poll_interval: Duration::from_secs(1),
            ..DaemonSettings::default()
        };
        let monitor = create_monitor(sender, probe, &shutdown_token, &settings, test_clock);

        let dir = tempdir()?;
        let log_path = dir.path().join(LOG_FILE_NAME);

        let writer = create_writer(log_path.clone(), receiver);

        let (_, monitor_result, writer_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(3500)).await;
                shutdown_token.cancel()
            },
            monitor.run(),
            writer.run(),
        );

        monitor_result?;
        writer_result?;

        let events = CsvEventLog::new(log_path).read_all().await?;

        // START, the initial ACTIVE + APP, and at least one app switch.
        assert!(events.len() >= 4, "got {events:?}");
        assert_eq!(events[0].kind, EventKind::Start);
        assert_eq!(events[1].kind, EventKind::Active);
        assert_eq!(events[2].kind, EventKind::App);
        assert!(events.iter().all(|e| e.day() == TEST_START_DATE.date()));
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        Ok(())
    }
}
