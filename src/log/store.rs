use std::{future::Future, io::ErrorKind, path::PathBuf};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use super::event::EventRecord;

/// Field names of the header line written when the log file is created.
pub const LOG_HEADER: &str = "timestamp,kind,detail\n";

/// Interface for abstracting the event log. The log is append-only; records
/// already written are never rewritten.
pub trait EventLog {
    /// Appends a single record. The record must be fully on disk when this
    /// returns.
    fn append(&mut self, record: &EventRecord) -> impl Future<Output = Result<()>>;

    /// Reads every record in append order. A missing file reads as zero
    /// records.
    fn read_all(&self) -> impl Future<Output = Result<Vec<EventRecord>>> + Send;
}

/// The main realization of [EventLog]: one CSV file on disk.
pub struct CsvEventLog {
    path: PathBuf,
}

impl CsvEventLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn encode(record: &EventRecord) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.serialize(record)?;
        Ok(writer.into_inner()?)
    }

    /// Unparseable lines are skipped with a warning. Might happen after a
    /// shutdown cut a write short, and one bad line must not take the whole
    /// report down.
    fn parse(&self, bytes: &[u8]) -> Vec<EventRecord> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);
        let mut events = Vec::new();
        for row in reader.deserialize::<EventRecord>() {
            match row {
                Ok(v) => events.push(v),
                Err(e) => {
                    warn!("During parsing of {:?} found illegal record: {e}", self.path)
                }
            }
        }
        events
    }

    async fn read_raw(&self) -> std::io::Result<Vec<u8>> {
        debug!("Reading event log {:?}", self.path);
        let mut file = File::open(&self.path).await?;
        file.lock_shared()?;
        let mut bytes = Vec::new();
        let result = file.read_to_end(&mut bytes).await;
        file.unlock_async().await?;
        result?;
        Ok(bytes)
    }

    async fn append_with_file(file: &mut File, record: &EventRecord) -> Result<()> {
        let mut buffer = Vec::new();
        if file.metadata().await?.len() == 0 {
            buffer.extend_from_slice(LOG_HEADER.as_bytes());
        }
        buffer.extend_from_slice(&Self::encode(record)?);

        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

impl EventLog for CsvEventLog {
    async fn append(&mut self, record: &EventRecord) -> Result<()> {
        let mut file = File::options()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for the file
        file.lock_exclusive()?;
        let result = Self::append_with_file(&mut file, record).await;
        file.unlock_async().await?;
        result
    }

    async fn read_all(&self) -> Result<Vec<EventRecord>> {
        match self.read_raw().await {
            Ok(bytes) => Ok(self.parse(&bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use tempfile::tempdir;

    use crate::log::{
        event::{EventKind, EventRecord},
        store::{CsvEventLog, EventLog, LOG_HEADER},
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn test_records() -> Vec<EventRecord> {
        vec![
            EventRecord::new(TEST_START_DATE, EventKind::Start, "Monitoring"),
            EventRecord::new(
                TEST_START_DATE + chrono::Duration::seconds(5),
                EventKind::App,
                "Terminal",
            ),
            EventRecord::new(
                TEST_START_DATE + chrono::Duration::seconds(10),
                EventKind::Tab,
                "Hello, world | https://example.com/",
            ),
        ]
    }

    #[tokio::test]
    async fn test_append_writes_header_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("activity_log.csv");
        let mut log = CsvEventLog::new(path.clone());

        for record in test_records() {
            log.append(&record).await?;
        }

        let contents = std::fs::read_to_string(&path)?;
        assert!(contents.starts_with(LOG_HEADER));
        assert_eq!(contents.matches("timestamp").count(), 1);
        assert_eq!(contents.lines().count(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_read_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let mut log = CsvEventLog::new(dir.path().join("activity_log.csv"));

        let records = test_records();
        for record in &records {
            log.append(record).await?;
        }

        // The comma in the tab title must survive the roundtrip.
        assert_eq!(log.read_all().await?, records);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() -> Result<()> {
        let dir = tempdir()?;
        let log = CsvEventLog::new(dir.path().join("does_not_exist.csv"));
        assert_eq!(log.read_all().await?, vec![]);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("activity_log.csv");
        std::fs::write(
            &path,
            "timestamp,kind,detail\n\
             2018-07-04 00:00:00,APP,Terminal\n\
             not a timestamp,APP,Safari\n\
             2018-07-04 00:00:10,BOGUS,Safari\n\
             2018-07-04 00:00:20,APP,Safari\n",
        )?;

        let events = CsvEventLog::new(path).read_all().await?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].detail, "Terminal");
        assert_eq!(events[1].detail, "Safari");
        Ok(())
    }
}
