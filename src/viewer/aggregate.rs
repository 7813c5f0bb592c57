use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use url::Url;

use crate::log::event::{EventKind, EventRecord, TAB_LABEL_SEPARATOR};

/// Label to accumulated seconds, preserving first-encounter order so that
/// ranking stays stable for equal totals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TimeBuckets {
    index: HashMap<String, usize>,
    entries: Vec<(String, i64)>,
}

impl TimeBuckets {
    pub fn add(&mut self, label: &str, seconds: i64) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 += seconds,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), seconds));
            }
        }
    }

    pub fn entries(&self) -> &[(String, i64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn seconds_for(&self, label: &str) -> i64 {
        self.index.get(label).map_or(0, |&i| self.entries[i].1)
    }
}

/// Time attributed over one calendar day. Derived, never persisted; must be
/// reproducible from the day's event subsequence alone.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DayAggregates {
    pub app_time: TimeBuckets,
    pub tab_time: TimeBuckets,
    pub site_time: TimeBuckets,
    pub active_seconds: i64,
}

/// Walks a day's events in log order, attributing each inter-event gap to
/// whatever app/tab/site was current during it, while the user was active.
///
/// The replay rules mirror the monitor: an `App` event sets the app and
/// clears the tab, a `Tab` event sets the tab, `Active`/`Inactive` flip the
/// flag, and the flag starts out true at day start.
pub fn aggregate_day(events: &[EventRecord]) -> DayAggregates {
    let mut agg = DayAggregates::default();

    let mut current_app: Option<&str> = None;
    let mut current_tab: Option<&str> = None;
    let mut is_active = true;

    for (i, event) in events.iter().enumerate() {
        match event.kind {
            EventKind::App => {
                current_app = Some(event.detail.as_str());
                current_tab = None;
            }
            EventKind::Tab => current_tab = Some(event.detail.as_str()),
            EventKind::Inactive => is_active = false,
            EventKind::Active => is_active = true,
            EventKind::Start => (),
        }

        // The last event has no successor; that trailing interval is of
        // unknown length and never counted.
        let Some(seconds) = seconds_to_next(events, i) else {
            break;
        };
        if seconds == 0 || !is_active {
            continue;
        }

        agg.active_seconds += seconds;
        if let Some(app) = current_app {
            agg.app_time.add(app, seconds);
        }
        if let Some(tab) = current_tab {
            agg.tab_time.add(tab, seconds);
            if let Some(site) = site_of(tab) {
                agg.site_time.add(&site, seconds);
            }
        }
    }

    agg
}

/// Seconds from event `i` to its successor, clamped at zero to defend
/// against out-of-order timestamps. `None` for the last event.
pub fn seconds_to_next(events: &[EventRecord], i: usize) -> Option<i64> {
    let next = events.get(i + 1)?;
    Some((next.timestamp - events[i].timestamp).num_seconds().max(0))
}

/// Host component of the url half of a `"title | url"` tab label.
pub fn site_of(tab_label: &str) -> Option<String> {
    let (_, url) = tab_label.split_once(TAB_LABEL_SEPARATOR)?;
    let host = Url::parse(url).ok()?.host_str()?.to_string();
    (!host.is_empty()).then_some(host)
}

pub fn events_for_day(events: &[EventRecord], day: NaiveDate) -> Vec<EventRecord> {
    events.iter().filter(|e| e.day() == day).cloned().collect()
}

/// Every day with at least one event, newest first.
pub fn available_days(events: &[EventRecord]) -> Vec<NaiveDate> {
    let days: BTreeSet<NaiveDate> = events.iter().map(|e| e.day()).collect();
    days.into_iter().rev().collect()
}
