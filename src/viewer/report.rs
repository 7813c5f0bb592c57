use std::collections::HashSet;

use chrono::NaiveDate;

use crate::log::event::{EventKind, EventRecord, TAB_LABEL_SEPARATOR};

use super::aggregate::{aggregate_day, events_for_day, seconds_to_next, TimeBuckets};

/// How many entries each ranked panel shows.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub label: String,
    pub seconds: i64,
    /// Bar width relative to the top entry, floored to a whole percent.
    pub bar_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    pub time_of_day: String,
    pub kind: EventKind,
    pub detail: String,
    /// `None` for the day's last event, whose end is unknown.
    pub seconds_to_next: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub active_seconds: i64,
    pub event_count: usize,
    pub unique_apps: usize,
    pub unique_tabs: usize,
    pub unique_sites: usize,
}

/// Presentation-ready view of one day, assembled from the full event list.
#[derive(Debug, Clone)]
pub struct DayReport {
    pub day: NaiveDate,
    /// Days with data, newest first, for the date selector.
    pub days: Vec<NaiveDate>,
    pub summary: DaySummary,
    pub top_apps: Vec<RankedEntry>,
    pub top_tabs: Vec<RankedEntry>,
    pub top_sites: Vec<RankedEntry>,
    pub timeline: Vec<TimelineRow>,
}

pub fn build_report(events: &[EventRecord], day: NaiveDate, days: Vec<NaiveDate>) -> DayReport {
    let day_events = events_for_day(events, day);
    let agg = aggregate_day(&day_events);

    let top_apps = top_n(&agg.app_time, TOP_N);
    let mut top_tabs = top_n(&agg.tab_time, TOP_N);
    // Tabs rank on the full "title | url" label but display just the title.
    for entry in &mut top_tabs {
        entry.label = tab_title(&entry.label).to_string();
    }
    let top_sites = top_n(&agg.site_time, TOP_N);

    let timeline = day_events
        .iter()
        .enumerate()
        .map(|(i, event)| TimelineRow {
            time_of_day: event.timestamp.format("%H:%M:%S").to_string(),
            kind: event.kind,
            detail: event.detail.clone(),
            seconds_to_next: seconds_to_next(&day_events, i),
        })
        .collect();

    let unique_apps = day_events
        .iter()
        .filter(|e| e.kind == EventKind::App)
        .map(|e| e.detail.as_str())
        .collect::<HashSet<_>>()
        .len();

    DayReport {
        day,
        days,
        summary: DaySummary {
            active_seconds: agg.active_seconds,
            event_count: day_events.len(),
            unique_apps,
            unique_tabs: agg.tab_time.len(),
            unique_sites: agg.site_time.len(),
        },
        top_apps,
        top_tabs,
        top_sites,
        timeline,
    }
}

/// Title half of a `"title | url"` tab label.
pub fn tab_title(label: &str) -> &str {
    label
        .split_once(TAB_LABEL_SEPARATOR)
        .map_or(label, |(title, _)| title)
}

fn top_n(times: &TimeBuckets, n: usize) -> Vec<RankedEntry> {
    let mut entries = times.entries().to_vec();
    // sort_by is stable, so equal totals keep their first-encountered order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);

    let max = entries.first().map_or(0, |e| e.1);
    entries
        .into_iter()
        .map(|(label, seconds)| RankedEntry {
            bar_percent: if max > 0 { seconds * 100 / max } else { 0 },
            label,
            seconds,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::log::event::{EventKind, EventRecord};
    use crate::viewer::aggregate::TimeBuckets;

    use super::{build_report, tab_title, top_n};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 7, 4).unwrap()
    }

    fn event(time: &str, kind: EventKind, detail: &str) -> EventRecord {
        let timestamp =
            NaiveDateTime::parse_from_str(&format!("2018-07-04 {time}"), "%Y-%m-%d %H:%M:%S")
                .unwrap();
        EventRecord::new(timestamp, kind, detail)
    }

    fn buckets(entries: &[(&str, i64)]) -> TimeBuckets {
        let mut buckets = TimeBuckets::default();
        for (label, seconds) in entries {
            buckets.add(label, *seconds);
        }
        buckets
    }

    #[test]
    fn test_top_n_orders_by_seconds_descending() {
        let ranked = top_n(&buckets(&[("a", 10), ("b", 30), ("c", 20)]), 10);
        let labels: Vec<_> = ranked.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_top_n_ties_keep_encounter_order() {
        let ranked = top_n(&buckets(&[("first", 10), ("second", 10), ("big", 20)]), 10);
        let labels: Vec<_> = ranked.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["big", "first", "second"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let ranked = top_n(&buckets(&[("a", 1), ("b", 2), ("c", 3)]), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].label, "c");
    }

    #[test]
    fn test_bar_percent_is_floored_against_top_entry() {
        let ranked = top_n(&buckets(&[("top", 30), ("half", 15), ("third", 10)]), 10);
        assert_eq!(ranked[0].bar_percent, 100);
        assert_eq!(ranked[1].bar_percent, 50);
        assert_eq!(ranked[2].bar_percent, 33);
    }

    #[test]
    fn test_bar_percent_zero_when_top_is_zero() {
        let ranked = top_n(&buckets(&[("a", 0)]), 10);
        assert_eq!(ranked[0].bar_percent, 0);
    }

    #[test]
    fn test_tab_title_drops_url_suffix() {
        assert_eq!(tab_title("Docs | https://docs.example.com/"), "Docs");
        assert_eq!(tab_title("No url here"), "No url here");
    }

    #[test]
    fn test_report_for_empty_log() {
        let report = build_report(&[], day(), vec![]);
        assert_eq!(report.summary.active_seconds, 0);
        assert_eq!(report.summary.event_count, 0);
        assert_eq!(report.summary.unique_apps, 0);
        assert!(report.top_apps.is_empty());
        assert!(report.timeline.is_empty());
    }

    #[test]
    fn test_report_timeline_and_summary() {
        let events = vec![
            event("09:00:00", EventKind::Start, "Monitoring"),
            event("09:00:05", EventKind::App, "Google Chrome"),
            event("09:00:10", EventKind::Tab, "Docs | https://docs.example.com/"),
            event("09:01:10", EventKind::App, "Terminal"),
        ];
        let report = build_report(&events, day(), vec![day()]);

        assert_eq!(report.summary.event_count, 4);
        assert_eq!(report.summary.unique_apps, 2);
        assert_eq!(report.summary.unique_tabs, 1);
        assert_eq!(report.summary.unique_sites, 1);
        // 5s + 60s gaps; the open interval after Terminal is excluded.
        assert_eq!(report.summary.active_seconds, 70);

        // Tab labels in the panel drop the url half.
        assert_eq!(report.top_tabs[0].label, "Docs");
        assert_eq!(report.top_tabs[0].seconds, 60);

        assert_eq!(report.timeline.len(), 4);
        assert_eq!(report.timeline[0].time_of_day, "09:00:00");
        assert_eq!(report.timeline[0].seconds_to_next, Some(5));
        assert_eq!(report.timeline[3].seconds_to_next, None);
    }

    #[test]
    fn test_report_only_counts_selected_day() {
        let mut events = vec![event("09:00:00", EventKind::App, "X")];
        events.push(EventRecord::new(
            events[0].timestamp + chrono::Duration::days(1),
            EventKind::App,
            "Y",
        ));
        let report = build_report(&events, day(), vec![day()]);
        assert_eq!(report.summary.event_count, 1);
        assert_eq!(report.timeline.len(), 1);
    }
}
