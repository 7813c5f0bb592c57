//! Renders a [DayReport] as a self-contained HTML document. No templating
//! engine, just string assembly; the page carries its own styles.

use crate::log::event::{EventKind, TAB_LABEL_SEPARATOR};
use crate::utils::time::format_seconds;

use super::report::{DayReport, RankedEntry, TimelineRow};

const STYLE: &str = r#"
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
         background: #1a1a2e; color: #e0e0e0; min-height: 100vh; }
  header { background: #16213e; padding: 1rem 2rem; border-bottom: 1px solid #0f3460;
           display: flex; align-items: center; gap: 1.5rem; }
  header h1 { font-size: 1.25rem; font-weight: 600; color: #a8dadc; }
  .date-form { display: flex; align-items: center; gap: .5rem; }
  select { background: #0f3460; color: #e0e0e0; border: 1px solid #4f86c6;
           border-radius: 6px; padding: .4rem .75rem; font-size: .9rem; cursor: pointer; }
  button { background: #4f86c6; color: #fff; border: none; border-radius: 6px;
           padding: .4rem .9rem; font-size: .9rem; cursor: pointer; }
  main { padding: 1.5rem 2rem; max-width: 1400px; margin: 0 auto; }
  .stats { display: flex; gap: 1rem; margin-bottom: 1.5rem; flex-wrap: wrap; }
  .stat { background: #16213e; border: 1px solid #0f3460; border-radius: 8px;
          padding: .6rem 1.2rem; font-size: .85rem; color: #a8dadc; }
  .stat strong { font-size: 1rem; color: #fff; margin-right: .3rem; }
  .panels { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem;
            margin-bottom: 2rem; }
  @media (max-width: 900px) { .panels { grid-template-columns: 1fr; } }
  .panel { background: #16213e; border: 1px solid #0f3460; border-radius: 10px;
           padding: 1rem 1.25rem; min-width: 0; overflow: hidden; }
  .panel h2 { font-size: .9rem; font-weight: 600; color: #a8dadc; margin-bottom: .85rem; }
  .empty-panel { font-size: .85rem; color: #555; padding: .5rem 0; }
  .top-row { display: flex; align-items: center; gap: .6rem; margin-bottom: .65rem; }
  .rank { flex-shrink: 0; width: 1.2rem; text-align: right; font-size: .75rem; color: #555; }
  .top-label { flex: 1; min-width: 0; }
  .top-name { display: block; font-size: .82rem; font-weight: 500; color: #ddd;
              white-space: nowrap; overflow: hidden; text-overflow: ellipsis;
              margin-bottom: .25rem; }
  .bar-track { background: #0f3460; border-radius: 99px; height: 5px; }
  .bar-fill { height: 5px; border-radius: 99px; }
  .top-dur { flex-shrink: 0; font-size: .78rem; color: #888; white-space: nowrap; }
  .section-label { font-size: .8rem; font-weight: 600; text-transform: uppercase;
                   letter-spacing: .08em; color: #a8dadc; margin-bottom: .75rem; }
  table { width: 100%; border-collapse: collapse; background: #16213e;
          border-radius: 10px; overflow: hidden; border: 1px solid #0f3460;
          table-layout: fixed; }
  thead { background: #0f3460; }
  th { padding: .75rem 1rem; text-align: left; font-size: .8rem;
       text-transform: uppercase; letter-spacing: .05em; color: #a8dadc; }
  th:nth-child(1) { width: 6.5rem; }
  th:nth-child(2) { width: 8rem; }
  th:nth-child(4) { width: 6rem; }
  td { padding: .65rem 1rem; border-top: 1px solid #0f3460; font-size: .875rem;
       vertical-align: middle; overflow: hidden; }
  tr:hover td { background: #1e2d50; }
  .ts { color: #a8dadc; white-space: nowrap; }
  .badge { display: inline-block; padding: .2rem .6rem; border-radius: 99px;
           font-size: .75rem; font-weight: 600; color: #fff; white-space: nowrap; }
  .detail { font-weight: 500; }
  .detail-text { display: block; white-space: nowrap; overflow: hidden;
                 text-overflow: ellipsis; }
  .dur { color: #888; font-size: .8rem; white-space: nowrap; }
  .empty { padding: 2rem; text-align: center; color: #888; }
  .tab-url { color: #7bafd4; font-size: .8rem; display: block; white-space: nowrap;
             overflow: hidden; text-overflow: ellipsis; }
"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn kind_style(kind: EventKind) -> (&'static str, &'static str) {
    match kind {
        EventKind::App => ("#4f86c6", "&#128187;"),
        EventKind::Tab => ("#7b5ea7", "&#127760;"),
        EventKind::Active => ("#3aaa6e", "&#9654;"),
        EventKind::Inactive => ("#e06c75", "&#9646;&#9646;"),
        EventKind::Start => ("#888", "&#8505;"),
    }
}

fn render_panel(heading: &str, icon: &str, colour: &str, entries: &[RankedEntry]) -> String {
    if entries.is_empty() {
        return format!(
            "<div class=\"panel\"><h2>{icon} {heading}</h2>\
             <p class=\"empty-panel\">No data</p></div>"
        );
    }

    let mut rows = String::new();
    for (rank, entry) in entries.iter().enumerate() {
        let label = escape(&entry.label);
        rows += &format!(
            "<div class=\"top-row\">\
               <span class=\"rank\">{rank}</span>\
               <div class=\"top-label\">\
                 <span class=\"top-name\" title=\"{label}\">{label}</span>\
                 <div class=\"bar-track\"><div class=\"bar-fill\" \
                      style=\"width:{percent}%;background:{colour}\"></div></div>\
               </div>\
               <span class=\"top-dur\">{duration}</span>\
             </div>",
            rank = rank + 1,
            percent = entry.bar_percent,
            duration = format_seconds(entry.seconds),
        );
    }

    format!("<div class=\"panel\"><h2>{icon} {heading}</h2>{rows}</div>")
}

fn render_timeline_row(row: &TimelineRow) -> String {
    let (colour, icon) = kind_style(row.kind);

    let detail = if row.kind == EventKind::Tab {
        match row.detail.split_once(TAB_LABEL_SEPARATOR) {
            Some((title, url)) => format!(
                "<span class=\"detail-text\">{}</span>\
                 <a class=\"tab-url\" href=\"{url}\" target=\"_blank\">{url}</a>",
                escape(title),
                url = escape(url),
            ),
            None => format!("<span class=\"detail-text\">{}</span>", escape(&row.detail)),
        }
    } else {
        format!("<span class=\"detail-text\">{}</span>", escape(&row.detail))
    };

    let duration = row
        .seconds_to_next
        .map_or_else(|| "&#8230;".to_string(), format_seconds);

    format!(
        "<tr>\
           <td class=\"ts\">{time}</td>\
           <td><span class=\"badge\" style=\"background:{colour}\">{icon} {kind}</span></td>\
           <td class=\"detail\">{detail}</td>\
           <td class=\"dur\">{duration}</td>\
         </tr>",
        time = row.time_of_day,
        kind = row.kind.label(),
    )
}

pub fn render(report: &DayReport) -> String {
    let options: String = report
        .days
        .iter()
        .map(|d| {
            let selected = if *d == report.day { " selected" } else { "" };
            format!("<option value=\"{d}\"{selected}>{d}</option>")
        })
        .collect();

    let panels = render_panel("Top Apps", "&#128187;", "#4f86c6", &report.top_apps)
        + &render_panel("Top Tabs", "&#127760;", "#7b5ea7", &report.top_tabs)
        + &render_panel("Top Websites", "&#127758;", "#3aaa6e", &report.top_sites);

    let timeline = if report.timeline.is_empty() {
        "<p class=\"empty\">No events recorded for this date.</p>".to_string()
    } else {
        let rows: String = report.timeline.iter().map(render_timeline_row).collect();
        format!(
            "<table><thead><tr>\
               <th>Time</th><th>Event</th><th>Detail</th><th>Duration</th>\
             </tr></thead><tbody>{rows}</tbody></table>"
        )
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Activity Log</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <header>\n\
           <h1>&#128200; Activity Log</h1>\n\
           <form class=\"date-form\" method=\"get\">\n\
             <label for=\"date\">Date:</label>\n\
             <select id=\"date\" name=\"date\" onchange=\"this.form.submit()\">{options}</select>\n\
             <noscript><button type=\"submit\">Go</button></noscript>\n\
           </form>\n\
         </header>\n\
         <main>\n\
           <div class=\"stats\">\n\
             <div class=\"stat\"><strong>{active}</strong> tracked</div>\n\
             <div class=\"stat\"><strong>{events}</strong> events</div>\n\
             <div class=\"stat\"><strong>{apps}</strong> unique apps</div>\n\
             <div class=\"stat\"><strong>{tabs}</strong> unique tabs</div>\n\
             <div class=\"stat\"><strong>{sites}</strong> unique sites</div>\n\
           </div>\n\
           <div class=\"panels\">{panels}</div>\n\
           <p class=\"section-label\">&#128338; Timeline</p>\n\
           {timeline}\n\
         </main>\n\
         </body>\n\
         </html>",
        active = format_seconds(report.summary.active_seconds),
        events = report.summary.event_count,
        apps = report.summary.unique_apps,
        tabs = report.summary.unique_tabs,
        sites = report.summary.unique_sites,
    )
}
