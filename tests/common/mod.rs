//! Common test utilities: page fixtures and a config pointing at a mock server

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use ufind_planner::config::Config;
use ufind_planner::models::Lecture;

/// Reference instant used by pipeline tests
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 10)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

pub fn at(day: u32, month: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn lecture(name: &str, start: NaiveDateTime, source: &str, location: &str) -> Lecture {
    Lecture::new(name, start, source, location)
}

/// Config whose site lives under `/de/` of `server_uri`
pub fn config_for(server_uri: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = format!("{server_uri}/de/");
    config.site.catalog_url = format!("{server_uri}/de/vvz.html");
    config.fetch.timeout_secs = 5;
    config
}

/// Catalog page listing `(label, href)` entries
pub fn catalog_page(entries: &[(&str, &str)]) -> String {
    let links: String = entries
        .iter()
        .map(|(label, href)| format!(r#"<li><a class="link" href="{href}">{label}</a></li>"#))
        .collect();
    format!("<html><body><ul>{links}</ul></body></html>")
}

/// Course page linking the given lecture references
pub fn course_page(references: &[&str]) -> String {
    let links: String = references
        .iter()
        .map(|href| format!(r#"<div class="lv"><a class="what" href="{href}">Lecture</a></div>"#))
        .collect();
    format!("<html><body>{links}</body></html>")
}

/// Lecture page with `(date, time, room)` occurrence blocks
pub fn lecture_page(name: &str, occurrences: &[(&str, &str, &str)]) -> String {
    let blocks: String = occurrences
        .iter()
        .map(|(date, time, room)| {
            format!(
                r#"<div class="event line future">
                     <span class="date">{date}</span>
                     <span class="time">{time}</span>
                     <span class="room">{room}</span>
                   </div>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
             <div class="usse-id-courselong"><span class="what">{name}</span></div>
             {blocks}
           </body></html>"#
    )
}
