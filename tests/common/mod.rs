// tests/common/mod.rs
//
// In-memory page source + page builders shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chart_scrape::core::PageSource;
use chart_scrape::data::Region;
use chart_scrape::{ChartError, Result};
use chrono::NaiveDate;

pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, n).unwrap()
}

/// `(rank, track)` rows; artist is always "<track> Band".
pub fn chart_page(rows: &[(u32, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(rank, track)| {
            format!("<tr><td>{rank}</td><td><strong>{track}</strong><br>by {track} Band</td><td>{},000</td></tr>", 100 - rank)
        })
        .collect();
    format!(
        r#"<html><body><div class="chart-wrap">
             <table class="chart-table">
               <thead><tr><th></th><th>Track</th><th>Streams</th></tr></thead>
               <tbody>{body}</tbody>
             </table>
           </div></body></html>"#
    )
}

pub fn page_without_table() -> String {
    "<html><body><p>Chart data for this date has been removed.</p></body></html>".to_string()
}

#[derive(Default)]
pub struct FakePages {
    pages: HashMap<(String, NaiveDate), String>,
    fetches: AtomicUsize,
}

impl FakePages {
    pub fn with(mut self, region: &str, d: NaiveDate, html: String) -> Self {
        self.pages.insert((region.to_string(), d), html);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PageSource for FakePages {
    fn fetch(&self, region: &Region, d: NaiveDate) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(&(region.as_str().to_string(), d))
            .cloned()
            .ok_or_else(|| ChartError::Fetch {
                region: region.clone(),
                day: d,
                reason: "HTTP 404 Not Found".to_string(),
            })
    }
}
