// src/core/net.rs

// Blocking HTTP GET for one (region, day) chart page.

use std::time::Duration;

use chrono::NaiveDate;

use crate::config::consts::USER_AGENT;
use crate::config::options::ScrapeOptions;
use crate::data::{DATE_FMT, Region};
use crate::error::{ChartError, Result};

/// Anything that can hand back the markup for one region's chart on one day.
/// The ingester shares a single source across its worker threads.
pub trait PageSource: Sync {
    fn fetch(&self, region: &Region, day: NaiveDate) -> Result<String>;
}

/// Fill `{region}` and `{date}` in the URL template.
pub fn build_url(template: &str, region: &Region, day: NaiveDate) -> String {
    template
        .replace("{region}", region.as_str())
        .replace("{date}", &day.format(DATE_FMT).to_string())
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    template: String,
}

impl HttpFetcher {
    pub fn new(opts: &ScrapeOptions) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()?;
        Ok(Self { client, template: opts.url_template.clone() })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, region: &Region, day: NaiveDate) -> Result<String> {
        let url = build_url(&self.template, region, day);
        let fail = |reason: String| ChartError::Fetch { region: region.clone(), day, reason };

        let resp = self.client.get(&url).send().map_err(|e| fail(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP {status} for {url}")));
        }
        resp.text().map_err(|e| fail(e.to_string()))
    }
}
