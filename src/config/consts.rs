// src/config/consts.rs

// Net config
pub const URL_TEMPLATE: &str = "https://spotifycharts.com/regional/{region}/daily/{date}";
pub const USER_AGENT: &str = concat!("chart_scrape/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 15;

// Regions + default window
pub const SOURCE_REGION: &str = "us";
pub const TARGET_REGION: &str = "gb";
pub const START_DATE: &str = "2018-01-01";
pub const END_DATE: &str = "2018-05-31";

// Page shape
pub const CHART_TABLE_MARKER: &str = "chart-table";
pub const ARTIST_PREFIX: &str = "by ";

// Local cache
pub const STORE_DIR: &str = ".store";
pub const STORE_SEP: u8 = b',';
pub const LOG_FILE: &str = "debug.log";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";

// Analysis
pub const HOLDOUT_FRACTION: f64 = 0.2;
pub const SEED: u64 = 42;
pub const TOP_ARTISTS: usize = 10;

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
