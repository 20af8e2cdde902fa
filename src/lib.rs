//! NINTENDO KOREA ESHOP SALE SCRAPER
//! Crawls the on-sale listing, enriches every game from its detail page
//! and writes the Korean-supported, heavily discounted ones into a dated HTML table.

mod config;
pub mod dedup;
pub mod enrich;
pub mod entry;
mod error;
mod macros;
pub mod parse;
pub mod process;
pub mod report;
pub mod request;

pub use config::Config;
pub use error::{Error, Result};

const BASE_URL: &str = "https://store.nintendo.co.kr/all-product";
/// The store serves a different page to clients without a browser User-Agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const PRODUCTS_PER_PAGE: usize = 12;
/// Games below this discount don't make it into the report.
const MIN_DISCOUNT_PERCENT: i32 = 70;
/// Bounds (inclusive, in seconds) of the random pause before every detail page request.
const DELAY_SECS_MIN: u64 = 1;
const DELAY_SECS_MAX: u64 = 10;
/// Relative to the working directory.
const OUTPUT_DIR: &str = "src/html";
const REPORT_FILE_PREFIX: &str = "kor_";
