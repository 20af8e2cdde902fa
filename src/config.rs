use std::{ops::RangeInclusive, path::PathBuf};

use crate::{
    BASE_URL, DELAY_SECS_MAX, DELAY_SECS_MIN, MIN_DISCOUNT_PERCENT, OUTPUT_DIR, PRODUCTS_PER_PAGE,
};

/// Everything a run needs to know. `Default` reproduces the production setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub page_size: usize,
    pub min_discount_percent: i32,
    pub delay_secs: RangeInclusive<u64>,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            page_size: PRODUCTS_PER_PAGE,
            min_discount_percent: MIN_DISCOUNT_PERCENT,
            delay_secs: DELAY_SECS_MIN..=DELAY_SECS_MAX,
            output_dir: PathBuf::from(OUTPUT_DIR),
        }
    }
}

impl Config {
    /// On-sale listing, cheapest first.
    pub fn listing_url(&self, page_num: usize) -> String {
        format!(
            "{}?am_on_sale=1&p={page_num}&product_list_dir=asc&product_list_limit={}&product_list_order=price",
            self.base_url, self.page_size
        )
    }
}
