use chrono::Local;
use eshop_sale::{error_time, info_time, process::process_site};

#[tokio::main]
async fn main() {
    let start_time = Local::now();
    if let Err(e) = process_site().await {
        error_time!("Scraping failed: {}", e);
    }
    info_time!(start_time, "Full program time:");
}
