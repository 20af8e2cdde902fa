use chrono::Local;

use crate::{
    dedup::SeenTitles,
    enrich::{enrich_entry, RandomDelay, Throttle},
    entry::Entry,
    info_time,
    parse::parse_listing_page,
    report::{report_path, write_report},
    request::{HttpSource, PageSource},
    Config, Result,
};

/// Scrapes the whole sale listing and writes today's report.
pub async fn process_site() -> Result<()> {
    let start_time = Local::now();
    let config = Config::default();
    let source = HttpSource::new()?;
    let throttle = RandomDelay::new(config.delay_secs.clone());

    info_time!("Started scraping");

    let entries = crawl(&source, &throttle, &config).await?;
    info_time!(start_time, "Collected {} games.", entries.len());

    let path = report_path(&config.output_dir, Local::now().date_naive());
    let local_now = Local::now();
    let rows = write_report(entries, &path, config.min_discount_percent).await?;
    info_time!(local_now, "Wrote {} games to: {}", rows, path.display());

    Ok(())
}

/// Walks the listing pages in order, enriching every game that wasn't seen before.
///
/// Stops on the first page that brings no new games, or that has no "next" control.
/// A listing page that can't be fetched or parsed ends the whole crawl with an error.
pub async fn crawl<S, T>(source: &S, throttle: &T, config: &Config) -> Result<Vec<Entry>>
where
    S: PageSource + ?Sized,
    T: Throttle + ?Sized,
{
    let mut seen = SeenTitles::default();
    let mut entries = Vec::new();
    let mut page_num = 1;

    loop {
        let url = config.listing_url(page_num);
        info_time!("Crawling: [{}]", url);

        let html = source.fetch(&url).await?;
        let page = parse_listing_page(&html, entries.len())?;

        let mut new_entries = Vec::with_capacity(page.entries.len());
        for mut entry in page.entries {
            if !seen.insert(&entry.title) {
                continue;
            }
            enrich_entry(&mut entry, source, throttle).await;
            info_time!("Parsed: [{:?}]", entry);
            new_entries.push(entry);
        }

        if new_entries.is_empty() {
            break;
        }
        entries.extend(new_entries);

        if !page.has_next {
            break;
        }
        page_num += 1;
    }

    Ok(entries)
}
