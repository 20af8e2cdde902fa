use std::{ops::RangeInclusive, time::Duration};

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;

use crate::{
    entry::{Detail, Entry},
    error_time,
    parse::parse_detail_page,
    request::PageSource,
    Error, Result,
};

/// Pause taken before every detail page request, to go easy on the store.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn wait(&self);
}

/// Sleeps a uniformly random number of whole seconds from `secs`.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    secs: RangeInclusive<u64>,
}

impl RandomDelay {
    pub fn new(secs: RangeInclusive<u64>) -> Self {
        Self { secs }
    }

    fn pick(&self) -> Duration {
        if self.secs.is_empty() {
            return Duration::ZERO;
        }
        Duration::from_secs(rand::rng().random_range(self.secs.clone()))
    }
}

#[async_trait]
impl Throttle for RandomDelay {
    async fn wait(&self) {
        let delay = self.pick();
        sleep(delay).await;
    }
}

/// Doesn't wait at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Throttle for NoDelay {
    async fn wait(&self) {}
}

/// Fills `entry` in from its detail page.
///
/// Failing here never fails the run: the error is logged with the title and
/// the entry keeps whatever the listing gave it.
pub async fn enrich_entry<S, T>(entry: &mut Entry, source: &S, throttle: &T)
where
    S: PageSource + ?Sized,
    T: Throttle + ?Sized,
{
    throttle.wait().await;

    match fetch_detail(entry, source).await {
        Ok(detail) => entry.apply_detail(detail),
        Err(e) => error_time!("Couldn't parse the detail page of {}: {}", entry.title, e),
    }
}

async fn fetch_detail<S>(entry: &Entry, source: &S) -> Result<Detail>
where
    S: PageSource + ?Sized,
{
    if entry.detail_url.is_empty() {
        return Err(Error::MissingDetailUrl(entry.title.clone()));
    }
    let html = source.fetch(&entry.detail_url).await?;
    parse_detail_page(&html)
}
