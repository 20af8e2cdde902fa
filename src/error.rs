use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Product card doesn't match the expected layout: {0:?}")]
    ListingLayout(String),
    #[error("Couldn't parse a price out of: {0:?}")]
    Currency(String),
    #[error("Entry has no detail link: {0}")]
    MissingDetailUrl(String),
}
