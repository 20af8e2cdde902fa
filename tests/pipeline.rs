use std::collections::HashMap;

use async_trait::async_trait;
use eshop_sale::{
    enrich::NoDelay,
    process::crawl,
    report::{render_row, report_path, write_report, REPORT_CLOSING},
    request::PageSource,
    Config, Error, Result,
};

const BASE: &str = "http://eshop.test/all-product";

/// Serves canned pages, 404 for everything else.
#[derive(Default)]
struct FakeStore {
    pages: HashMap<String, String>,
}

impl FakeStore {
    fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

#[async_trait]
impl PageSource for FakeStore {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.pages.get(url).cloned().ok_or_else(|| Error::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn config() -> Config {
    Config {
        base_url: BASE.to_string(),
        ..Config::default()
    }
}

fn card(slug: &str, title: &str, sale: &str, price: &str) -> String {
    format!(
        r#"<li class="product-item">
  <img class="product-image-photo" src="https://img.test/{slug}.jpg">
  <span>발매2021.05.20</span> <span>SALE</span>
  <a class="product-item-link" href="http://eshop.test/{slug}">{title}</a>
  <span>할인가</span> <span>{sale}</span> <span>정가</span> <span>{price}</span>
</li>"#
    )
}

fn listing(cards: &[String], has_next: bool) -> String {
    let next = if has_next {
        r#"<a class="action next" href="?p=next">다음</a>"#
    } else {
        ""
    };
    format!(
        "<html><body><ol>{}</ol><div class=\"pages\">{next}</div></body></html>",
        cards.concat()
    )
}

fn detail(korean: bool) -> String {
    let languages = if korean { "한국어, 영어" } else { "영어, 일본어" };
    format!(
        r#"<div class="product-attribute"><span class="product-attribute-label">장르</span>
<span class="product-attribute-val">액션</span></div>
<div class="product-attribute"><span class="product-attribute-label">플레이 인원수</span>
<span class="product-attribute-val">✕ 1</span></div>
<div class="product-attribute"><span class="product-attribute-label">지원 언어</span>
<span class="product-attribute-val">{languages}</span></div>
<div class="eshop-price-box">(세일 기간: 2024.05.01 ~ 2024.05.14)</div>"#
    )
}

#[tokio::test]
async fn duplicate_titles_across_pages_are_dropped() {
    let cfg = config();
    let store = FakeStore::default()
        .page(
            cfg.listing_url(1),
            listing(&[card("hades", "Hades", "₩7,000", "₩28,000")], true),
        )
        .page(
            cfg.listing_url(2),
            listing(
                &[
                    card("hades-2", "Hades", "₩1,000", "₩28,000"),
                    card("celeste", "Celeste", "₩5,500", "₩22,000"),
                ],
                false,
            ),
        )
        .page("http://eshop.test/hades", detail(true))
        .page("http://eshop.test/celeste", detail(true));

    let entries = crawl(&store, &NoDelay, &cfg).await.unwrap();
    let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Hades", "Celeste"]);
    assert_eq!(entries[0].discount_price, 7_000);
    assert_eq!(entries[0].detail_url, "http://eshop.test/hades");
    assert_eq!(entries[1].index, 2);
}

#[tokio::test]
async fn stops_on_page_without_new_games() {
    let cfg = config();
    let store = FakeStore::default()
        .page(
            cfg.listing_url(1),
            listing(&[card("hades", "Hades", "₩7,000", "₩28,000")], true),
        )
        .page(
            cfg.listing_url(2),
            listing(&[card("hades", "Hades", "₩7,000", "₩28,000")], true),
        )
        .page("http://eshop.test/hades", detail(true));

    // Page 3 would 404 and fail the crawl.
    let entries = crawl(&store, &NoDelay, &cfg).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn missing_listing_page_is_fatal() {
    let cfg = config();
    let res = crawl(&FakeStore::default(), &NoDelay, &cfg).await;
    assert!(matches!(res, Err(Error::HttpStatus { status: 404, .. })));
}

#[tokio::test]
async fn broken_detail_page_keeps_the_game() {
    let cfg = config();
    let store = FakeStore::default().page(
        cfg.listing_url(1),
        listing(&[card("zelda", "Zelda", "₩10,000", "₩64,800")], false),
    );

    let entries = crawl(&store, &NoDelay, &cfg).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Zelda");
    assert_eq!(entries[0].released, "2021.05.20");
    assert_eq!(entries[0].genre, None);
    assert!(!entries[0].supports_korean);
}

#[tokio::test]
async fn end_to_end_report_has_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        output_dir: dir.path().join("html"),
        ..config()
    };
    let store = FakeStore::default()
        .page(
            cfg.listing_url(1),
            listing(
                &[
                    card("celeste", "Celeste", "₩2,200", "₩22,000"),
                    card("hades", "Hades", "₩14,000", "₩28,000"),
                    card("tunic", "Tunic", "₩3,000", "₩30,000"),
                ],
                true,
            ),
        )
        .page(cfg.listing_url(2), listing(&[], false))
        .page("http://eshop.test/celeste", detail(true))
        .page("http://eshop.test/hades", detail(true))
        .page("http://eshop.test/tunic", detail(false));

    let entries = crawl(&store, &NoDelay, &cfg).await.unwrap();
    assert_eq!(entries.len(), 3);

    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
    let path = report_path(&cfg.output_dir, date);
    let rows = write_report(entries, &path, cfg.min_discount_percent)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let html = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.ends_with(REPORT_CLOSING));
    // Header row plus one game.
    assert_eq!(html.matches("<tr>").count(), 2);
    assert!(html.contains("Celeste"));
    assert!(html.contains("2024.05.01 ~ 2024.05.14"));
    assert!(!html.contains("Hades"));
    assert!(!html.contains("Tunic"));

    // A second run the same day starts the file over.
    write_report(Vec::new(), &path, cfg.min_discount_percent)
        .await
        .unwrap();
    let html = tokio::fs::read_to_string(&path).await.unwrap();
    assert_eq!(html.matches("<tr>").count(), 1);
}

#[tokio::test]
async fn card_without_link_or_thumbnail_is_kept() {
    let cfg = config();
    let bare = r#"<li class="product-item">
  <span>발매2023.10.20</span> <span>SALE</span>
  <span>Super Mario Bros. Wonder</span>
  <span>할인가</span> <span>₩6,480</span> <span>정가</span> <span>₩64,800</span>
</li>"#
        .to_string();
    let store = FakeStore::default().page(cfg.listing_url(1), listing(&[bare], false));

    let entries = crawl(&store, &NoDelay, &cfg).await.unwrap();
    assert_eq!(entries.len(), 1);
    let mario = &entries[0];
    assert_eq!(mario.title, "Super Mario Bros. Wonder");
    assert_eq!(mario.discount_percent, 90);
    assert!(mario.detail_url.is_empty());
    assert!(mario.image.is_empty());
    assert_eq!(mario.genre, None);

    let row = render_row(mario);
    assert!(!row.contains("<img"));
    assert!(row.contains("Super Mario Bros. Wonder"));
}

#[tokio::test]
async fn broken_card_on_a_later_page_aborts_the_crawl() {
    let cfg = config();
    let broken = r#"<li class="product-item"><span>발매2023.10.20</span> <span>₩6,480</span></li>"#.to_string();
    let store = FakeStore::default()
        .page(
            cfg.listing_url(1),
            listing(&[card("hades", "Hades", "₩7,000", "₩28,000")], true),
        )
        .page(cfg.listing_url(2), listing(&[broken], false))
        .page("http://eshop.test/hades", detail(true));

    let res = crawl(&store, &NoDelay, &cfg).await;
    assert!(matches!(res, Err(Error::ListingLayout(_))));
}
