use scraper::{ElementRef, Html, Selector};

use crate::{
    entry::{discount_percent, Detail, Entry},
    Error, Result,
};

const PRODUCT_SELECTOR: &str = ".product-item";
const LINK_SELECTOR: &str = ".product-item-link";
const PHOTO_SELECTOR: &str = ".product-image-photo";
const NEXT_PAGE_SELECTOR: &str = ".next";

const ATTRIBUTE_SELECTOR: &str = ".product-attribute";
const ATTRIBUTE_LABEL_SELECTOR: &str = ".product-attribute-label";
const ATTRIBUTE_VALUE_SELECTOR: &str = ".product-attribute-val";
const PRICE_BOX_SELECTOR: &str = ".eshop-price-box";

const RELEASE_LABEL: &str = "발매";
const KOREAN_MARKER: &str = "한국어";
const PLAYERS_PREFIX: &str = "✕ ";
const SALE_PERIOD_DECORATIONS: [&str; 2] = ["(세일 기간: ", ")"];

/// The minimum number of tokens the card text splits into:
/// release, badge, (title...), label, discount price, label, price.
const MIN_CARD_TOKENS: usize = 6;

/// Product cards of one listing page.
#[derive(Debug, Default)]
pub struct ListingPage {
    pub entries: Vec<Entry>,
    /// The page shows a "next" pagination control.
    pub has_next: bool,
}

/// Parses every product card on a listing page.
/// `start_index` is the number of entries collected before this page.
pub fn parse_listing_page(html: &str, start_index: usize) -> Result<ListingPage> {
    let doc = Html::parse_document(html);

    let product_selector = create_selector(PRODUCT_SELECTOR)?;
    let link_selector = create_selector(LINK_SELECTOR)?;
    let photo_selector = create_selector(PHOTO_SELECTOR)?;
    let next_selector = create_selector(NEXT_PAGE_SELECTOR)?;

    let mut entries = Vec::new();
    for (i, card) in doc.select(&product_selector).enumerate() {
        let detail_url = card
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        let image = card
            .select(&photo_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or_default();

        entries.push(parse_listing_entry(
            &element_text(&card),
            detail_url,
            image,
            start_index + i,
        )?);
    }

    Ok(ListingPage {
        entries,
        has_next: doc.select(&next_selector).next().is_some(),
    })
}

/// Builds an `Entry` out of a product card's rendered text.
///
/// The card reads like `발매2024.01.25 NEW Some Game Title 할인가 ₩9,800 정가 ₩49,000`:
/// the first token is the release date, the title runs from the third token up to
/// the four trailing price tokens, of which the 2nd is the discounted price and the 4th the full one.
/// Any change to the card layout breaks this.
pub fn parse_listing_entry(
    text: &str,
    detail_url: &str,
    image: &str,
    index: usize,
) -> Result<Entry> {
    let tokens: Vec<&str> = text.split(' ').collect();
    let len = tokens.len();
    if len < MIN_CARD_TOKENS {
        return Err(Error::ListingLayout(text.to_string()));
    }

    let price = parse_currency(tokens[len - 1])?;
    let discount_price = parse_currency(tokens[len - 3])?;

    Ok(Entry {
        index,
        title: tokens[2..len - 4].join(" ").trim().to_string(),
        image: image.to_string(),
        price,
        discount_price,
        discount_percent: discount_percent(price, discount_price),
        result_price: discount_price,
        released: tokens[0].replace(RELEASE_LABEL, ""),
        detail_url: detail_url.to_string(),
        ..Default::default()
    })
}

/// Keeps only the digits. Nothing left means 0.
pub fn parse_currency(text: &str) -> Result<u32> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse()
        .map_err(|_| Error::Currency(text.to_string()))
}

/// The attributes we read off a detail page.
#[derive(Debug, Clone, Copy)]
enum DetailField {
    Description,
    Genre,
    Released,
    Players,
    Languages,
}

impl DetailField {
    /// Substrings of the attribute label that identify the field, most specific first.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Description => &["설명", "소개"],
            Self::Genre => &["장르"],
            Self::Released => &["발매일", "출시일", "발매", "출시"],
            Self::Players => &["인원", "플레이"],
            Self::Languages => &["언어"],
        }
    }

    /// Labels that contain a keyword but name something else, like the publisher `발매사`.
    fn rejects(self, label: &str) -> bool {
        matches!(self, Self::Released) && label.ends_with('사')
    }

    /// Position among the attribute values on pages without labels.
    fn position(self) -> usize {
        match self {
            Self::Description => 0,
            Self::Genre => 3,
            Self::Released => 4,
            Self::Players => 6,
            Self::Languages => 7,
        }
    }
}

/// Reads description, genre, release date, player count, language support
/// and sale period off a product detail page.
///
/// Attributes are looked up by their label. Pages without labels fall back
/// to fixed positions. Either way a missing attribute stays `None`.
pub fn parse_detail_page(html: &str) -> Result<Detail> {
    let doc = Html::parse_document(html);

    let attribute_selector = create_selector(ATTRIBUTE_SELECTOR)?;
    let label_selector = create_selector(ATTRIBUTE_LABEL_SELECTOR)?;
    let value_selector = create_selector(ATTRIBUTE_VALUE_SELECTOR)?;
    let price_box_selector = create_selector(PRICE_BOX_SELECTOR)?;

    let labeled: Vec<(String, String)> = doc
        .select(&attribute_selector)
        .filter_map(|attr| {
            let label = attr.select(&label_selector).next()?;
            let value = attr.select(&value_selector).next()?;
            Some((element_text(&label), element_text(&value)))
        })
        .collect();
    let values: Vec<String> = doc
        .select(&value_selector)
        .map(|val| element_text(&val))
        .collect();

    let lookup = |field: DetailField| -> Option<String> {
        if labeled.is_empty() {
            return values.get(field.position()).cloned();
        }
        field.keywords().iter().find_map(|kw| {
            labeled
                .iter()
                .find(|(label, _)| label.contains(kw) && !field.rejects(label))
                .map(|(_, value)| value.clone())
        })
    };

    let sale_period = doc.select(&price_box_selector).next().map(|price_box| {
        SALE_PERIOD_DECORATIONS
            .iter()
            .fold(element_text(&price_box), |text, deco| text.replace(deco, ""))
            .trim()
            .to_string()
    });

    Ok(Detail {
        description: lookup(DetailField::Description),
        genre: lookup(DetailField::Genre),
        released: lookup(DetailField::Released),
        players: lookup(DetailField::Players).map(|p| p.replace(PLAYERS_PREFIX, "")),
        supports_korean: lookup(DetailField::Languages).map(|l| l.contains(KOREAN_MARKER)),
        sale_period,
    })
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// Text of the element with whitespace collapsed, the way a browser renders it.
fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
