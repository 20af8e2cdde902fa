/// One product, built from its listing card and filled in from its detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub index: usize,
    pub title: String,
    pub image: String,
    pub price: u32,
    pub discount_price: u32,
    pub discount_percent: i32,
    /// Sort key, same as `discount_price`.
    pub result_price: u32,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub released: String,
    pub players: Option<String>,
    pub supports_korean: bool,
    pub sale_period: Option<String>,
    pub detail_url: String,
}

/// Fields read off a detail page. `None` means the page didn't have it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detail {
    pub description: Option<String>,
    pub genre: Option<String>,
    pub released: Option<String>,
    pub players: Option<String>,
    pub supports_korean: Option<bool>,
    pub sale_period: Option<String>,
}

impl Entry {
    pub fn new(
        index: usize,
        title: impl Into<String>,
        price: u32,
        discount_price: u32,
    ) -> Self {
        Self {
            index,
            title: title.into(),
            price,
            discount_price,
            discount_percent: discount_percent(price, discount_price),
            result_price: discount_price,
            ..Default::default()
        }
    }

    /// Only overwrites what the detail page actually provided.
    pub fn apply_detail(&mut self, detail: Detail) {
        if detail.description.is_some() {
            self.description = detail.description;
        }
        if detail.genre.is_some() {
            self.genre = detail.genre;
        }
        if let Some(released) = detail.released {
            self.released = released;
        }
        if detail.players.is_some() {
            self.players = detail.players;
        }
        if let Some(korean) = detail.supports_korean {
            self.supports_korean = korean;
        }
        if detail.sale_period.is_some() {
            self.sale_period = detail.sale_period;
        }
    }
}

/// Truncated, not rounded. A free game (`price == 0`) counts as 0%.
pub fn discount_percent(price: u32, discount_price: u32) -> i32 {
    if price == 0 {
        return 0;
    }
    let (price, discount_price) = (i64::from(price), i64::from(discount_price));
    ((price - discount_price) * 100 / price) as i32
}
