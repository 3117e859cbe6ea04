/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub number: usize,
    pub num_pages: usize,
    /// Items across all pages.
    pub count: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then_some(self.number - 1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Splits `items` into pages of `per_page` and returns the requested one.
///
/// Lookup is forgiving: a missing or non-numeric page gives the first page,
/// and a number outside `1..=num_pages` gives the last. An empty listing
/// still has one (empty) page.
pub fn paginate<T>(items: Vec<T>, per_page: usize, page: Option<&str>) -> Page<T> {
    let per_page = per_page.max(1);
    let count = items.len();
    let num_pages = count.div_ceil(per_page).max(1);

    let number = match page.map(str::trim).map(str::parse::<i64>) {
        None | Some(Err(_)) => 1,
        Some(Ok(n)) if n >= 1 && (n as u64) <= num_pages as u64 => n as usize,
        Some(Ok(_)) => num_pages,
    };

    let start = (number - 1) * per_page;
    let items = items.into_iter().skip(start).take(per_page).collect();
    Page {
        items,
        number,
        num_pages,
        count,
    }
}
