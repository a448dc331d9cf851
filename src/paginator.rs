pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: u32,
    page_count: u32,
}

impl<'a, T> Paginator<'a, T> {
    pub fn from(items: &'a [T], page_size: u32) -> Self {
        let page_size = page_size.max(1);
        if items.is_empty() {
            return Paginator {
                items,
                page_size,
                page_count: 0,
            };
        }
        let item_count = items.len() as u32;
        let upper_bound = item_count - 1;
        let page_count = (upper_bound / page_size) + 1;

        Paginator {
            items,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn get_page(&self, page: u32) -> Result<&'a [T], String> {
        match page {
            0 => return Err("Page has to be greater than 0".to_string()),
            x if x > self.page_count => return Err(format!("Page has to be less than page_count ({})", self.page_count)),
            _ => {}
        };

        let index = ((page - 1) * self.page_size) as usize;
        let end = (index + self.page_size as usize).min(self.items.len());
        Ok(&self.items[index..end])
    }

    /// Every page with its number. An empty list still yields one empty page.
    pub fn pages(&self) -> Vec<(u32, &'a [T])> {
        if self.page_count == 0 {
            return vec![(1, &self.items[0..0])];
        }
        (1..=self.page_count)
            .filter_map(|n| self.get_page(n).ok().map(|items| (n, items)))
            .collect()
    }
}

/// `/blog/` for the first page, `/blog/page/2/` after that
pub fn page_route(base: &str, page: u32) -> String {
    if page <= 1 {
        base.to_string()
    } else {
        format!("{}page/{}/", base, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_case() {
        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 5);
        assert_eq!(paginator.get_page(1), Ok([1, 2, 3].as_slice()));
        assert_eq!(paginator.get_page(2), Ok([4, 5, 6].as_slice()));
        assert_eq!(paginator.get_page(4), Ok([10, 11, 12].as_slice()));
        assert_eq!(paginator.get_page(5), Ok([13].as_slice()));

        assert_eq!(paginator.get_page(0), Err("Page has to be greater than 0".to_string()));
        assert_eq!(paginator.get_page(6), Err("Page has to be less than page_count (5)".to_string()));
        assert_eq!(paginator.pages().len(), 5);
    }

    #[test]
    fn test_empty() {
        let items: Vec<u32> = vec![];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 0);
        assert_eq!(paginator.get_page(1), Err("Page has to be less than page_count (0)".to_string()));

        let pages = paginator.pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].0, 1);
        assert!(pages[0].1.is_empty());
    }

    #[test]
    fn test_exact_fit() {
        let items = vec![1, 2, 3, 4];
        let paginator = Paginator::from(&items, 2);
        assert_eq!(paginator.page_count(), 2);
        assert_eq!(paginator.get_page(2), Ok([3, 4].as_slice()));
    }

    #[test]
    fn test_page_route() {
        assert_eq!(page_route("/blog/", 1), "/blog/");
        assert_eq!(page_route("/blog/", 3), "/blog/page/3/");
        assert_eq!(page_route("/blog/tag/news/", 2), "/blog/tag/news/page/2/");
    }
}
