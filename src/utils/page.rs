/// One page of a list, numbered from 1
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    /// Slice page `number` out of `all`.
    ///
    /// An empty list has a single empty page; any other out-of-range page is an error.
    pub fn slice(all: &'a [T], number: usize, per_page: usize) -> Result<Self, String> {
        let per_page = per_page.max(1);
        let total_pages = all.len().div_ceil(per_page).max(1);

        if number == 0 || number > total_pages {
            return Err(format!(
                "Invalid page number. There are {} page(s)",
                total_pages
            ));
        }

        let start = (number - 1) * per_page;
        let end = (start + per_page).min(all.len());
        Ok(Page {
            items: &all[start.min(end)..end],
            number,
            total_pages,
        })
    }

    pub fn is_first(&self) -> bool {
        self.number == 1
    }

    pub fn is_last(&self) -> bool {
        self.number == self.total_pages
    }

    /// Footer such as `Page 2/5`
    pub fn footer(&self) -> String {
        format!("Page {}/{}", self.number, self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slicing() {
        let items: Vec<u32> = (1..=25).collect();

        let page = Page::slice(&items, 3, 10).unwrap();
        assert_eq!(page.items, &[21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages, 3);
        assert!(page.is_last());
        assert_eq!(page.footer(), "Page 3/3");

        assert!(Page::slice(&items, 4, 10).is_err());
        assert!(Page::slice(&items, 0, 10).is_err());
    }

    #[test]
    fn test_empty_list() {
        let items: Vec<u32> = Vec::new();
        let page = Page::slice(&items, 1, 10).unwrap();

        assert!(page.items.is_empty());
        assert!(page.is_first() && page.is_last());
    }
}
