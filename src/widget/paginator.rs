//! Page bookkeeping for a fixed item sequence.
//!
//! Pages are 1-indexed. The item sequence is set once; afterwards only the
//! current page moves, and only through the navigation methods, which refuse
//! to leave `[1, total_pages]`.

use std::num::NonZeroUsize;
use thiserror::Error;

use crate::feed::FeedItemRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Page {page} is out of range (1..={total_pages})")]
    OutOfRange { page: usize, total_pages: usize },

    #[error("Items have already been loaded")]
    AlreadyPopulated,
}

/// Per-widget feed state.
pub type FeedState = Paginator<FeedItemRecord>;

#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    items_per_page: NonZeroUsize,
    current_page: usize,
    total_pages: usize,
    populated: bool,
}

impl<T> Paginator<T> {
    /// Empty state on page 1.
    pub fn new(items_per_page: NonZeroUsize) -> Self {
        Self {
            items: Vec::new(),
            items_per_page,
            current_page: 1,
            total_pages: 0,
            populated: false,
        }
    }

    /// Install the item sequence and compute the page count.
    ///
    /// Can only happen once; the page count is fixed afterwards.
    pub fn populate(&mut self, items: Vec<T>) -> Result<(), PageError> {
        if self.populated {
            return Err(PageError::AlreadyPopulated);
        }
        self.total_pages = items.len().div_ceil(self.items_per_page.get());
        self.items = items;
        self.current_page = 1;
        self.populated = true;
        Ok(())
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_per_page(&self) -> NonZeroUsize {
        self.items_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Items on page `page`, clipped to the sequence. Empty when out of range.
    pub fn page(&self, page: usize) -> &[T] {
        if page == 0 {
            return &[];
        }
        let per_page = self.items_per_page.get();
        let start = (page - 1).saturating_mul(per_page).min(self.items.len());
        let end = start.saturating_add(per_page).min(self.items.len());
        &self.items[start..end]
    }

    /// Items on the current page.
    pub fn current_items(&self) -> &[T] {
        self.page(self.current_page)
    }

    /// Index of the first current-page item within the whole sequence.
    pub fn current_offset(&self) -> usize {
        (self.current_page - 1) * self.items_per_page.get()
    }

    /// Step back one page. Returns whether the page changed.
    pub fn previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one page. Returns whether the page changed.
    pub fn next(&mut self) -> bool {
        if self.current_page < self.total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Jump to `page`, rejecting pages outside `[1, total_pages]`.
    pub fn go_to(&mut self, page: usize) -> Result<(), PageError> {
        if page == 0 || page > self.total_pages {
            return Err(PageError::OutOfRange {
                page,
                total_pages: self.total_pages,
            });
        }
        self.current_page = page;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paginator(count: usize, per_page: usize) -> Paginator<usize> {
        let mut p = Paginator::new(NonZeroUsize::new(per_page).unwrap());
        p.populate((0..count).collect()).unwrap();
        p
    }

    #[test]
    fn test_new_state_is_empty_on_page_one() {
        let p: Paginator<usize> = Paginator::new(NonZeroUsize::new(5).unwrap());
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(), 0);
        assert!(p.current_items().is_empty());
        assert!(!p.is_populated());
    }

    #[test]
    fn test_twelve_items_five_per_page() {
        let p = paginator(12, 5);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.page(1), &[0, 1, 2, 3, 4]);
        assert_eq!(p.page(2), &[5, 6, 7, 8, 9]);
        assert_eq!(p.page(3), &[10, 11]);
        assert!(p.page(4).is_empty());
        assert!(p.page(0).is_empty());
    }

    #[test]
    fn test_previous_is_noop_on_first_page() {
        let mut p = paginator(12, 5);
        assert!(!p.previous());
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_next_is_noop_on_last_page() {
        let mut p = paginator(12, 5);
        assert!(p.next());
        assert!(p.next());
        assert_eq!(p.current_page(), 3);
        assert!(!p.next());
        assert_eq!(p.current_page(), 3);
        assert_eq!(p.current_items(), &[10, 11]);
        assert_eq!(p.current_offset(), 10);
    }

    #[test]
    fn test_next_is_noop_without_items() {
        let mut p = paginator(0, 5);
        assert_eq!(p.total_pages(), 0);
        assert!(!p.next());
        assert!(!p.previous());
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut p = paginator(12, 5);
        assert_eq!(
            p.go_to(0),
            Err(PageError::OutOfRange {
                page: 0,
                total_pages: 3
            })
        );
        assert!(p.go_to(4).is_err());
        assert_eq!(p.current_page(), 1);

        p.go_to(3).unwrap();
        assert_eq!(p.current_page(), 3);
    }

    #[test]
    fn test_populate_only_once() {
        let mut p = paginator(3, 2);
        assert_eq!(p.populate(vec![9]), Err(PageError::AlreadyPopulated));
        assert_eq!(p.items(), &[0, 1, 2]);
        assert_eq!(p.total_pages(), 2);
    }

    proptest! {
        #[test]
        fn prop_pages_reconstruct_sequence(count in 0usize..200, per_page in 1usize..20) {
            let p = paginator(count, per_page);
            prop_assert_eq!(p.total_pages(), count.div_ceil(per_page));

            let rebuilt: Vec<usize> = (1..=p.total_pages())
                .flat_map(|page| p.page(page).iter().copied())
                .collect();
            prop_assert_eq!(rebuilt, (0..count).collect::<Vec<_>>());
        }

        #[test]
        fn prop_navigation_stays_in_range(
            count in 0usize..60,
            per_page in 1usize..10,
            moves in proptest::collection::vec(0u8..3, 0..40),
        ) {
            let mut p = paginator(count, per_page);
            for m in moves {
                match m {
                    0 => { p.previous(); }
                    1 => { p.next(); }
                    _ => { let _ = p.go_to(count % 7); }
                }
                prop_assert!(p.current_page() >= 1);
                prop_assert!(p.current_page() <= p.total_pages().max(1));
                let start = (p.current_page() - 1) * per_page;
                let end = (start + per_page).min(count);
                let expected: Vec<usize> = (start.min(count)..end).collect();
                prop_assert_eq!(p.current_items().to_vec(), expected);
            }
        }
    }
}
