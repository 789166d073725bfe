//! Active-page notifier shared (read-only) by every component.

use shared::domain::PageId;

use crate::surface::Surface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageChange {
    pub previous: Option<PageId>,
    pub current: PageId,
}

impl PageChange {
    pub fn entered(&self, page: &PageId) -> bool {
        &self.current == page && self.previous.as_ref() != Some(page)
    }

    pub fn left(&self, page: &PageId) -> bool {
        self.previous.as_ref() == Some(page) && &self.current != page
    }
}

/// Single source of truth for which page is showing. Only the site publishes;
/// components see changes through [`PageAware::on_page_change`].
#[derive(Debug, Default)]
pub struct ActivePage {
    current: Option<PageId>,
    revision: u64,
}

impl ActivePage {
    pub fn current(&self) -> Option<&PageId> {
        self.current.as_ref()
    }

    pub fn is(&self, page: &PageId) -> bool {
        self.current.as_ref() == Some(page)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Records `page` as active. Re-publishing the current page yields `None`.
    pub(crate) fn publish(&mut self, page: PageId) -> Option<PageChange> {
        if self.current.as_ref() == Some(&page) {
            return None;
        }
        self.revision += 1;
        let previous = self.current.replace(page.clone());
        Some(PageChange {
            previous,
            current: page,
        })
    }
}

pub trait PageAware {
    fn owning_page(&self) -> &PageId;
    fn on_page_change(&mut self, change: &PageChange, surface: &mut dyn Surface);
}
