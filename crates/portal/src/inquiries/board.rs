//! Per-view inquiry list state with a stale-response guard.
//!
//! Each fetch takes a [`FetchTicket`] carrying a generation number. Only the
//! completion holding the latest ticket is applied; anything older arrived
//! after a newer request was issued and is dropped.

use std::sync::{Arc, Mutex, PoisonError};

use threadline_core::{StatusGroup, UserId};

use super::{
    InquiryService, InquiryStats, filter_by_status_group, page_count, paginate, sort_newest_first,
};
use crate::error::{PortalError, Result};
use crate::models::ServiceInquiry;

/// Where the board is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; the message is safe to display with a retry action.
    Failed(String),
}

/// Proof that a fetch was started, compared on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a fetch ticket must be passed back to `complete`"]
pub struct FetchTicket(u64);

/// Inquiry list as shown by one dashboard.
#[derive(Debug, Clone)]
pub struct InquiryBoard {
    inquiries: Vec<ServiceInquiry>,
    group: StatusGroup,
    page: usize,
    page_size: usize,
    state: LoadState,
    generation: u64,
}

impl InquiryBoard {
    /// An empty board. A zero page size is raised to 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            inquiries: Vec::new(),
            group: StatusGroup::All,
            page: 1,
            page_size: page_size.max(1),
            state: LoadState::Idle,
            generation: 0,
        }
    }

    /// Start a fetch, superseding any in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Loading;
        FetchTicket(self.generation)
    }

    /// Apply a fetch result. Returns `false` if the ticket was stale and the
    /// result was discarded.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<ServiceInquiry>>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::warn!(
                ticket = ticket.0,
                latest = self.generation,
                "Discarding stale inquiry fetch"
            );
            return false;
        }

        match result {
            Ok(mut inquiries) => {
                sort_newest_first(&mut inquiries);
                self.inquiries = inquiries;
                self.state = LoadState::Ready;
                self.page = self.page.min(self.page_count());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load inquiries");
                self.state = LoadState::Failed(e.user_message());
            }
        }
        true
    }

    /// Switch filter. Always returns to page 1.
    pub fn set_group(&mut self, group: StatusGroup) {
        self.group = group;
        self.page = 1;
    }

    /// Jump to `page`, clamped to `1..=page_count()`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    #[must_use]
    pub const fn group(&self) -> &StatusGroup {
        &self.group
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Every fetched inquiry, newest first, unfiltered.
    #[must_use]
    pub fn all(&self) -> &[ServiceInquiry] {
        &self.inquiries
    }

    /// Inquiries matching the active group.
    #[must_use]
    pub fn filtered(&self) -> Vec<&ServiceInquiry> {
        filter_by_status_group(&self.inquiries, &self.group)
    }

    /// The active page of the filtered list.
    #[must_use]
    pub fn visible(&self) -> Vec<&ServiceInquiry> {
        paginate(&self.filtered(), self.page_size, self.page).to_vec()
    }

    /// Pages in the filtered list, at least 1.
    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), self.page_size)
    }

    /// Counters over the unfiltered list.
    #[must_use]
    pub fn stats(&self) -> InquiryStats {
        InquiryStats::compute(&self.inquiries)
    }
}

/// An [`InquiryBoard`] shared between a view and its background fetches.
#[derive(Debug, Clone)]
pub struct SharedInquiryBoard {
    inner: Arc<Mutex<InquiryBoard>>,
}

impl SharedInquiryBoard {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InquiryBoard::new(page_size))),
        }
    }

    /// Run `f` with the board locked. The lock is never held across an await.
    pub fn with<R>(&self, f: impl FnOnce(&mut InquiryBoard) -> R) -> R {
        let mut board = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut board)
    }

    /// A copy of the current board.
    #[must_use]
    pub fn snapshot(&self) -> InquiryBoard {
        self.with(|board| board.clone())
    }

    /// Fetch `user_id`'s inquiries, or every inquiry when `user_id` is
    /// `None`, and apply the result unless a newer refresh started meanwhile.
    ///
    /// Returns whether this refresh's result was applied.
    pub async fn refresh(&self, service: &InquiryService, user_id: Option<UserId>) -> bool {
        let ticket = self.with(InquiryBoard::begin_fetch);
        let result = match user_id {
            Some(user_id) => service.list_by_user(user_id).await,
            None => service.list_all().await,
        };
        let result = result.map_err(PortalError::report);
        self.with(|board| board.complete(ticket, result))
    }
}
