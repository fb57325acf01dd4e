//! Quote inquiry lifecycle: submission, listing, filtering, pagination and
//! dashboard counts.
//!
//! The list operations here are pure functions over fetched inquiries so that
//! the customer and brand dashboards share one implementation. The network
//! side lives in [`InquiryService`]; per-view state lives in [`board`].

pub mod board;
mod draft;

use chrono::{DateTime, Utc};
use tracing::instrument;

use threadline_core::{InquiryId, InquiryStatus, StatusGroup, UserId};

use crate::api::ApiClient;
use crate::error::{Result, add_breadcrumb};
use crate::models::{InquiryPatch, ServiceInquiry};

pub use board::{FetchTicket, InquiryBoard, LoadState, SharedInquiryBoard};
pub use draft::{Field, FieldError, InquiryDraft, ValidInquiry, ValidationErrors};

/// Sort newest-created first. Ties keep their fetched order.
pub fn sort_newest_first(inquiries: &mut [ServiceInquiry]) {
    inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Inquiries whose status falls in `group`, in their original order.
#[must_use]
pub fn filter_by_status_group<'a>(
    inquiries: &'a [ServiceInquiry],
    group: &StatusGroup,
) -> Vec<&'a ServiceInquiry> {
    inquiries
        .iter()
        .filter(|inquiry| group.contains(&inquiry.status))
        .collect()
}

/// The 1-based `page` of `items`.
///
/// Page 0 is treated as page 1. A page past the end, or a zero page size,
/// yields an empty slice.
#[must_use]
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

/// Number of pages needed for `len` items. Never less than 1.
#[must_use]
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Dashboard counters over an unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InquiryStats {
    pub total: usize,
    /// `pending` plus `in_review`.
    pub pending: usize,
    pub approved: usize,
    pub completed: usize,
    pub in_production: usize,
    pub rejected: usize,
}

impl InquiryStats {
    #[must_use]
    pub fn compute(inquiries: &[ServiceInquiry]) -> Self {
        inquiries
            .iter()
            .fold(Self::default(), |mut stats, inquiry| {
                stats.total += 1;
                match inquiry.status {
                    InquiryStatus::Pending | InquiryStatus::InReview => stats.pending += 1,
                    InquiryStatus::Approved => stats.approved += 1,
                    InquiryStatus::Completed => stats.completed += 1,
                    InquiryStatus::Production => stats.in_production += 1,
                    InquiryStatus::Rejected => stats.rejected += 1,
                    InquiryStatus::Other(_) => {}
                }
                stats
            })
    }
}

/// Network operations on quote inquiries.
#[derive(Clone)]
pub struct InquiryService {
    api: ApiClient,
}

impl InquiryService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Validate and submit `draft` for `user_id`, stamped with the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Validation` without touching the network if the
    /// draft is invalid, or `PortalError::Api` if the backend call fails.
    pub async fn create(&self, user_id: UserId, draft: &InquiryDraft) -> Result<ServiceInquiry> {
        self.create_at(user_id, draft, Utc::now()).await
    }

    /// Like [`create`](Self::create) with an explicit submission time. The
    /// deadline is checked against the UTC date of `now`.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    #[instrument(skip(self, draft), fields(user_id = %user_id))]
    pub async fn create_at(
        &self,
        user_id: UserId,
        draft: &InquiryDraft,
        now: DateTime<Utc>,
    ) -> Result<ServiceInquiry> {
        let valid = draft.validate(now.date_naive())?;
        let body = valid.into_new_inquiry(user_id, now);
        let created = self.api.create_inquiry(&body).await?;

        tracing::info!(inquiry_id = %created.id, "Quote inquiry submitted");
        add_breadcrumb(
            "inquiry",
            "Submitted quote inquiry",
            Some(&[("inquiry_id", &created.id.to_string())]),
        );
        Ok(created)
    }

    /// A user's inquiries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ServiceInquiry>> {
        let mut inquiries = self.api.inquiries_by_user(user_id).await?;
        sort_newest_first(&mut inquiries);
        Ok(inquiries)
    }

    /// Every inquiry, newest first. Used by the brand dashboard.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    pub async fn list_all(&self) -> Result<Vec<ServiceInquiry>> {
        let mut inquiries = self.api.list_inquiries().await?;
        sort_newest_first(&mut inquiries);
        Ok(inquiries)
    }

    /// # Errors
    ///
    /// Returns `PortalError::Api` with `ApiError::NotFound` if the inquiry
    /// does not exist, or if the backend call fails.
    pub async fn get(&self, id: InquiryId) -> Result<ServiceInquiry> {
        Ok(self.api.get_inquiry(id).await?)
    }

    /// Move an inquiry to `status`.
    ///
    /// The pipeline order is advisory; an out-of-order move is logged and
    /// still sent, since the backend owns the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    #[instrument(skip(self), fields(inquiry_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        id: InquiryId,
        status: InquiryStatus,
    ) -> Result<ServiceInquiry> {
        let current = self.api.get_inquiry(id).await?;
        if !current.status.can_transition_to(&status) {
            tracing::warn!(from = %current.status, "Status change skips the usual pipeline");
        }
        let patch = InquiryPatch {
            status: Some(status),
            ..InquiryPatch::default()
        };
        Ok(self.api.update_inquiry(id, &patch).await?)
    }

    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    pub async fn delete(&self, id: InquiryId) -> Result<()> {
        Ok(self.api.delete_inquiry(id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::PortalError;
    use crate::store::MemoryStore;

    pub(crate) fn inquiry(id: i64, status: InquiryStatus, created: &str) -> ServiceInquiry {
        ServiceInquiry {
            id: InquiryId::new(id),
            user_id: UserId::new(1),
            description: format!("Inquiry {id}"),
            quantity: 10,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            fabrics: None,
            status,
            created_at: created.parse().unwrap(),
        }
    }

    fn service(uri: &str) -> InquiryService {
        InquiryService::new(
            ApiClient::new(Url::parse(uri).unwrap(), Arc::new(MemoryStore::new())).unwrap(),
        )
    }

    fn mixed() -> Vec<ServiceInquiry> {
        vec![
            inquiry(1, InquiryStatus::Pending, "2026-10-01T00:00:00Z"),
            inquiry(2, InquiryStatus::InReview, "2026-10-02T00:00:00Z"),
            inquiry(3, InquiryStatus::Approved, "2026-10-03T00:00:00Z"),
            inquiry(4, InquiryStatus::Completed, "2026-10-04T00:00:00Z"),
            inquiry(5, InquiryStatus::Production, "2026-10-05T00:00:00Z"),
            inquiry(6, InquiryStatus::Rejected, "2026-10-06T00:00:00Z"),
            inquiry(7, InquiryStatus::Other("on_hold".into()), "2026-10-07T00:00:00Z"),
        ]
    }

    fn ids(list: &[&ServiceInquiry]) -> Vec<i64> {
        list.iter().map(|i| i.id.as_i64()).collect()
    }

    #[test]
    fn test_sort_is_newest_first_and_stable() {
        let mut list = vec![
            inquiry(1, InquiryStatus::Pending, "2026-10-01T00:00:00Z"),
            inquiry(2, InquiryStatus::Pending, "2026-10-03T00:00:00Z"),
            inquiry(3, InquiryStatus::Pending, "2026-10-01T00:00:00Z"),
        ];
        sort_newest_first(&mut list);
        let order: Vec<i64> = list.iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn test_pending_group_includes_in_review() {
        let list = mixed();
        let pending = filter_by_status_group(&list, &StatusGroup::Pending);
        assert_eq!(ids(&pending), vec![1, 2]);
    }

    #[test]
    fn test_exact_group_and_all() {
        let list = mixed();
        let approved =
            filter_by_status_group(&list, &StatusGroup::Exact(InquiryStatus::Approved));
        assert_eq!(ids(&approved), vec![3]);
        assert_eq!(filter_by_status_group(&list, &StatusGroup::All).len(), 7);
        let on_hold = filter_by_status_group(
            &list,
            &StatusGroup::Exact(InquiryStatus::Other("on_hold".into())),
        );
        assert_eq!(ids(&on_hold), vec![7]);
    }

    #[test]
    fn test_pages_partition_the_list() {
        let items: Vec<u32> = (1..=12).collect();
        let size = 5;
        let pages = page_count(items.len(), size);
        assert_eq!(pages, 3);

        let mut rejoined = Vec::new();
        for page in 1..=pages {
            let slice = paginate(&items, size, page);
            assert!(slice.len() <= size);
            rejoined.extend_from_slice(slice);
        }
        assert_eq!(rejoined, items);
        assert_eq!(paginate(&items, size, 3), &[11, 12]);
    }

    #[test]
    fn test_six_inquiries_over_pages_of_five() {
        let mut list: Vec<ServiceInquiry> = (1..=6)
            .map(|i| {
                inquiry(
                    i,
                    InquiryStatus::Pending,
                    &format!("2026-10-{i:02}T00:00:00Z"),
                )
            })
            .collect();
        sort_newest_first(&mut list);

        assert_eq!(page_count(list.len(), 5), 2);
        let first: Vec<i64> = paginate(&list, 5, 1).iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(first, vec![6, 5, 4, 3, 2]);
        let second: Vec<i64> = paginate(&list, 5, 2).iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(second, vec![1]);
        assert!(paginate(&list, 5, 3).is_empty());
    }

    #[test]
    fn test_out_of_range_pages() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 5, 2).is_empty());
        assert!(paginate(&items, 0, 1).is_empty());
        assert_eq!(paginate(&items, 5, 0), &[1, 2, 3]);

        let empty: [u8; 0] = [];
        assert!(paginate(&empty, 5, 1).is_empty());
        assert_eq!(page_count(0, 5), 1);
    }

    #[test]
    fn test_stats_cover_every_bucket() {
        let stats = InquiryStats::compute(&mixed());
        assert_eq!(
            stats,
            InquiryStats {
                total: 7,
                pending: 2,
                approved: 1,
                completed: 1,
                in_production: 1,
                rejected: 1,
            }
        );
        assert_eq!(InquiryStats::compute(&[]), InquiryStats::default());
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let draft = InquiryDraft {
            description: "Team jerseys".into(),
            quantity: "0".into(),
            deadline: "2026-12-01".into(),
            fabrics: String::new(),
        };
        let now = "2026-10-17T10:00:00Z".parse().unwrap();
        let err = service(&server.uri())
            .create_at(UserId::new(1), &draft, now)
            .await
            .unwrap_err();
        match err {
            PortalError::Validation(errors) => assert!(errors.has(Field::Quantity)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_sends_pending_with_timestamp() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/serviceInquiries"))
            .and(body_partial_json(json!({
                "userId": 1,
                "quantity": 50,
                "status": "pending",
                "createdAt": "2026-10-17T10:00:00Z"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 11,
                "userId": 1,
                "description": "Team jerseys",
                "quantity": 50,
                "deadline": "2026-12-01",
                "status": "pending",
                "createdAt": "2026-10-17T10:00:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = InquiryDraft {
            description: "Team jerseys".into(),
            quantity: "50".into(),
            deadline: "2026-12-01".into(),
            fabrics: String::new(),
        };
        let now = "2026-10-17T10:00:00Z".parse().unwrap();
        let created = service(&server.uri())
            .create_at(UserId::new(1), &draft, now)
            .await
            .unwrap();
        assert_eq!(created.id, InquiryId::new(11));
        assert_eq!(created.status, InquiryStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_by_user_sorts_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/serviceInquiries"))
            .and(query_param("userId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "userId": 1, "description": "a", "quantity": 1,
                 "deadline": "2026-12-01", "status": "pending", "createdAt": "2026-10-01T00:00:00Z"},
                {"id": 2, "userId": 1, "description": "b", "quantity": 1,
                 "deadline": "2026-12-01", "status": "approved", "createdAt": "2026-10-09T00:00:00Z"}
            ])))
            .mount(&server)
            .await;

        let list = service(&server.uri())
            .list_by_user(UserId::new(1))
            .await
            .unwrap();
        let order: Vec<i64> = list.iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_update_status_patches_status_only() {
        let server = MockServer::start().await;
        let record = |status: &str| {
            json!({"id": 4, "userId": 1, "description": "a", "quantity": 1,
                   "deadline": "2026-12-01", "status": status,
                   "createdAt": "2026-10-01T00:00:00Z"})
        };
        Mock::given(method("GET"))
            .and(path("/serviceInquiries/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record("in_review")))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/serviceInquiries/4"))
            .and(body_partial_json(json!({"status": "approved"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(record("approved")))
            .expect(1)
            .mount(&server)
            .await;

        let updated = service(&server.uri())
            .update_status(InquiryId::new(4), InquiryStatus::Approved)
            .await
            .unwrap();
        assert_eq!(updated.status, InquiryStatus::Approved);
    }
}
