//! Quote inquiry (RFQ) records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use threadline_core::{InquiryId, InquiryStatus, UserId};

/// A request for a custom production quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInquiry {
    pub id: InquiryId,
    pub user_id: UserId,
    pub description: String,
    /// Requested unit count.
    pub quantity: u32,
    /// Requested delivery date.
    pub deadline: NaiveDate,
    #[serde(default)]
    pub fabrics: Option<String>,
    #[serde(default)]
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /serviceInquiries`.
///
/// Only built from a validated draft; see [`crate::inquiries::InquiryDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub user_id: UserId,
    pub description: String,
    pub quantity: u32,
    pub deadline: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabrics: Option<String>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

/// Body for `PATCH /serviceInquiries/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InquiryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabrics: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_inquiry_from_wire() {
        let inquiry: ServiceInquiry = serde_json::from_str(
            r#"{
                "id": 9,
                "userId": 2,
                "description": "200 embroidered hoodies",
                "quantity": 200,
                "deadline": "2026-12-01",
                "fabrics": "organic cotton",
                "status": "in_review",
                "createdAt": "2026-10-01T09:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(inquiry.status, InquiryStatus::InReview);
        assert_eq!(
            inquiry.deadline,
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_status_patch_body() {
        let patch = InquiryPatch {
            status: Some(InquiryStatus::Approved),
            ..InquiryPatch::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"status":"approved"}"#
        );
    }
}
