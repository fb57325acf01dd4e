//! Status, role and tag enums.
//!
//! Status labels come from the backend and the portal only interprets them;
//! transition authority lives server-side. Labels the client does not know
//! are kept verbatim in an `Other` variant so they survive a round-trip.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Portal user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shopper buying catalog products and requesting quotes.
    Customer,
    /// Brand account managing production inquiries and its catalog.
    Brand,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Brand => write!(f, "brand"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "brand" => Ok(Self::Brand),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

/// Lifecycle status of a quote inquiry.
///
/// The pipeline is `pending → in_review → approved → production →
/// completed`; `rejected` is reachable from any non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum InquiryStatus {
    #[default]
    Pending,
    InReview,
    Approved,
    Production,
    Completed,
    Rejected,
    /// A label this client does not recognize.
    Other(String),
}

impl InquiryStatus {
    /// The wire label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Production => "production",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
            Self::Other(label) => label,
        }
    }

    /// `completed` and `rejected` end the lifecycle.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// The next step along the linear pipeline, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InReview),
            Self::InReview => Some(Self::Approved),
            Self::Approved => Some(Self::Production),
            Self::Production => Some(Self::Completed),
            Self::Completed | Self::Rejected | Self::Other(_) => None,
        }
    }

    /// Whether the pipeline defines a move from `self` to `to`.
    ///
    /// Informational only: the client never rejects a status the server
    /// reports.
    #[must_use]
    pub fn can_transition_to(&self, to: &Self) -> bool {
        if self.is_terminal() || matches!(self, Self::Other(_)) {
            return false;
        }
        *to == Self::Rejected || self.next().as_ref() == Some(to)
    }
}

impl From<String> for InquiryStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "pending" => Self::Pending,
            "in_review" => Self::InReview,
            "approved" => Self::Approved,
            "production" => Self::Production,
            "completed" => Self::Completed,
            "rejected" => Self::Rejected,
            _ => Self::Other(label),
        }
    }
}

impl From<InquiryStatus> for String {
    fn from(status: InquiryStatus) -> Self {
        match status {
            InquiryStatus::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named client-side filter bucket over inquiry statuses.
///
/// `Pending` deliberately covers both `pending` and `in_review`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StatusGroup {
    #[default]
    All,
    Pending,
    /// Exact match on a single status label.
    Exact(InquiryStatus),
}

impl StatusGroup {
    /// Whether a status falls in this bucket.
    #[must_use]
    pub fn contains(&self, status: &InquiryStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => matches!(status, InquiryStatus::Pending | InquiryStatus::InReview),
            Self::Exact(expected) => expected == status,
        }
    }
}

impl FromStr for StatusGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("empty status group".to_owned()),
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            other => Ok(Self::Exact(InquiryStatus::from(other.to_owned()))),
        }
    }
}

impl fmt::Display for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Pending => f.write_str("pending"),
            Self::Exact(status) => f.write_str(status.as_str()),
        }
    }
}

/// Catalog order status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    /// The wire label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(label),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchandising tag shown on product cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductTag {
    Bestseller,
    New,
    Trending,
}

impl FromStr for ProductTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bestseller" => Ok(Self::Bestseller),
            "new" => Ok(Self::New),
            "trending" => Ok(Self::Trending),
            _ => Err(format!("invalid product tag: {s}")),
        }
    }
}
