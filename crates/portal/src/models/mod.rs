//! Domain models mirrored from the REST backend.
//!
//! The backend is the source of truth for every entity here; the portal only
//! holds transient copies. All records use camelCase field names on the wire.

pub mod inquiry;
pub mod order;
pub mod product;
pub mod profile;
pub mod user;

pub use inquiry::{InquiryPatch, NewInquiry, ServiceInquiry};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use product::{Category, Locale, Product, ProductPatch, filter_by_tag};
pub use profile::{NewProfile, NotificationPreferences, Profile, ProfileUpdate};
pub use user::{NewUser, User, UserUpdate};
