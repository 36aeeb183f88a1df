use chrono::{DateTime, Utc};

/// A registered guest. Transport-agnostic; REST DTOs live in `api::rest::dto`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub place: String,
    /// Short hex code printed into the guest's QR image. Unique and immutable.
    pub identifier: String,
    pub checked_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for registering a new guest
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub name: String,
    pub place: String,
}
