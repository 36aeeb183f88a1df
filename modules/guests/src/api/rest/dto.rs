use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::model::{Guest, NewGuest};

/// REST DTO for a guest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestDto {
    pub id: i64,
    pub name: String,
    pub place: String,
    pub identifier: String,
    pub checked_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for registering a guest
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGuestReq {
    pub name: String,
    pub place: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuestEnvelope {
    pub success: bool,
    pub guest: GuestDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GuestListEnvelope {
    pub success: bool,
    pub guests: Vec<GuestDto>,
}

/// Body of every failed response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl From<Guest> for GuestDto {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            name: guest.name,
            place: guest.place,
            identifier: guest.identifier,
            checked_in: guest.checked_in,
            created_at: guest.created_at,
            updated_at: guest.updated_at,
        }
    }
}

impl From<CreateGuestReq> for NewGuest {
    fn from(req: CreateGuestReq) -> Self {
        Self {
            name: req.name,
            place: req.place,
        }
    }
}

impl GuestEnvelope {
    pub fn ok(guest: Guest) -> Self {
        Self {
            success: true,
            guest: guest.into(),
        }
    }
}

impl GuestListEnvelope {
    pub fn ok(guests: Vec<Guest>) -> Self {
        Self {
            success: true,
            guests: guests.into_iter().map(GuestDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn guest_serializes_in_camel_case() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap();
        let dto = GuestDto::from(Guest {
            id: 7,
            name: "Alice".into(),
            place: "NYC".into(),
            identifier: "a1b2c3d4".into(),
            checked_in: false,
            created_at: at,
            updated_at: at,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["identifier"], "a1b2c3d4");
        assert_eq!(json["checkedIn"], false);
        assert_eq!(json["createdAt"], "2025-03-01T18:30:00Z");
        assert!(json.get("checked_in").is_none());
    }
}
