use crate::contract::model::Guest;
use crate::infra::storage::entity::Model as GuestEntity;

impl From<GuestEntity> for Guest {
    fn from(e: GuestEntity) -> Self {
        Self {
            id: i64::from(e.id),
            name: e.name,
            place: e.place,
            identifier: e.identifier,
            checked_in: e.checked_in,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
