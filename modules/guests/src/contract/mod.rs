pub mod client;
pub mod error;
pub mod model;

pub use error::GuestsError;
pub use model::{Guest, NewGuest};
