pub mod cache;
pub mod calc;
pub mod detail;
pub mod error;
pub mod model;
pub mod synthetic;

pub use error::DetailError;
pub use model::card::CardDetail;
pub use model::deck::DeckDetail;
