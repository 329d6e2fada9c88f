pub mod attr;
pub mod card;
pub mod deck;
pub mod rarity;
pub mod unit;
