use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardRarity {
    #[serde(rename = "rarity_1")]
    One,
    #[serde(rename = "rarity_2")]
    Two,
    #[serde(rename = "rarity_3")]
    Three,
    #[serde(rename = "rarity_4")]
    Four,
    #[serde(rename = "rarity_birthday")]
    Birthday,
}

impl CardRarity {
    pub const ALL: [CardRarity; 5] = [
        CardRarity::One,
        CardRarity::Two,
        CardRarity::Three,
        CardRarity::Four,
        CardRarity::Birthday,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CardRarity::One => "rarity_1",
            CardRarity::Two => "rarity_2",
            CardRarity::Three => "rarity_3",
            CardRarity::Four => "rarity_4",
            CardRarity::Birthday => "rarity_birthday",
        }
    }
}

impl fmt::Display for CardRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::CardRarity;

    #[test]
    fn serde_uses_master_data_names() {
        let json = serde_json::to_string(&CardRarity::Birthday).expect("serialize");
        assert_eq!(json, "\"rarity_birthday\"");
        let parsed: CardRarity = serde_json::from_str("\"rarity_4\"").expect("parse");
        assert_eq!(parsed, CardRarity::Four);
    }
}
