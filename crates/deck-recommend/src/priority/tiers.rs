use super::CardPriority;
use deck_core::model::rarity::CardRarity;

const fn tier(event_bonus: f64, rarity: CardRarity, master_rank: u8, priority: u32) -> CardPriority {
    CardPriority {
        event_bonus,
        rarity,
        master_rank,
        priority,
    }
}

/// Challenge lives only care about rarity.
pub const CHALLENGE_LIVE: &[CardPriority] = &[
    tier(0.0, CardRarity::Four, 0, 0),
    tier(0.0, CardRarity::Birthday, 0, 10),
    tier(0.0, CardRarity::Three, 0, 20),
    tier(0.0, CardRarity::Two, 0, 30),
    tier(0.0, CardRarity::One, 0, 40),
];

/// Marathon and cheerful carnival: same-attribute same-team limited cards first.
pub const MARATHON_CHEERFUL: &[CardPriority] = &[
    tier(95.0, CardRarity::Four, 5, 0),
    tier(80.0, CardRarity::Four, 0, 10),
    tier(75.0, CardRarity::Four, 5, 10),
    tier(65.0, CardRarity::Four, 5, 30),
    tier(60.0, CardRarity::Four, 0, 40),
    tier(50.0, CardRarity::Four, 5, 40),
    tier(65.0, CardRarity::Birthday, 5, 40),
    tier(50.0, CardRarity::Four, 0, 50),
    tier(55.0, CardRarity::Birthday, 0, 50),
    tier(55.0, CardRarity::Three, 5, 50),
    tier(35.0, CardRarity::Four, 0, 60),
    tier(40.0, CardRarity::Birthday, 5, 60),
    tier(50.0, CardRarity::Three, 0, 60),
    tier(25.0, CardRarity::Four, 5, 60),
    tier(25.0, CardRarity::Four, 0, 70),
    tier(30.0, CardRarity::Birthday, 0, 70),
    tier(30.0, CardRarity::Three, 5, 70),
    tier(50.0, CardRarity::Two, 0, 70),
    tier(50.0, CardRarity::One, 0, 70),
    tier(20.0, CardRarity::Birthday, 0, 80),
    tier(25.0, CardRarity::Three, 0, 80),
    tier(25.0, CardRarity::Two, 0, 80),
    tier(25.0, CardRarity::One, 0, 80),
    tier(10.0, CardRarity::Four, 0, 80),
    tier(5.0, CardRarity::Birthday, 0, 90),
    tier(0.0, CardRarity::Three, 0, 100),
    tier(0.0, CardRarity::Two, 0, 100),
    tier(0.0, CardRarity::One, 0, 100),
];

/// World-link events: same-team cards by bonus, then by rarity.
pub const WORLD_BLOOM: &[CardPriority] = &[
    tier(55.0, CardRarity::Four, 0, 0),
    tier(50.0, CardRarity::Four, 5, 5),
    tier(35.0, CardRarity::Four, 0, 10),
    tier(40.0, CardRarity::Birthday, 5, 10),
    tier(30.0, CardRarity::Birthday, 0, 20),
    tier(30.0, CardRarity::Three, 5, 20),
    tier(25.0, CardRarity::Four, 5, 21),
    tier(10.0, CardRarity::Four, 0, 22),
    tier(25.0, CardRarity::Three, 0, 30),
    tier(25.0, CardRarity::Two, 0, 40),
    tier(25.0, CardRarity::One, 0, 50),
    tier(5.0, CardRarity::Birthday, 0, 70),
    tier(0.0, CardRarity::Three, 0, 80),
    tier(0.0, CardRarity::Two, 0, 90),
    tier(0.0, CardRarity::One, 0, 100),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_ordered_by_priority() {
        for table in [CHALLENGE_LIVE, MARATHON_CHEERFUL, WORLD_BLOOM] {
            assert!(table.windows(2).all(|w| w[0].priority <= w[1].priority));
        }
    }

    #[test]
    fn last_tier_of_every_table_accepts_any_bonus() {
        for table in [CHALLENGE_LIVE, MARATHON_CHEERFUL, WORLD_BLOOM] {
            let last = table.last().unwrap();
            assert_eq!(last.event_bonus, 0.0);
            assert_eq!(last.master_rank, 0);
        }
    }
}
