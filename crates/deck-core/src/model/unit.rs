use core::fmt;
use serde::{Deserialize, Serialize};

/// A team a character performs under. Virtual singers may count for a second,
/// supporting team as well as their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Unit {
    LightSound = 0,
    Idol = 1,
    Street = 2,
    ThemePark = 3,
    SchoolRefusal = 4,
    Piapro = 5,
}

impl Unit {
    pub const ALL: [Unit; 6] = [
        Unit::LightSound,
        Unit::Idol,
        Unit::Street,
        Unit::ThemePark,
        Unit::SchoolRefusal,
        Unit::Piapro,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Unit::LightSound),
            1 => Some(Unit::Idol),
            2 => Some(Unit::Street),
            3 => Some(Unit::ThemePark),
            4 => Some(Unit::SchoolRefusal),
            5 => Some(Unit::Piapro),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Team of a character in the reference roster: four members per team for
    /// ids 1..=20, virtual singers from 21 upwards.
    pub const fn of_character(character_id: u32) -> Unit {
        match character_id {
            1..=4 => Unit::LightSound,
            5..=8 => Unit::Idol,
            9..=12 => Unit::Street,
            13..=16 => Unit::ThemePark,
            17..=20 => Unit::SchoolRefusal,
            _ => Unit::Piapro,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Unit::LightSound => "light_sound",
            Unit::Idol => "idol",
            Unit::Street => "street",
            Unit::ThemePark => "theme_park",
            Unit::SchoolRefusal => "school_refusal",
            Unit::Piapro => "piapro",
        };
        f.write_str(text)
    }
}
