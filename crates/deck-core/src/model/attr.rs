use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Attr {
    Cute = 0,
    Cool = 1,
    Pure = 2,
    Happy = 3,
    Mysterious = 4,
}

impl Attr {
    pub const ALL: [Attr; 5] = [
        Attr::Cute,
        Attr::Cool,
        Attr::Pure,
        Attr::Happy,
        Attr::Mysterious,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Attr::Cute),
            1 => Some(Attr::Cool),
            2 => Some(Attr::Pure),
            3 => Some(Attr::Happy),
            4 => Some(Attr::Mysterious),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Attr::Cute => "cute",
            Attr::Cool => "cool",
            Attr::Pure => "pure",
            Attr::Happy => "happy",
            Attr::Mysterious => "mysterious",
        };
        f.write_str(text)
    }
}
