use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    BronzeSaver,
    SilverSaver,
    GoldSaver,
    ThreeDayStreak,
    SevenDayStreak,
}

impl Badge {
    /// Reporting order.
    pub fn all() -> [Badge; 5] {
        [
            Badge::BronzeSaver,
            Badge::SilverSaver,
            Badge::GoldSaver,
            Badge::ThreeDayStreak,
            Badge::SevenDayStreak,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::BronzeSaver => "Bronze Saver",
            Badge::SilverSaver => "Silver Saver",
            Badge::GoldSaver => "Gold Saver",
            Badge::ThreeDayStreak => "3-Day Streak",
            Badge::SevenDayStreak => "7-Day Streak",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Badge::BronzeSaver => "🥉",
            Badge::SilverSaver => "🥈",
            Badge::GoldSaver => "🥇",
            Badge::ThreeDayStreak => "🔥",
            Badge::SevenDayStreak => "🔥🔥",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
