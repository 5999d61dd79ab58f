use crate::models::Badge;

/// Experience awarded per kilogram donated.
pub const XP_PER_KG: f64 = 10.0;

pub const BRONZE_KG: f64 = 60.0;
pub const SILVER_KG: f64 = 100.0;
pub const GOLD_KG: f64 = 200.0;
pub const SHORT_STREAK_DAYS: u32 = 3;
pub const LONG_STREAK_DAYS: u32 = 7;

pub fn experience_points(total_quantity: f64) -> u64 {
    // float-to-int casts saturate, so a NaN total maps to zero
    (total_quantity * XP_PER_KG).floor() as u64
}

fn threshold(badge: Badge) -> Threshold {
    match badge {
        Badge::BronzeSaver => Threshold::Quantity(BRONZE_KG),
        Badge::SilverSaver => Threshold::Quantity(SILVER_KG),
        Badge::GoldSaver => Threshold::Quantity(GOLD_KG),
        Badge::ThreeDayStreak => Threshold::Streak(SHORT_STREAK_DAYS),
        Badge::SevenDayStreak => Threshold::Streak(LONG_STREAK_DAYS),
    }
}

enum Threshold {
    Quantity(f64),
    Streak(u32),
}

/// Every badge whose threshold is met, in reporting order.
///
/// Badges accumulate: reaching gold keeps bronze and silver.
pub fn badges(total_quantity: f64, streak: u32) -> Vec<Badge> {
    Badge::all()
        .into_iter()
        .filter(|badge| match threshold(*badge) {
            Threshold::Quantity(kg) => total_quantity >= kg,
            Threshold::Streak(days) => streak >= days,
        })
        .collect()
}

/// The lowest quantity badge not yet earned, with its threshold in kg.
pub fn next_quantity_badge(total_quantity: f64) -> Option<(Badge, f64)> {
    Badge::all()
        .into_iter()
        .filter_map(|badge| match threshold(badge) {
            Threshold::Quantity(kg) if total_quantity < kg => Some((badge, kg)),
            _ => None,
        })
        .next()
}
