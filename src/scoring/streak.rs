use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Consecutive days with a donation, counting back from `today`.
///
/// `today` itself must carry a donation, otherwise the streak is zero no
/// matter how long the run before it was. Duplicate dates count once.
pub fn current_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut streak = 0u32;
    let mut check = Some(today);
    while let Some(day) = check {
        if !days.contains(&day) {
            break;
        }
        streak += 1;
        check = day.pred_opt();
    }
    streak
}

/// Longest run of consecutive donation days anywhere in the history.
pub fn best_streak<I>(dates: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();
    if days.is_empty() {
        return 0;
    }

    let mut best = 1u32;
    let mut current = 1u32;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        if let Some(p) = prev {
            if p.succ_opt() == Some(day) {
                current += 1;
            } else {
                current = 1;
            }
            best = best.max(current);
        }
        prev = Some(day);
    }
    best
}
