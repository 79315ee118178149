//! Gap Discovery (空闲时段发现)
//!
//! Computes the free intervals of a single table within the service bounds,
//! given its confirmed bookings, and intersects gap lists across tables for
//! combination seating.

use chrono::{DateTime, Utc};

use crate::domain::Booking;

/// A free interval on a table's timeline. Half-open: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Gap {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Free intervals of one table within `bounds`, given its bookings.
///
/// Only confirmed bookings occupy time. Sentinel intervals pin the scan to
/// the bounds so the leading and trailing gaps fall out of the same
/// adjacent-pair walk as the interior ones.
pub fn find_gaps(bookings: &[Booking], bounds: Gap) -> Vec<Gap> {
    let mut occupied: Vec<(DateTime<Utc>, DateTime<Utc>)> = bookings
        .iter()
        .filter(|b| b.is_confirmed())
        .map(|b| (b.interval.start(), b.interval.end()))
        .collect();
    occupied.sort_by_key(|(start, _)| *start);

    let mut timeline = Vec::with_capacity(occupied.len() + 2);
    timeline.push((DateTime::<Utc>::MIN_UTC, bounds.start));
    timeline.extend(occupied);
    timeline.push((bounds.end, DateTime::<Utc>::MAX_UTC));

    timeline
        .windows(2)
        .filter_map(|pair| {
            let (_, prev_end) = pair[0];
            let (next_start, _) = pair[1];
            (prev_end < next_start).then(|| Gap::new(prev_end, next_start))
        })
        .filter(|gap| gap.start >= bounds.start && gap.end <= bounds.end)
        .collect()
}

/// Intersection of two gaps, if non-empty
pub fn intersect(a: Gap, b: Gap) -> Option<Gap> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    (start < end).then(|| Gap::new(start, end))
}

/// Intervals where every table in the set is simultaneously free.
///
/// Pairwise left-fold: intersect the accumulated list with each next table's
/// gaps. Short-circuits to empty as soon as any step produces nothing.
pub fn intersect_all(gap_lists: &[Vec<Gap>]) -> Vec<Gap> {
    let Some((first, rest)) = gap_lists.split_first() else {
        return Vec::new();
    };

    let mut acc = first.clone();
    for gaps in rest {
        acc = acc
            .iter()
            .flat_map(|a| gaps.iter().filter_map(|b| intersect(*a, *b)))
            .collect();
        if acc.is_empty() {
            return acc;
        }
    }
    acc
}
