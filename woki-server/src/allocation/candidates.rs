//! Candidate Generation (候选方案生成)
//!
//! Enumerates every single-table and table-combination seating that could
//! host a party, with a 15-minute start grid inside each free gap, and scores
//! each candidate by how tightly it uses capacity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::allocation::gaps::{Gap, intersect_all};
use crate::domain::{CapacityRange, DiningTable, Duration, SLOT_MINUTES};

/// Default cap on tables per combination. Larger joins are rarely physically
/// adjacent and blow up the subset enumeration.
pub const DEFAULT_MAX_COMBO_TABLES: usize = 4;

/// One table or a joined set of tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seating {
    Single { table_id: String },
    Combo { table_ids: Vec<String> },
}

impl Seating {
    pub fn table_ids(&self) -> &[String] {
        match self {
            Seating::Single { table_id } => std::slice::from_ref(table_id),
            Seating::Combo { table_ids } => table_ids,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Seating::Single { .. })
    }

    pub fn table_count(&self) -> usize {
        self.table_ids().len()
    }
}

/// A concrete seating proposal: who sits where, when, and how good it is
#[derive(Debug, Clone)]
pub struct Candidate {
    pub seating: Seating,
    pub capacity: CapacityRange,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub score: f64,
}

/// Enumerates and scores seating candidates
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator {
    max_combo_tables: usize,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMBO_TABLES)
    }
}

impl CandidateGenerator {
    pub fn new(max_combo_tables: usize) -> Self {
        Self {
            max_combo_tables: max_combo_tables.max(2),
        }
    }

    /// All feasible candidates for `party_size` across `tables`, given each
    /// table's free gaps.
    pub fn generate(
        &self,
        tables: &[DiningTable],
        gaps_by_table: &HashMap<String, Vec<Gap>>,
        party_size: u32,
        duration: Duration,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        // 单桌 first
        for table in tables {
            if !table.accommodates(party_size) {
                continue;
            }
            let Some(gaps) = gaps_by_table.get(&table.id) else {
                continue;
            };
            for gap in gaps {
                for start in slots_in_gap(*gap, duration) {
                    let seating = Seating::Single {
                        table_id: table.id.clone(),
                    };
                    candidates.push(self.candidate(seating, table.capacity, start, duration, party_size));
                }
            }
        }

        // 拼桌: subsets of size 2..=max
        let max_size = self.max_combo_tables.min(tables.len());
        for size in 2..=max_size {
            let mut combo = Vec::with_capacity(size);
            combinations(tables, size, 0, &mut combo, &mut |combo| {
                let capacity = combo
                    .iter()
                    .skip(1)
                    .fold(combo[0].capacity, |acc, t| acc.merge(&t.capacity));
                if !capacity.accommodates(party_size) {
                    return;
                }
                let gap_lists: Vec<Vec<Gap>> = combo
                    .iter()
                    .map(|t| gaps_by_table.get(&t.id).cloned().unwrap_or_default())
                    .collect();
                let mut table_ids: Vec<String> = combo.iter().map(|t| t.id.clone()).collect();
                table_ids.sort();
                for gap in intersect_all(&gap_lists) {
                    for start in slots_in_gap(gap, duration) {
                        let seating = Seating::Combo {
                            table_ids: table_ids.clone(),
                        };
                        candidates.push(self.candidate(seating, capacity, start, duration, party_size));
                    }
                }
            });
        }

        candidates
    }

    fn candidate(
        &self,
        seating: Seating,
        capacity: CapacityRange,
        start: DateTime<Utc>,
        duration: Duration,
        party_size: u32,
    ) -> Candidate {
        let score = score(&seating, capacity, party_size);
        Candidate {
            seating,
            capacity,
            start,
            end: duration.add_to(start),
            score,
        }
    }
}

/// Seat-utilization score; higher is tighter.
///
/// utilization×50, +20 for a single table, +30 for a perfect max-capacity fit.
fn score(seating: &Seating, capacity: CapacityRange, party_size: u32) -> f64 {
    let utilization = party_size as f64 / capacity.max() as f64;
    let mut score = utilization * 50.0;
    if seating.is_single() {
        score += 20.0;
    }
    if party_size == capacity.max() {
        score += 30.0;
    }
    score
}

/// Start instants on the 15-minute grid such that `[start, start+duration)`
/// fits inside `gap`. The gap's own start is aligned by construction.
fn slots_in_gap(gap: Gap, duration: Duration) -> Vec<DateTime<Utc>> {
    let mut starts = Vec::new();
    let mut start = gap.start;
    while duration.add_to(start) <= gap.end {
        starts.push(start);
        start += chrono::Duration::minutes(SLOT_MINUTES as i64);
    }
    starts
}

fn combinations<'a>(
    tables: &'a [DiningTable],
    size: usize,
    from: usize,
    current: &mut Vec<&'a DiningTable>,
    emit: &mut impl FnMut(&[&'a DiningTable]),
) {
    if current.len() == size {
        emit(current);
        return;
    }
    for i in from..tables.len() {
        current.push(&tables[i]);
        combinations(tables, size, i + 1, current, emit);
        current.pop();
    }
}
