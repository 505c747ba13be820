//! Cell storage
//!
//! All cells of all lists share one pool owned by the
//! [`Slip`](crate::Slip) context.

mod allocator;

pub use allocator::CellArena;

/// Pool counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaStats {
    /// Cells currently handed out
    pub live: usize,

    /// Maximum `live` seen so far
    pub high_water: usize,

    /// Reserved slots
    pub capacity: usize,

    /// Slots waiting on the free list
    pub free_slots: usize,

    /// Lifetime allocations
    pub allocated_total: u64,

    /// Lifetime releases
    pub released_total: u64,
}

impl ArenaStats {
    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Live cells: {} (high water {})\nSlots: {} reserved, {} free\nLifetime: {} allocated, {} released",
            self.live,
            self.high_water,
            self.capacity,
            self.free_slots,
            self.allocated_total,
            self.released_total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_mentions_counters() {
        let stats = ArenaStats {
            live: 3,
            high_water: 5,
            capacity: 8,
            free_slots: 2,
            allocated_total: 5,
            released_total: 2,
        };
        let report = stats.report();
        assert!(report.contains("Live cells: 3 (high water 5)"));
        assert!(report.contains("5 allocated, 2 released"));
    }
}
