//! Active-window tracking for the sweep-line resolver
//!
//! Each window set is built once per call from its rule list and advanced
//! monotonically by transaction date. Admission walks a start-sorted array,
//! eviction is lazy: expired rules drop out as the sweep pointer passes
//! their end. No structure allocates after construction.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::periods::{EvalPeriod, ExtraPeriod, FixedPeriod};

/// Active Q rules. Exposes the rule with the latest start among those
/// covering the sweep date; ties resolve to the lowest declaration index.
pub struct FixedWindow<'a> {
    /// Rules sorted by (start asc, declaration index desc)
    sorted: Vec<(&'a FixedPeriod, usize)>,
    admit: usize,
    /// Admitted candidates; pushes keep the stack ordered by
    /// (start, lowest-index-last), so the top is always the current winner
    /// once expired entries are popped.
    active: Vec<(&'a FixedPeriod, usize)>,
}

impl<'a> FixedWindow<'a> {
    pub fn new(rules: &'a [FixedPeriod]) -> Self {
        let mut sorted: Vec<_> = rules.iter().enumerate().map(|(i, r)| (r, i)).collect();
        sorted.sort_by(|(a, ai), (b, bi)| a.start.cmp(&b.start).then(bi.cmp(ai)));
        Self {
            sorted,
            admit: 0,
            active: Vec::with_capacity(rules.len()),
        }
    }

    /// Advance the sweep pointer to `now`, then return the winning rule's
    /// fixed value, if any rule is active.
    pub fn advance(&mut self, now: NaiveDateTime) -> Option<Decimal> {
        while self.admit < self.sorted.len() && self.sorted[self.admit].0.start <= now {
            self.active.push(self.sorted[self.admit]);
            self.admit += 1;
        }
        while let Some((top, _)) = self.active.last() {
            if top.end < now {
                self.active.pop();
            } else {
                break;
            }
        }
        self.active.last().map(|(rule, _)| rule.fixed)
    }
}

/// Active P rules: a running sum of `extra` over the rules covering the
/// sweep date.
pub struct ExtraWindow<'a> {
    by_start: Vec<&'a ExtraPeriod>,
    by_end: Vec<&'a ExtraPeriod>,
    admit: usize,
    evict: usize,
    active_extra: Decimal,
}

impl<'a> ExtraWindow<'a> {
    pub fn new(rules: &'a [ExtraPeriod]) -> Self {
        let mut by_start: Vec<_> = rules.iter().collect();
        by_start.sort_by_key(|r| r.start);
        let mut by_end: Vec<_> = rules.iter().collect();
        by_end.sort_by_key(|r| r.end);
        Self {
            by_start,
            by_end,
            admit: 0,
            evict: 0,
            active_extra: Decimal::ZERO,
        }
    }

    /// Advance to `now` and return the sum of active extras.
    pub fn advance(&mut self, now: NaiveDateTime) -> Decimal {
        while self.admit < self.by_start.len() && self.by_start[self.admit].start <= now {
            self.active_extra += self.by_start[self.admit].extra;
            self.admit += 1;
        }
        while self.evict < self.by_end.len() && self.by_end[self.evict].end < now {
            self.active_extra -= self.by_end[self.evict].extra;
            self.evict += 1;
        }
        self.active_extra
    }
}

/// Active K rules: only the count matters.
pub struct EvalWindow<'a> {
    by_start: Vec<&'a EvalPeriod>,
    by_end: Vec<&'a EvalPeriod>,
    admit: usize,
    evict: usize,
}

impl<'a> EvalWindow<'a> {
    pub fn new(rules: &'a [EvalPeriod]) -> Self {
        let mut by_start: Vec<_> = rules.iter().collect();
        by_start.sort_by_key(|r| r.start);
        let mut by_end: Vec<_> = rules.iter().collect();
        by_end.sort_by_key(|r| r.end);
        Self {
            by_start,
            by_end,
            admit: 0,
            evict: 0,
        }
    }

    /// Advance to `now` and return the number of active K rules.
    pub fn advance(&mut self, now: NaiveDateTime) -> usize {
        while self.admit < self.by_start.len() && self.by_start[self.admit].start <= now {
            self.admit += 1;
        }
        while self.evict < self.by_end.len() && self.by_end[self.evict].end < now {
            self.evict += 1;
        }
        self.admit - self.evict
    }
}
