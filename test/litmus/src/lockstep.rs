// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two threads running the same round body in lockstep.
//!
//! Every round starts with both threads meeting at a counting barrier, so
//! their accesses race as closely as the scheduler allows. A round body
//! returns whether its side saw the outcome being hunted for; a violation is
//! a round in which both sides did.
//!
//! The spawned side leaves its verdict for round `r` in slot `r % 2`. The
//! main side reads it after the barrier that opens round `r + 1`. The spawned
//! side cannot write that slot again until round `r + 2`, whose barrier the
//! main side only reaches once it has read it.

use crate::{spin_until, Line, Test, PROGRESS_STEPS};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Runs `round(mine, theirs, r)` on both sides for `r` in `1..=rounds` and
/// returns the number of rounds in which both returned true.
pub(crate) fn both_sides<F>(test: Test, rounds: u64, round: F) -> u64
where
    F: Fn(&Line, &Line, u64) -> bool + Sync,
{
    let x = Line::default();
    let y = Line::default();
    let arrivals = AtomicU64::new(0);
    let verdicts = [AtomicBool::new(false), AtomicBool::new(false)];
    let step = (rounds / PROGRESS_STEPS).max(1);

    let arrive = |r: u64| {
        arrivals.fetch_add(1, Ordering::AcqRel);
        spin_until(|| arrivals.load(Ordering::Acquire) >= 2 * r);
    };
    let slot = |r: u64| &verdicts[(r % 2) as usize];

    std::thread::scope(|s| {
        s.spawn(|| {
            for r in 1..=rounds {
                arrive(r);
                slot(r).store(round(&y, &x, r), Ordering::Relaxed);
            }
            arrive(rounds + 1);
        });

        let mut violations = 0u64;
        let mut mine = false;
        // One extra meeting collects the spawned side's last verdict.
        for r in 1..=rounds + 1 {
            arrive(r);
            if r > 1 {
                let prev = r - 1;
                if mine && slot(prev).load(Ordering::Relaxed) {
                    violations += 1;
                    if violations == 1 {
                        log::warn!("{}: both sides hit in round {prev}", test.name());
                    }
                }
                if prev % step == 0 {
                    log::debug!("{}: checked {prev}/{rounds}", test.name());
                }
            }
            if r <= rounds {
                mine = round(&x, &y, r);
            }
        }
        violations
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_rounds_where_both_sides_hit() {
        // Both sides hit on even rounds only.
        let n = both_sides(Test::StoreBuffering, 101, |_, _, r| r % 2 == 0);
        assert_eq!(n, 50);
    }

    #[test]
    fn one_sided_hits_are_not_violations() {
        // Rounds do not overlap, so exactly one side takes each even ticket.
        let tickets = AtomicU64::new(0);
        let n = both_sides(Test::LoadBuffering, 100, |_, _, _| {
            tickets.fetch_add(1, Ordering::Relaxed) % 2 == 0
        });
        assert_eq!(n, 0);
        assert_eq!(tickets.into_inner(), 200);
    }

    #[test]
    fn zero_rounds_returns() {
        assert_eq!(both_sides(Test::StoreBuffering, 0, |_, _, _| true), 0);
    }
}
