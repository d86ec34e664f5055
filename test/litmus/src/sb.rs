// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Store buffering (Dekker).
//!
//! In round `r` one side stores `x = r` and then loads `y`; the other stores
//! `y = r` and then loads `x`. If both loads return something older than `r`,
//! both stores were still sitting in store buffers when the loads ran. Only
//! a StoreLoad barrier rules that out, on every architecture we support.

use crate::lockstep::both_sides;
use crate::{Discipline, Report, Test};
use std::sync::atomic::Ordering::Relaxed;

pub fn store_buffering<D: Discipline>(rounds: u64) -> Report {
    log::info!(
        "store buffering: {rounds} rounds, {} discipline, {} backend",
        D::NAME,
        order_access::ACTIVE.name,
    );

    let violations = both_sides(Test::StoreBuffering, rounds, |mine, theirs, r| {
        mine.0.store(r, Relaxed);
        D::store_then_load();
        theirs.0.load(Relaxed) < r
    });

    let report = Report {
        test: Test::StoreBuffering,
        discipline: D::NAME,
        backend: order_access::ACTIVE.name,
        trials: rounds,
        observations: rounds,
        violations,
        expectation: D::expectation(Test::StoreBuffering),
    };
    log::info!("{report}");
    report
}
