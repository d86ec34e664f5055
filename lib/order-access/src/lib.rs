// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mostly-portable memory ordering operations.
//!
//! This crate provides the eight ordering operations that a runtime's
//! concurrent machinery (collector safepoints, monitors, patched code) uses
//! at its synchronization points:
//!
//! | Operation | Guarantee |
//! |---|---|
//! | [`load_load`] | earlier loads complete before later loads |
//! | [`store_store`] | earlier stores are visible before later stores |
//! | [`load_store`] | earlier loads complete before later stores are visible |
//! | [`store_load`] | earlier stores are visible before later loads complete |
//! | [`acquire`] | nothing after it moves before it |
//! | [`release`] | nothing before it moves after it |
//! | [`fence`] | all of the pairwise orderings at once |
//! | [`cross_modify_fence`] | instructions after it are refetched from memory |
//!
//! Each one is a fixed, non-blocking instruction sequence chosen when the
//! crate is compiled. The architecture picks a backend (see [`Active`]); there
//! is no runtime selection and no indirection at the call site.
//!
//! If you're trying to reason about the ordering of _atomic_ memory accesses
//! within Rust's own memory model, you probably want
//! `core::sync::atomic::fence` instead. This crate describes orderings in
//! terms of what the processor does, which is what code shared with generated
//! or patched machine code has to reason about.
//!
//! # Patching code
//!
//! Whoever writes to executable memory must call [`cross_modify_fence`] after
//! the write and then publish the change with [`release`]. Any core that is
//! going to run the new code must observe the publication with [`acquire`]
//! and then call [`cross_modify_fence`] itself before jumping to it. Nothing
//! checks this; getting it wrong runs stale or torn instructions.
//!
//! # What this does not do
//!
//! These operations never provide mutual exclusion or atomic
//! read-modify-write. Locks and counters are built on top.

#![cfg_attr(not(test), no_std)]

use core::sync::atomic::{compiler_fence, Ordering};
use static_assertions::const_assert;

#[macro_use]
mod macros;
mod contract;

pub mod aarch64;
pub mod arm;
pub mod riscv;
pub mod x86;

pub use contract::{
    Backend, MemoryModel, Operation, Orders, Sequence, Violation,
};

/// The ordering contract, implemented once per architecture.
///
/// Every function is required, so a backend that leaves one out fails to
/// compile.
pub trait OrderAccess {
    /// The description of what each function below emits.
    const BACKEND: &'static Backend;

    fn load_load();
    fn store_store();
    fn load_store();
    fn store_load();
    fn acquire();
    fn release();
    fn fence();
    fn cross_modify_fence();
}

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        /// The backend for the architecture we are being compiled for.
        pub type Active = x86::X86;
    } else if #[cfg(target_arch = "aarch64")] {
        /// The backend for the architecture we are being compiled for.
        pub type Active = aarch64::Aarch64;
    } else if #[cfg(target_arch = "arm")] {
        /// The backend for the architecture we are being compiled for.
        pub type Active = arm::Arm;
    } else if #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))] {
        /// The backend for the architecture we are being compiled for.
        pub type Active = riscv::Riscv;
    } else {
        compile_error!("memory ordering operations are not defined for this target yet");
    }
}

/// Description of the backend in use.
pub const ACTIVE: &Backend = <Active as OrderAccess>::BACKEND;

/// Every backend this crate knows about, whichever one is active.
pub const BACKENDS: &[&Backend] = &[
    &x86::BACKEND,
    &aarch64::BACKEND,
    &arm::BACKEND,
    &riscv::BACKEND,
];

const_assert!(x86::BACKEND.is_sound());
const_assert!(aarch64::BACKEND.is_sound());
const_assert!(arm::BACKEND.is_sound());
const_assert!(riscv::BACKEND.is_sound());

/// Keeps the compiler from moving, caching or eliminating memory accesses
/// across this point. Emits nothing.
///
/// This is enough on its own only for orderings the hardware already keeps.
#[inline(always)]
pub fn compiler_barrier() {
    compiler_fence(Ordering::SeqCst);
}

/// The compiler barrier as a sequence, for backends whose hardware already
/// keeps an ordering.
pub enum Guard {}

impl Guard {
    pub const SEQUENCE: Sequence = Sequence::GUARD;

    #[inline(always)]
    pub fn emit() {
        compiler_barrier();
    }
}

/// Ensure that the data for any loads _before_ the barrier is accessed before
/// any loads _after_ the barrier are performed.
#[inline(always)]
pub fn load_load() {
    <Active as OrderAccess>::load_load();
}

/// Ensure that the data written by any stores _before_ the barrier is made
/// visible before the data written by any store _after_ the barrier.
#[inline(always)]
pub fn store_store() {
    <Active as OrderAccess>::store_store();
}

/// Ensure that the data for any loads _before_ the barrier is accessed before
/// any store _after_ the barrier becomes visible.
#[inline(always)]
pub fn load_store() {
    <Active as OrderAccess>::load_store();
}

/// Ensure that the data written by any stores _before_ the barrier is made
/// visible before the data for any load _after_ the barrier is accessed.
///
/// This ensures that loads after the barrier are not simply served from a
/// "store buffer" bypassing the memory subsystem. It is the most expensive of
/// the pairwise barriers.
#[inline(always)]
pub fn store_load() {
    <Active as OrderAccess>::store_load();
}

/// No memory access after this may be performed before it.
///
/// Pairs with a [`release`] on another core: once this core has observed a
/// store that followed that release, everything written before the release
/// is visible here.
#[inline(always)]
pub fn acquire() {
    <Active as OrderAccess>::acquire();
}

/// No memory access before this may be performed after it.
#[inline(always)]
pub fn release() {
    <Active as OrderAccess>::release();
}

/// Full two-way barrier, at least as strong as each of the pairwise ones.
#[inline(always)]
pub fn fence() {
    <Active as OrderAccess>::fence();
}

/// Discards any instructions this core has already fetched or decoded, so
/// that what runs next is read from memory.
///
/// See the crate docs for the protocol around patched code.
#[inline(always)]
pub fn cross_modify_fence() {
    <Active as OrderAccess>::cross_modify_fence();
}
