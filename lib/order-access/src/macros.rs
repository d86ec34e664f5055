// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Backends are written with these two macros so that what a descriptor says
//! an operation emits and what the operation really emits come from the same
//! tokens.

/// Declares instruction sequences.
///
/// Each entry becomes an uninhabited type with a `SEQUENCE` constant built
/// from the instruction text, and an `emit()` that runs that same text through
/// `asm!`. `emit()` only exists where the `on(...)` predicate holds, since the
/// text is only meaningful to one assembler; `SEQUENCE` exists everywhere so
/// every backend can be checked from any host.
///
/// `nomem` is never passed: the asm block doubles as a compiler barrier for
/// the memory accesses around it.
macro_rules! sequence {
    ($(
        $(#[$doc:meta])*
        pub $ty:ident = $asm:literal => $orders:expr,
            on($($arch:tt)*), options($($opt:ident),*);
    )*) => {$(
        $(#[$doc])*
        pub enum $ty {}

        impl $ty {
            pub const SEQUENCE: $crate::Sequence =
                $crate::Sequence::new($asm, $orders);

            #[cfg($($arch)*)]
            #[inline(always)]
            pub fn emit() {
                // Safety: barrier and synchronization instructions change no
                // state the compiler relies on, beyond what `options` admits.
                unsafe {
                    core::arch::asm!($asm, options($($opt),*));
                }
                $crate::compiler_barrier();
            }
        }
    )*};
}

/// Binds each operation to a sequence type, producing both the backend's
/// `BACKEND` descriptor and, on matching targets, its [`OrderAccess`]
/// implementation.
///
/// The `#[cfg]` naming the targets comes first. Both the descriptor struct
/// and the trait have one slot per operation, so leaving one out fails to
/// compile either way.
///
/// [`OrderAccess`]: crate::OrderAccess
macro_rules! backend {
    (
        #[cfg($($arch:tt)*)]
        $(#[$doc:meta])*
        pub enum $ty:ident {
            name: $name:literal,
            arch: $archs:expr,
            model: $model:expr,
            $($op:ident: $seq:ty,)*
        }
    ) => {
        pub const BACKEND: $crate::Backend = $crate::Backend {
            name: $name,
            arch: $archs,
            model: $model,
            $($op: <$seq>::SEQUENCE,)*
        };

        $(#[$doc])*
        #[cfg($($arch)*)]
        pub enum $ty {}

        #[cfg($($arch)*)]
        impl $crate::OrderAccess for $ty {
            const BACKEND: &'static $crate::Backend = &BACKEND;

            $(
                #[inline(always)]
                fn $op() {
                    <$seq>::emit();
                }
            )*
        }
    };
}
