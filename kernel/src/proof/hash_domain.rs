//! Typed domain separators for canonical hashing.
//!
//! Every digest selects a domain via [`HashDomain`], so a world digest can
//! never collide with a trace digest over the same bytes. Adding a domain is
//! a single change here: the enum, `as_bytes()`, `ALL`, and `Display` are
//! generated from one macro invocation.

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    /// Canonical world projection (grid, costs, hazards, effects).
    World => b"STARPATH::WORLD::V1\0",

    /// Search policy snapshot.
    Policy => b"STARPATH::SEARCH_POLICY::V1\0",

    /// A single completed path trace.
    Trace => b"STARPATH::PATH_TRACE::V1\0",

    /// A full solve report (world + policy + outcome).
    Report => b"STARPATH::SOLVE_REPORT::V1\0",
}
