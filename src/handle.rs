// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Typed 32-bit indices into the arenas used by the mesh and the sweep.

use crate::pool::PoolKey;

macro_rules! make_handle_type {
    ($(#[$attr:meta])* $name:ident, $short:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline(always)]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            #[inline(always)]
            pub const fn idx(self) -> usize {
                self.0 as usize
            }
        }

        impl PoolKey for $name {
            #[inline(always)]
            fn from_index(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize);
                $name(index as u32)
            }

            #[inline(always)]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}{}", $short, self.0)
            }
        }
    };
}

make_handle_type!(
    /// A mesh vertex.
    VertId,
    "V"
);
make_handle_type!(
    /// A mesh face.
    FaceId,
    "F"
);
make_handle_type!(
    /// One half of an edge pair. `e` and `e.sym()` differ only in the low bit.
    EdgeId,
    "E"
);
make_handle_type!(
    /// An active region of the sweep.
    RegionId,
    "R"
);
make_handle_type!(
    /// A node of the edge dictionary.
    NodeId,
    "N"
);
make_handle_type!(
    /// A slot in the event queue.
    PqHandle,
    "Q"
);

impl EdgeId {
    /// The oppositely oriented half of the same edge.
    #[inline(always)]
    pub const fn sym(self) -> EdgeId {
        EdgeId(self.0 ^ 1)
    }

    /// The even half of the pair; the global edge list links only these.
    #[inline(always)]
    pub const fn primary(self) -> EdgeId {
        EdgeId(self.0 & !1)
    }
}
