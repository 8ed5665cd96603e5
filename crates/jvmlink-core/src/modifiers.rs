//! JVM reflection modifier bitmask.
//!
//! The bridge reports each declared member's modifiers as the raw bitmask
//! defined by `java.lang.reflect.Modifier`. Only the PUBLIC and STATIC
//! bits gate mirroring; the rest are carried for introspection.

use bitflags::bitflags;

bitflags! {
    /// Modifier bits of a foreign class member, as reported by the bridge.
    ///
    /// Bit values match `java.lang.reflect.Modifier`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PUBLIC       = 0x0001;
        const PRIVATE      = 0x0002;
        const PROTECTED    = 0x0004;
        const STATIC       = 0x0008;
        const FINAL        = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const VOLATILE     = 0x0040;
        const TRANSIENT    = 0x0080;
        const NATIVE       = 0x0100;
        const INTERFACE    = 0x0200;
        const ABSTRACT     = 0x0400;
    }
}

impl Modifiers {
    /// Build from a raw bitmask, dropping any bits this layer does not
    /// recognize. Foreign runtimes are free to set synthetic bits beyond
    /// the recognized set.
    pub fn from_raw(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }

    /// True when the PUBLIC bit is set.
    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    /// True when the STATIC bit is set.
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// True when both PUBLIC and STATIC are set. Only such members are
    /// mirrored onto a class proxy.
    pub fn is_public_static(self) -> bool {
        self.contains(Self::PUBLIC | Self::STATIC)
    }
}
