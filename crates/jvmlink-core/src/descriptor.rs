//! Reflective member descriptors produced by bridge enumeration.

use crate::Modifiers;

/// A declared field or method of a resolved foreign class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// The member's declared name.
    pub name: String,
    /// The member's modifier bitmask.
    pub modifiers: Modifiers,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            modifiers,
        }
    }

    /// True when this member belongs on a class proxy (public static).
    pub fn is_mirrored(&self) -> bool {
        self.modifiers.is_public_static()
    }
}

/// A declared nested class of a resolved foreign class.
///
/// Carries both names the proxy builder needs: the simple name under
/// which the member is mirrored on the parent proxy, and the fully
/// qualified name used to recursively import it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedClassDescriptor {
    /// Simple name within the enclosing class.
    pub simple_name: String,
    /// Fully qualified (binary) name.
    pub qualified_name: String,
    /// The nested class's modifier bitmask.
    pub modifiers: Modifiers,
}

impl NestedClassDescriptor {
    pub fn new(
        simple_name: impl Into<String>,
        qualified_name: impl Into<String>,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            simple_name: simple_name.into(),
            qualified_name: qualified_name.into(),
            modifiers,
        }
    }

    /// True when this nested class belongs on a class proxy.
    pub fn is_mirrored(&self) -> bool {
        self.modifiers.is_public_static()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_gate_requires_public_and_static() {
        let m = MemberDescriptor::new("MAX_VALUE", Modifiers::PUBLIC | Modifiers::STATIC);
        assert!(m.is_mirrored());

        let m = MemberDescriptor::new("serialVersionUID", Modifiers::PRIVATE | Modifiers::STATIC);
        assert!(!m.is_mirrored());

        let m = MemberDescriptor::new("length", Modifiers::PUBLIC);
        assert!(!m.is_mirrored());
    }

    #[test]
    fn nested_descriptor_names() {
        let n = NestedClassDescriptor::new(
            "Entry",
            "java.util.Map$Entry",
            Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::INTERFACE,
        );
        assert!(n.is_mirrored());
        assert_eq!(n.simple_name, "Entry");
        assert_eq!(n.qualified_name, "java.util.Map$Entry");
    }
}
