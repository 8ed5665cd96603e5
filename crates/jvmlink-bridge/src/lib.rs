//! Bridge capability surface consumed by jvmlink.
//!
//! The native binding that embeds the foreign runtime and marshals values
//! is an external collaborator. This crate specifies exactly what jvmlink
//! consumes from it, as the object-safe [`Bridge`] trait, and ships an
//! instrumented in-memory implementation ([`fake::FakeJvm`]) for tests
//! and examples.
//!
//! Blocking operations return synchronously on the host thread. The
//! `_cb` forms complete through an error-first callback delivered on a
//! later scheduler turn, never from within the caller's frame. Promise
//! forms are not part of the bridge: the calling-convention resolver in
//! the root crate derives them from the `_cb` forms.

pub mod fake;

use jvmlink_core::{
    BridgeError, InstanceRef, MemberDescriptor, NestedClassDescriptor, Value, ValueCallback,
};

/// Opaque handle to a resolved foreign class.
///
/// Attached to every class proxy as an inspectable property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHandle {
    qualified_name: String,
    simple_name: String,
}

impl ClassHandle {
    /// Create a handle. Called by bridge implementations.
    pub fn new(qualified_name: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            simple_name: simple_name.into(),
        }
    }

    /// Fully qualified (binary) name, e.g. `java.util.Map$Entry`.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Simple name, e.g. `Entry`.
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }
}

/// The native bridge into the foreign runtime.
///
/// One instance serves one foreign runtime; creating the runtime is a
/// one-shot side effect. Overload selection among same-named methods is
/// entirely the bridge's concern: every call-shaped operation takes the
/// bare method name and the marshalled arguments.
pub trait Bridge {
    /// Instantiate the foreign runtime. Blocking; called for its side
    /// effect only.
    fn create_runtime(&self) -> Result<(), BridgeError>;

    /// Resolve a foreign class by fully qualified name.
    fn find_class(&self, qualified_name: &str) -> Result<ClassHandle, BridgeError>;

    /// Enumerate the class's declared fields, with name and modifiers.
    fn declared_fields(&self, class: &ClassHandle) -> Result<Vec<MemberDescriptor>, BridgeError>;

    /// Enumerate the class's declared methods, with name and modifiers.
    /// Overloads appear once per declaration.
    fn declared_methods(&self, class: &ClassHandle) -> Result<Vec<MemberDescriptor>, BridgeError>;

    /// Enumerate the class's declared nested classes.
    fn declared_classes(
        &self,
        class: &ClassHandle,
    ) -> Result<Vec<NestedClassDescriptor>, BridgeError>;

    /// Read a static field. Every call is a fresh round-trip into the
    /// foreign runtime.
    fn get_static_field(&self, class: &str, field: &str) -> Result<Value, BridgeError>;

    /// Write a static field.
    fn set_static_field(&self, class: &str, field: &str, value: Value) -> Result<(), BridgeError>;

    /// Call a static method, blocking.
    fn call_static(&self, class: &str, method: &str, args: &[Value]) -> Result<Value, BridgeError>;

    /// Call a static method, completing through `callback` on a later
    /// turn.
    fn call_static_cb(&self, class: &str, method: &str, args: Vec<Value>, callback: ValueCallback);

    /// Construct a new foreign instance, blocking. Constructor overload
    /// selection is the bridge's concern.
    fn new_instance(&self, class: &str, args: &[Value]) -> Result<Value, BridgeError>;

    /// Construct a new foreign instance, completing through `callback`
    /// on a later turn.
    fn new_instance_cb(&self, class: &str, args: Vec<Value>, callback: ValueCallback);

    /// Call an instance method, blocking.
    fn call_method(
        &self,
        instance: &InstanceRef,
        method: &str,
        args: &[Value],
    ) -> Result<Value, BridgeError>;

    /// Call an instance method, completing through `callback` on a later
    /// turn.
    fn call_method_cb(
        &self,
        instance: &InstanceRef,
        method: &str,
        args: Vec<Value>,
        callback: ValueCallback,
    );
}
