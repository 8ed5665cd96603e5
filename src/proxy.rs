//! Reflection-driven class proxies.
//!
//! `import` resolves a foreign class through the bridge, enumerates its
//! declared members, and assembles a [`ClassProxy`] mirroring the public
//! static surface: a uniform construction entry point, live field
//! accessors, per-method call variants, and lazily resolved nested
//! classes.
//!
//! Member installation is a name-keyed table with one generic lookup
//! entry point ([`ClassProxy::member`]) plus dedicated accessors per
//! member kind. Call variants are an explicit record per method selected
//! by the caller's [`CallConvention`], never by concatenating suffixes
//! into member names; the suffix-derived surface names remain available
//! through [`ClassProxy::accessor_name`] for callers that want them.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use jvmlink_core::{CallbackOp, JvmError, Promise, ProxyError, Value, ValueCallback};

use jvmlink_bridge::{Bridge, ClassHandle};

use crate::convention::{CallConvention, Conventions};

/// One mirrored static method: overloads collapse into a single entry,
/// and overload selection among them is delegated entirely to the bridge
/// at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MethodMirror {
    overloads: usize,
}

/// Classification of a mirrored member, returned by the generic lookup
/// entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// A public static field with a live accessor pair.
    StaticField {
        name: String,
    },
    /// A public static method with 1-3 call variants.
    StaticMethod {
        name: String,
        /// Number of declared overloads sharing this name.
        overloads: usize,
    },
    /// A public static nested class, resolved lazily.
    NestedClass {
        simple_name: String,
        qualified_name: String,
    },
}

/// A local proxy over one foreign class's public static surface.
///
/// Built synchronously by `import`; no partially built proxy is ever
/// observable. Two imports of the same class name yield independent
/// proxies; only nested-class resolution within one proxy is memoized.
pub struct ClassProxy {
    class_name: String,
    class: ClassHandle,
    bridge: Rc<dyn Bridge>,
    conventions: Rc<Conventions>,
    fields: FxHashSet<String>,
    methods: FxHashMap<String, MethodMirror>,
    nested: FxHashMap<String, String>,
    nested_cache: RefCell<FxHashMap<String, Rc<ClassProxy>>>,
}

impl std::fmt::Debug for ClassProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassProxy")
            .field("class_name", &self.class_name)
            .field("class", &self.class)
            .field("conventions", &self.conventions)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("nested", &self.nested)
            .field("nested_cache", &self.nested_cache)
            .finish_non_exhaustive()
    }
}

/// Resolve `class_name` and assemble its proxy.
///
/// Issues one bridge call to resolve the class and one per member
/// category to enumerate; each enumerated descriptor already carries
/// name and modifiers. Unresolvable names and enumeration failures
/// propagate verbatim.
pub(crate) fn build(
    bridge: Rc<dyn Bridge>,
    conventions: Rc<Conventions>,
    class_name: &str,
) -> Result<ClassProxy, JvmError> {
    let class = bridge.find_class(class_name)?;
    log::trace!("importing {class_name}");

    let mut fields = FxHashSet::default();
    for descriptor in bridge.declared_fields(&class)? {
        if descriptor.is_mirrored() {
            fields.insert(descriptor.name);
        }
    }

    let mut methods: FxHashMap<String, MethodMirror> = FxHashMap::default();
    for descriptor in bridge.declared_methods(&class)? {
        if descriptor.is_mirrored() {
            methods
                .entry(descriptor.name)
                .or_insert(MethodMirror { overloads: 0 })
                .overloads += 1;
        }
    }

    let mut nested = FxHashMap::default();
    for descriptor in bridge.declared_classes(&class)? {
        if descriptor.is_mirrored() {
            nested.insert(descriptor.simple_name, descriptor.qualified_name);
        }
    }

    Ok(ClassProxy {
        class_name: class_name.to_string(),
        class,
        bridge,
        conventions,
        fields,
        methods,
        nested,
        nested_cache: RefCell::new(FxHashMap::default()),
    })
}

impl ClassProxy {
    /// The imported class's fully qualified name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The resolved class handle.
    pub fn class(&self) -> &ClassHandle {
        &self.class
    }

    /// The conventions snapshot this proxy was built with.
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Uniform construction entry point: build a new foreign instance
    /// with these arguments, independent of the class's declared
    /// constructors. Blocking; constructor overload selection is the
    /// bridge's concern.
    pub fn new_instance(&self, args: &[Value]) -> Result<Value, JvmError> {
        Ok(self.bridge.new_instance(&self.class_name, args)?)
    }

    /// Generic lookup entry point over the mirrored member table.
    pub fn member(&self, name: &str) -> Option<Member> {
        if self.fields.contains(name) {
            return Some(Member::StaticField {
                name: name.to_string(),
            });
        }
        if let Some(mirror) = self.methods.get(name) {
            return Some(Member::StaticMethod {
                name: name.to_string(),
                overloads: mirror.overloads,
            });
        }
        self.nested.get(name).map(|qualified| Member::NestedClass {
            simple_name: name.to_string(),
            qualified_name: qualified.clone(),
        })
    }

    /// Mirrored static field names, in no particular order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Mirrored static method names, in no particular order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Mirrored nested class simple names, in no particular order.
    pub fn nested_names(&self) -> impl Iterator<Item = &str> {
        self.nested.keys().map(String::as_str)
    }

    /// Read a mirrored static field. Every call is a fresh bridge
    /// round-trip; nothing is cached, so the value always reflects
    /// current foreign static state.
    pub fn get_static(&self, field: &str) -> Result<Value, JvmError> {
        if !self.fields.contains(field) {
            return Err(ProxyError::UnknownField(field.to_string()).into());
        }
        Ok(self.bridge.get_static_field(&self.class_name, field)?)
    }

    /// Write a mirrored static field. A fresh bridge round-trip, like
    /// the getter.
    pub fn set_static(&self, field: &str, value: Value) -> Result<(), JvmError> {
        if !self.fields.contains(field) {
            return Err(ProxyError::UnknownField(field.to_string()).into());
        }
        Ok(self.bridge.set_static_field(&self.class_name, field, value)?)
    }

    /// Call a mirrored static method, blocking variant. Always present.
    pub fn call_sync(&self, method: &str, args: &[Value]) -> Result<Value, JvmError> {
        self.check_method(method)?;
        Ok(self.bridge.call_static(&self.class_name, method, args)?)
    }

    /// Call a mirrored static method, callback variant. Present only
    /// when the configuration enables it; completion arrives on a later
    /// scheduler turn.
    pub fn call_async(
        &self,
        method: &str,
        args: Vec<Value>,
        callback: ValueCallback,
    ) -> Result<(), JvmError> {
        self.check_method(method)?;
        if !self.conventions.has_callback_variant() {
            return Err(ProxyError::VariantNotConfigured {
                variant: "callback",
            }
            .into());
        }
        self.bridge
            .call_static_cb(&self.class_name, method, args, callback);
        Ok(())
    }

    /// Call a mirrored static method, promise variant. Present only when
    /// the promise pair is configured.
    ///
    /// Dispatches the identical underlying static invocation as the
    /// other variants; only the completion protocol differs.
    pub fn call_promise(&self, method: &str, args: Vec<Value>) -> Result<Promise<Value>, JvmError> {
        self.check_method(method)?;
        let promisify = self
            .conventions
            .promisify()
            .cloned()
            .ok_or(ProxyError::VariantNotConfigured { variant: "promise" })?;
        let bridge = self.bridge.clone();
        let class = self.class_name.clone();
        let method = method.to_string();
        let op: CallbackOp =
            Rc::new(move |args, callback| bridge.call_static_cb(&class, &method, args, callback));
        let lifted = (*promisify)(op);
        Ok((*lifted)(args))
    }

    /// Resolve a mirrored nested class, memoized per parent proxy.
    ///
    /// The first access recursively imports the nested class's fully
    /// qualified name and stores the result in this proxy's cache map;
    /// every later access returns the stored proxy, so the build cost is
    /// paid at most once and the returned `Rc` identity is stable.
    pub fn nested(&self, simple_name: &str) -> Result<Rc<ClassProxy>, JvmError> {
        let qualified = self
            .nested
            .get(simple_name)
            .cloned()
            .ok_or_else(|| ProxyError::UnknownNestedClass(simple_name.to_string()))?;
        if let Some(cached) = self.nested_cache.borrow().get(simple_name) {
            return Ok(cached.clone());
        }
        let built = Rc::new(build(
            self.bridge.clone(),
            self.conventions.clone(),
            &qualified,
        )?);
        self.nested_cache
            .borrow_mut()
            .insert(simple_name.to_string(), built.clone());
        Ok(built)
    }

    /// The suffix-derived surface name of a mirrored method under the
    /// given convention, or `None` when the method is unknown or the
    /// variant is inactive.
    pub fn accessor_name(&self, method: &str, convention: CallConvention) -> Option<String> {
        if !self.methods.contains_key(method) {
            return None;
        }
        self.conventions.accessor_name(method, convention)
    }

    fn check_method(&self, method: &str) -> Result<(), ProxyError> {
        if self.methods.contains_key(method) {
            Ok(())
        } else {
            Err(ProxyError::UnknownMethod(method.to_string()))
        }
    }
}
