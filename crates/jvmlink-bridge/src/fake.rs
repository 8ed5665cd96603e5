//! In-memory fake of the native bridge.
//!
//! Hosts a registry of hand-defined classes instead of a real foreign
//! runtime, and counts every reflective and invocation round-trip so
//! tests can assert on caching behavior. Callback-form operations
//! complete on a later scheduler turn, like the real binding.
//!
//! Overload selection mimics the real bridge's runtime dispatch: among
//! same-named static methods, the entry whose declared arity matches the
//! argument count wins; an entry with no declared arity acts as a
//! vararg catch-all.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use jvmlink_core::{
    BridgeError, InstanceRef, MemberDescriptor, Modifiers, NestedClassDescriptor, Scheduler,
    Value, ValueCallback,
};

use crate::{Bridge, ClassHandle};

/// Handler body of a fake method or constructor.
pub type MethodFn = Rc<dyn Fn(&[Value]) -> Result<Value, BridgeError>>;

/// A declared field of a fake class. The value cell is the "foreign
/// static state" that live reads observe.
pub struct FakeField {
    name: String,
    modifiers: Modifiers,
    value: RefCell<Value>,
}

/// A declared method of a fake class.
pub struct FakeMethod {
    name: String,
    modifiers: Modifiers,
    /// Declared parameter count; `None` is a vararg catch-all.
    arity: Option<usize>,
    handler: MethodFn,
}

/// A class definition installed into the fake runtime.
pub struct FakeClass {
    qualified_name: String,
    simple_name: String,
    fields: Vec<FakeField>,
    methods: Vec<FakeMethod>,
    nested: Vec<(String, Modifiers)>,
    constructor: Option<MethodFn>,
}

impl FakeClass {
    /// Start a class definition. The simple name is derived from the
    /// qualified name (text after the last `$`, or the last `.`).
    pub fn new(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let simple_name = qualified_name
            .rsplit(['$', '.'])
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            qualified_name,
            simple_name,
            fields: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            constructor: None,
        }
    }

    /// Declare a field with explicit modifiers and an initial value.
    pub fn field(mut self, name: &str, modifiers: Modifiers, initial: Value) -> Self {
        self.fields.push(FakeField {
            name: name.to_string(),
            modifiers,
            value: RefCell::new(initial),
        });
        self
    }

    /// Declare a public static field.
    pub fn static_field(self, name: &str, initial: Value) -> Self {
        self.field(name, Modifiers::PUBLIC | Modifiers::STATIC, initial)
    }

    /// Declare a method with explicit modifiers and arity.
    pub fn method_with(
        mut self,
        name: &str,
        modifiers: Modifiers,
        arity: Option<usize>,
        handler: impl Fn(&[Value]) -> Result<Value, BridgeError> + 'static,
    ) -> Self {
        self.methods.push(FakeMethod {
            name: name.to_string(),
            modifiers,
            arity,
            handler: Rc::new(handler),
        });
        self
    }

    /// Declare a public static vararg method.
    pub fn static_method(
        self,
        name: &str,
        handler: impl Fn(&[Value]) -> Result<Value, BridgeError> + 'static,
    ) -> Self {
        self.method_with(name, Modifiers::PUBLIC | Modifiers::STATIC, None, handler)
    }

    /// Declare a public static overload with a fixed arity.
    pub fn static_overload(
        self,
        name: &str,
        arity: usize,
        handler: impl Fn(&[Value]) -> Result<Value, BridgeError> + 'static,
    ) -> Self {
        self.method_with(
            name,
            Modifiers::PUBLIC | Modifiers::STATIC,
            Some(arity),
            handler,
        )
    }

    /// Declare a public instance method.
    pub fn instance_method(
        self,
        name: &str,
        handler: impl Fn(&[Value]) -> Result<Value, BridgeError> + 'static,
    ) -> Self {
        self.method_with(name, Modifiers::PUBLIC, None, handler)
    }

    /// Declare a nested class by simple name. The nested class itself
    /// must also be installed under `<qualified>$<simple>` for imports
    /// of it to resolve.
    pub fn nested(mut self, simple_name: &str, modifiers: Modifiers) -> Self {
        self.nested.push((simple_name.to_string(), modifiers));
        self
    }

    /// Install a constructor body. When it returns an instance value,
    /// that value is the construction result; any other return falls
    /// back to a fresh instance reference.
    pub fn constructor(
        mut self,
        handler: impl Fn(&[Value]) -> Result<Value, BridgeError> + 'static,
    ) -> Self {
        self.constructor = Some(Rc::new(handler));
        self
    }
}

struct Inner {
    scheduler: Rc<Scheduler>,
    classes: RefCell<FxHashMap<String, Rc<FakeClass>>>,
    created: Cell<bool>,
    fail_create: RefCell<Option<String>>,
    next_instance_id: Cell<u64>,
    create_calls: Cell<u32>,
    find_class_calls: RefCell<FxHashMap<String, u32>>,
    static_reads: Cell<u32>,
    static_writes: Cell<u32>,
    static_calls: Cell<u32>,
}

/// The fake runtime. Cheap to clone; clones share the registry,
/// counters, and scheduler.
#[derive(Clone)]
pub struct FakeJvm {
    inner: Rc<Inner>,
}

impl FakeJvm {
    pub fn new(scheduler: Rc<Scheduler>) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                classes: RefCell::new(FxHashMap::default()),
                created: Cell::new(false),
                fail_create: RefCell::new(None),
                next_instance_id: Cell::new(1),
                create_calls: Cell::new(0),
                find_class_calls: RefCell::new(FxHashMap::default()),
                static_reads: Cell::new(0),
                static_writes: Cell::new(0),
                static_calls: Cell::new(0),
            }),
        }
    }

    /// Install a class definition, replacing any previous one under the
    /// same qualified name.
    pub fn define_class(&self, class: FakeClass) {
        self.inner
            .classes
            .borrow_mut()
            .insert(class.qualified_name.clone(), Rc::new(class));
    }

    /// Make the next `create_runtime` call fail with this message.
    pub fn fail_next_create(&self, message: &str) {
        *self.inner.fail_create.borrow_mut() = Some(message.to_string());
    }

    /// True once `create_runtime` has succeeded.
    pub fn runtime_created(&self) -> bool {
        self.inner.created.get()
    }

    /// Seed the registry with a minimal `java.lang`: `String` (vararg
    /// `format` with `%s` substitution, `valueOf`) and `Integer`
    /// (`MAX_VALUE`/`MIN_VALUE`, `parseInt`).
    pub fn seed_java_lang(&self) {
        self.define_class(
            FakeClass::new("java.lang.String")
                .static_method("format", |args| {
                    let Some(Value::Str(template)) = args.first() else {
                        return Err(BridgeError::Call(
                            "String.format requires a format string".to_string(),
                        ));
                    };
                    let mut out = String::new();
                    let mut rest = template.as_str();
                    let mut next = 1;
                    while let Some(at) = rest.find("%s") {
                        out.push_str(&rest[..at]);
                        match args.get(next) {
                            Some(arg) => out.push_str(&arg.to_string()),
                            None => {
                                return Err(BridgeError::Call(
                                    "String.format: too few arguments".to_string(),
                                ));
                            }
                        }
                        next += 1;
                        rest = &rest[at + 2..];
                    }
                    out.push_str(rest);
                    Ok(Value::Str(out))
                })
                .static_overload("valueOf", 1, |args| {
                    Ok(Value::Str(args[0].to_string()))
                }),
        );
        self.define_class(
            FakeClass::new("java.lang.Integer")
                .static_field("MAX_VALUE", Value::Int(i32::MAX))
                .static_field("MIN_VALUE", Value::Int(i32::MIN))
                .static_overload("parseInt", 1, |args| {
                    let text = args[0].as_str().unwrap_or_default();
                    text.parse::<i32>()
                        .map(Value::Int)
                        .map_err(|e| BridgeError::Call(format!("NumberFormatException: {e}")))
                }),
        );
    }

    // === instrumentation ===

    /// How many times `create_runtime` was called.
    pub fn create_calls(&self) -> u32 {
        self.inner.create_calls.get()
    }

    /// How many times this class name was resolved.
    pub fn find_class_calls(&self, qualified_name: &str) -> u32 {
        self.inner
            .find_class_calls
            .borrow()
            .get(qualified_name)
            .copied()
            .unwrap_or(0)
    }

    /// Total static field reads.
    pub fn static_reads(&self) -> u32 {
        self.inner.static_reads.get()
    }

    /// Total static field writes.
    pub fn static_writes(&self) -> u32 {
        self.inner.static_writes.get()
    }

    /// Total static method invocations.
    pub fn static_calls(&self) -> u32 {
        self.inner.static_calls.get()
    }

    fn class(&self, qualified_name: &str) -> Result<Rc<FakeClass>, BridgeError> {
        self.inner
            .classes
            .borrow()
            .get(qualified_name)
            .cloned()
            .ok_or_else(|| BridgeError::ClassNotFound(qualified_name.to_string()))
    }

    fn fresh_instance(&self, class: &str) -> Value {
        let id = self.inner.next_instance_id.get();
        self.inner.next_instance_id.set(id + 1);
        Value::Instance(InstanceRef::new(class, id))
    }

    fn dispatch(
        class_name: &str,
        methods: &[FakeMethod],
        method: &str,
        args: &[Value],
        want_static: bool,
    ) -> Result<Value, BridgeError> {
        let candidates = methods
            .iter()
            .filter(|m| m.name == method && m.modifiers.is_static() == want_static);
        let mut catch_all = None;
        for candidate in candidates {
            match candidate.arity {
                Some(arity) if arity == args.len() => return (*candidate.handler)(args),
                Some(_) => {}
                None => catch_all = Some(candidate),
            }
        }
        match catch_all {
            Some(candidate) => (*candidate.handler)(args),
            None => Err(BridgeError::MethodNotFound {
                class: class_name.to_string(),
                method: method.to_string(),
            }),
        }
    }
}

impl Bridge for FakeJvm {
    fn create_runtime(&self) -> Result<(), BridgeError> {
        self.inner.create_calls.set(self.inner.create_calls.get() + 1);
        if let Some(message) = self.inner.fail_create.borrow_mut().take() {
            return Err(BridgeError::CreationFailed(message));
        }
        self.inner.created.set(true);
        Ok(())
    }

    fn find_class(&self, qualified_name: &str) -> Result<ClassHandle, BridgeError> {
        *self
            .inner
            .find_class_calls
            .borrow_mut()
            .entry(qualified_name.to_string())
            .or_insert(0) += 1;
        let class = self.class(qualified_name)?;
        Ok(ClassHandle::new(
            class.qualified_name.clone(),
            class.simple_name.clone(),
        ))
    }

    fn declared_fields(&self, class: &ClassHandle) -> Result<Vec<MemberDescriptor>, BridgeError> {
        let class = self.class(class.qualified_name())?;
        Ok(class
            .fields
            .iter()
            .map(|f| MemberDescriptor::new(f.name.clone(), f.modifiers))
            .collect())
    }

    fn declared_methods(&self, class: &ClassHandle) -> Result<Vec<MemberDescriptor>, BridgeError> {
        let class = self.class(class.qualified_name())?;
        Ok(class
            .methods
            .iter()
            .map(|m| MemberDescriptor::new(m.name.clone(), m.modifiers))
            .collect())
    }

    fn declared_classes(
        &self,
        class: &ClassHandle,
    ) -> Result<Vec<NestedClassDescriptor>, BridgeError> {
        let class = self.class(class.qualified_name())?;
        Ok(class
            .nested
            .iter()
            .map(|(simple, modifiers)| {
                NestedClassDescriptor::new(
                    simple.clone(),
                    format!("{}${}", class.qualified_name, simple),
                    *modifiers,
                )
            })
            .collect())
    }

    fn get_static_field(&self, class: &str, field: &str) -> Result<Value, BridgeError> {
        self.inner.static_reads.set(self.inner.static_reads.get() + 1);
        let class_def = self.class(class)?;
        let slot = class_def
            .fields
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| BridgeError::FieldNotFound {
                class: class.to_string(),
                field: field.to_string(),
            })?;
        Ok(slot.value.borrow().clone())
    }

    fn set_static_field(&self, class: &str, field: &str, value: Value) -> Result<(), BridgeError> {
        self.inner
            .static_writes
            .set(self.inner.static_writes.get() + 1);
        let class_def = self.class(class)?;
        let slot = class_def
            .fields
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| BridgeError::FieldNotFound {
                class: class.to_string(),
                field: field.to_string(),
            })?;
        *slot.value.borrow_mut() = value;
        Ok(())
    }

    fn call_static(&self, class: &str, method: &str, args: &[Value]) -> Result<Value, BridgeError> {
        self.inner.static_calls.set(self.inner.static_calls.get() + 1);
        let class_def = self.class(class)?;
        Self::dispatch(class, &class_def.methods, method, args, true)
    }

    fn call_static_cb(&self, class: &str, method: &str, args: Vec<Value>, callback: ValueCallback) {
        let this = self.clone();
        let class = class.to_string();
        let method = method.to_string();
        self.inner.scheduler.schedule(move || {
            let result = this.call_static(&class, &method, &args);
            callback(result.map_err(Into::into));
        });
    }

    fn new_instance(&self, class: &str, args: &[Value]) -> Result<Value, BridgeError> {
        let class_def = self.class(class)?;
        if let Some(constructor) = &class_def.constructor {
            match (**constructor)(args)? {
                instance @ Value::Instance(_) => return Ok(instance),
                _ => {}
            }
        }
        Ok(self.fresh_instance(class))
    }

    fn new_instance_cb(&self, class: &str, args: Vec<Value>, callback: ValueCallback) {
        let this = self.clone();
        let class = class.to_string();
        self.inner.scheduler.schedule(move || {
            let result = this.new_instance(&class, &args);
            callback(result.map_err(Into::into));
        });
    }

    fn call_method(
        &self,
        instance: &InstanceRef,
        method: &str,
        args: &[Value],
    ) -> Result<Value, BridgeError> {
        let class_def = self.class(instance.class_name())?;
        Self::dispatch(instance.class_name(), &class_def.methods, method, args, false)
    }

    fn call_method_cb(
        &self,
        instance: &InstanceRef,
        method: &str,
        args: Vec<Value>,
        callback: ValueCallback,
    ) {
        let this = self.clone();
        let instance = instance.clone();
        let method = method.to_string();
        self.inner.scheduler.schedule(move || {
            let result = this.call_method(&instance, &method, &args);
            callback(result.map_err(Into::into));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn fake() -> (Rc<Scheduler>, FakeJvm) {
        let scheduler = Scheduler::new();
        let jvm = FakeJvm::new(scheduler.clone());
        jvm.seed_java_lang();
        (scheduler, jvm)
    }

    #[test]
    fn create_runtime_is_counted_and_can_fail_once() {
        let (_, jvm) = fake();
        jvm.fail_next_create("no libjvm");
        assert_eq!(
            jvm.create_runtime(),
            Err(BridgeError::CreationFailed("no libjvm".to_string()))
        );
        assert!(!jvm.runtime_created());

        assert!(jvm.create_runtime().is_ok());
        assert!(jvm.runtime_created());
        assert_eq!(jvm.create_calls(), 2);
    }

    #[test]
    fn find_class_counts_per_name() {
        let (_, jvm) = fake();
        jvm.find_class("java.lang.String").unwrap();
        jvm.find_class("java.lang.String").unwrap();
        assert_eq!(jvm.find_class_calls("java.lang.String"), 2);
        assert_eq!(jvm.find_class_calls("java.lang.Integer"), 0);

        let err = jvm.find_class("java.lang.Missing").unwrap_err();
        assert_eq!(err, BridgeError::ClassNotFound("java.lang.Missing".to_string()));
    }

    #[test]
    fn arity_dispatch_prefers_exact_match_over_catch_all() {
        let (_, jvm) = fake();
        jvm.define_class(
            FakeClass::new("demo.Overloaded")
                .static_overload("pick", 1, |_| Ok(Value::Str("one".to_string())))
                .static_overload("pick", 2, |_| Ok(Value::Str("two".to_string())))
                .static_method("pick", |_| Ok(Value::Str("varargs".to_string()))),
        );
        let one = jvm.call_static("demo.Overloaded", "pick", &[Value::Null]).unwrap();
        let two = jvm
            .call_static("demo.Overloaded", "pick", &[Value::Null, Value::Null])
            .unwrap();
        let five = vec![Value::Null; 5];
        let many = jvm.call_static("demo.Overloaded", "pick", &five).unwrap();
        assert_eq!(one.as_str(), Some("one"));
        assert_eq!(two.as_str(), Some("two"));
        assert_eq!(many.as_str(), Some("varargs"));
    }

    #[test]
    fn static_field_round_trip_hits_live_state() {
        let (_, jvm) = fake();
        jvm.define_class(FakeClass::new("demo.Config").static_field("LEVEL", Value::Int(1)));
        assert_eq!(
            jvm.get_static_field("demo.Config", "LEVEL").unwrap(),
            Value::Int(1)
        );
        jvm.set_static_field("demo.Config", "LEVEL", Value::Int(9)).unwrap();
        assert_eq!(
            jvm.get_static_field("demo.Config", "LEVEL").unwrap(),
            Value::Int(9)
        );
        assert_eq!(jvm.static_reads(), 2);
        assert_eq!(jvm.static_writes(), 1);
    }

    #[test]
    fn callback_calls_complete_on_a_later_turn() {
        use std::cell::RefCell;

        let (scheduler, jvm) = fake();
        let seen: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        jvm.call_static_cb(
            "java.lang.String",
            "valueOf",
            vec![Value::Int(7)],
            Box::new(move |result| *sink.borrow_mut() = result.ok()),
        );
        // nothing delivered until the scheduler turns
        assert!(seen.borrow().is_none());
        scheduler.run_until_idle().unwrap();
        assert_eq!(*seen.borrow(), Some(Value::Str("7".to_string())));
    }

    #[test]
    fn construction_yields_distinct_instances() {
        let (_, jvm) = fake();
        jvm.define_class(FakeClass::new("java.util.ArrayList"));
        let a = jvm.new_instance("java.util.ArrayList", &[]).unwrap();
        let b = jvm.new_instance("java.util.ArrayList", &[]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_instance().unwrap().class_name(), "java.util.ArrayList");
    }

    #[test]
    fn instance_methods_dispatch_by_name() {
        let (_, jvm) = fake();
        jvm.define_class(
            FakeClass::new("demo.Greeter").instance_method("greet", |args| {
                Ok(Value::Str(format!(
                    "hello {}",
                    args.first().map(Value::to_string).unwrap_or_default()
                )))
            }),
        );
        let instance = jvm.new_instance("demo.Greeter", &[]).unwrap();
        let instance = instance.as_instance().unwrap();
        let out = jvm
            .call_method(instance, "greet", &[Value::Str("world".to_string())])
            .unwrap();
        assert_eq!(out.as_str(), Some("hello world"));
    }

    #[test]
    fn seeded_format_substitutes_placeholders() {
        let (_, jvm) = fake();
        let out = jvm
            .call_static(
                "java.lang.String",
                "format",
                &[
                    Value::Str("%s--%s".to_string()),
                    Value::Str("hello".to_string()),
                    Value::Str("world".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(out.as_str(), Some("hello--world"));
    }

    #[test]
    fn seeded_integer_has_constants_and_parse() {
        let (_, jvm) = fake();
        assert_eq!(
            jvm.get_static_field("java.lang.Integer", "MAX_VALUE").unwrap(),
            Value::Int(i32::MAX)
        );
        let parsed = jvm
            .call_static("java.lang.Integer", "parseInt", &[Value::Str("42".to_string())])
            .unwrap();
        assert_eq!(parsed, Value::Int(42));

        let err = jvm
            .call_static("java.lang.Integer", "parseInt", &[Value::Str("nope".to_string())])
            .unwrap_err();
        assert!(matches!(err, BridgeError::Call(_)));
    }
}
