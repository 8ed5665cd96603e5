//! Class proxy integration tests against the public API, driven through
//! the in-memory fake bridge.

use std::cell::RefCell;
use std::rc::Rc;

use jvmlink::{
    AsyncOptions, Bridge, CallConvention, Jvm, Member, Modifiers, Scheduler, Value,
    promisify_deferred,
};
use jvmlink_bridge::fake::{FakeClass, FakeJvm};

/// Launch a context over a seeded fake runtime and drain the scheduler.
fn launched(options: Option<AsyncOptions>) -> (Rc<Scheduler>, FakeJvm, Jvm) {
    let scheduler = Scheduler::new();
    let fake = FakeJvm::new(scheduler.clone());
    fake.seed_java_lang();
    define_demo_classes(&fake);

    let jvm = Jvm::new(Rc::new(fake.clone()), scheduler.clone());
    if let Some(options) = options {
        jvm.set_async_options(options).unwrap();
    }
    jvm.launch_with(|error| assert!(error.is_none()));
    scheduler.run_until_idle().unwrap();
    assert!(jvm.is_created());
    (scheduler, fake, jvm)
}

fn define_demo_classes(fake: &FakeJvm) {
    fake.define_class(
        FakeClass::new("demo.Calculator")
            .static_field("PRECISION", Value::Int(2))
            .static_overload("combine", 1, |args| Ok(sum(args)))
            .static_overload("combine", 2, |args| Ok(sum(args)))
            .static_overload("combine", 3, |args| Ok(sum(args)))
            .static_overload("combine", 4, |args| Ok(sum(args)))
            .nested("Memory", Modifiers::PUBLIC | Modifiers::STATIC),
    );
    fake.define_class(
        FakeClass::new("demo.Calculator$Memory").static_field("SLOTS", Value::Int(8)),
    );
}

fn sum(args: &[Value]) -> Value {
    Value::Int(args.iter().filter_map(Value::as_int).sum())
}

#[test]
fn end_to_end_string_format() {
    let (_, _, jvm) = launched(None);
    let string = jvm.import("java.lang.String").unwrap();

    let out = string
        .call_sync(
            "format",
            &[
                Value::from("%s--%s"),
                Value::from("hello"),
                Value::from("world"),
            ],
        )
        .unwrap();
    assert_eq!(out.as_str(), Some("hello--world"));

    let out = string.call_sync("format", &[Value::from("nothing")]).unwrap();
    assert_eq!(out.as_str(), Some("nothing"));

    // under the default conventions the blocking accessor surfaces as
    // the bare name + "Sync"
    assert_eq!(
        string.accessor_name("format", CallConvention::Sync).as_deref(),
        Some("formatSync")
    );
}

#[test]
fn all_overload_arities_dispatch_through_the_blocking_variant() {
    let (_, _, jvm) = launched(None);
    let calculator = jvm.import("demo.Calculator").unwrap();

    assert_eq!(
        calculator.member("combine"),
        Some(Member::StaticMethod {
            name: "combine".to_string(),
            overloads: 4,
        })
    );

    for arity in 1..=4 {
        let args: Vec<Value> = (0..arity).map(Value::Int).collect();
        let out = calculator.call_sync("combine", &args).unwrap();
        let expected: i32 = (0..arity).sum();
        assert_eq!(out.as_int(), Some(expected), "arity {arity}");
    }
}

#[test]
fn field_accessors_are_live_round_trips() {
    let (_, fake, jvm) = launched(None);
    let calculator = jvm.import("demo.Calculator").unwrap();

    assert_eq!(calculator.get_static("PRECISION").unwrap(), Value::Int(2));

    // a write behind the proxy's back is visible on the next read
    fake.set_static_field("demo.Calculator", "PRECISION", Value::Int(7))
        .unwrap();
    assert_eq!(calculator.get_static("PRECISION").unwrap(), Value::Int(7));

    // writes through the proxy reach the foreign state
    calculator.set_static("PRECISION", Value::Int(3)).unwrap();
    assert_eq!(
        fake.get_static_field("demo.Calculator", "PRECISION").unwrap(),
        Value::Int(3)
    );

    // each getter invocation was a fresh bridge round-trip
    let reads_before = fake.static_reads();
    calculator.get_static("PRECISION").unwrap();
    calculator.get_static("PRECISION").unwrap();
    assert_eq!(fake.static_reads(), reads_before + 2);
}

#[test]
fn nested_class_resolution_is_memoized_per_proxy() {
    let (_, fake, jvm) = launched(None);
    let calculator = jvm.import("demo.Calculator").unwrap();
    assert_eq!(fake.find_class_calls("demo.Calculator$Memory"), 0);

    let first = calculator.nested("Memory").unwrap();
    let second = calculator.nested("Memory").unwrap();

    // structurally identical and built exactly once
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(fake.find_class_calls("demo.Calculator$Memory"), 1);

    // the nested proxy is a full proxy over the nested class
    assert_eq!(first.class_name(), "demo.Calculator$Memory");
    assert_eq!(first.get_static("SLOTS").unwrap(), Value::Int(8));
}

#[test]
fn imports_are_independent_but_nested_caches_are_per_proxy() {
    let (_, fake, jvm) = launched(None);
    let first = jvm.import("demo.Calculator").unwrap();
    let second = jvm.import("demo.Calculator").unwrap();
    assert_eq!(fake.find_class_calls("demo.Calculator"), 2);

    first.nested("Memory").unwrap();
    second.nested("Memory").unwrap();
    // no cross-proxy cache: each parent resolved its own nested proxy
    assert_eq!(fake.find_class_calls("demo.Calculator$Memory"), 2);
}

#[test]
fn callback_variant_completes_on_a_later_turn() {
    let (scheduler, _, jvm) = launched(None);
    let calculator = jvm.import("demo.Calculator").unwrap();

    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    calculator
        .call_async(
            "combine",
            vec![Value::Int(20), Value::Int(22)],
            Box::new(move |result| *sink.borrow_mut() = Some(result)),
        )
        .unwrap();
    assert!(seen.borrow().is_none());

    scheduler.run_until_idle().unwrap();
    assert_eq!(*seen.borrow(), Some(Ok(Value::Int(42))));
}

#[test]
fn promise_variant_settles_with_the_same_invocation() {
    let options = AsyncOptions::new()
        .with_sync_suffix("Sync")
        .with_async_suffix("")
        .with_promises("Promise", promisify_deferred());
    let (scheduler, _, jvm) = launched(Some(options));
    let calculator = jvm.import("demo.Calculator").unwrap();

    let promise = calculator
        .call_promise("combine", vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        .unwrap();
    assert!(!promise.is_settled());

    scheduler.run_until_idle().unwrap();
    assert_eq!(promise.state(), Some(Ok(Value::Int(6))));

    // all three accessor names exist under this configuration
    assert_eq!(
        calculator
            .accessor_name("combine", CallConvention::Callback)
            .as_deref(),
        Some("combine")
    );
    assert_eq!(
        calculator
            .accessor_name("combine", CallConvention::Promise)
            .as_deref(),
        Some("combinePromise")
    );
}

#[test]
fn construction_entry_point_builds_foreign_instances() {
    let (_, _, jvm) = launched(None);
    let calculator = jvm.import("demo.Calculator").unwrap();

    let a = calculator.new_instance(&[]).unwrap();
    let b = calculator.new_instance(&[Value::Int(1)]).unwrap();
    let a = a.as_instance().unwrap();
    let b = b.as_instance().unwrap();
    assert_eq!(a.class_name(), "demo.Calculator");
    assert_ne!(a, b);
}

#[test]
fn member_tables_enumerate_the_mirrored_surface() {
    let (_, fake, jvm) = launched(None);
    let calculator = jvm.import("demo.Calculator").unwrap();

    let fields: Vec<&str> = calculator.field_names().collect();
    assert_eq!(fields, vec!["PRECISION"]);
    let methods: Vec<&str> = calculator.method_names().collect();
    assert_eq!(methods, vec!["combine"]);
    let nested: Vec<&str> = calculator.nested_names().collect();
    assert_eq!(nested, vec!["Memory"]);
    assert!(calculator.member("missing").is_none());

    // each blocking call reaches the bridge
    let calls_before = fake.static_calls();
    calculator.call_sync("combine", &[Value::Int(1)]).unwrap();
    assert_eq!(fake.static_calls(), calls_before + 1);
}

#[test]
fn class_handle_is_inspectable() {
    let (_, _, jvm) = launched(None);
    let calculator = jvm.import("demo.Calculator").unwrap();
    assert_eq!(calculator.class().qualified_name(), "demo.Calculator");
    assert_eq!(calculator.class().simple_name(), "Calculator");
}

#[test]
fn promised_bridge_ops_cover_construct_and_instance_calls() {
    let scheduler = Scheduler::new();
    let fake = FakeJvm::new(scheduler.clone());
    fake.define_class(FakeClass::new("demo.Greeter").instance_method("greet", |args| {
        Ok(Value::Str(format!(
            "hi {}",
            args.first().map(Value::to_string).unwrap_or_default()
        )))
    }));

    let jvm = Jvm::new(Rc::new(fake.clone()), scheduler.clone());
    jvm.set_async_options(
        AsyncOptions::new()
            .with_sync_suffix("Sync")
            .with_promises("P", promisify_deferred()),
    )
    .unwrap();
    jvm.launch_with(|error| assert!(error.is_none()));
    scheduler.run_until_idle().unwrap();

    let promised = jvm.promised().expect("promise pair configured");

    let constructed = promised.new_instance("demo.Greeter", Vec::new());
    scheduler.run_until_idle().unwrap();
    let instance = match constructed.state() {
        Some(Ok(Value::Instance(instance))) => instance,
        other => panic!("unexpected construction result: {other:?}"),
    };

    let greeted = promised.call_method(&instance, "greet", vec![Value::from("there")]);
    scheduler.run_until_idle().unwrap();
    assert_eq!(greeted.state(), Some(Ok(Value::Str("hi there".to_string()))));
}
