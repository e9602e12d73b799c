//! Instance event tests
//!
//! Listener registration, call-context, snapshot dispatch and events
//! declared on classes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use widget_core::{Class, ClassBuilder, Document, Event, Handler, Listener, Toolkit, Value};

fn toolkit() -> anyhow::Result<Toolkit> {
    Ok(Toolkit::new(Document::new("about:blank"))?)
}

fn counter() -> (Rc<Cell<u32>>, Listener) {
    let count = Rc::new(Cell::new(0));
    let probe = Rc::clone(&count);
    (count, Listener::new(move |_, _| probe.set(probe.get() + 1)))
}

// ============================================================================
// ON / OFF / TRIGGER
// ============================================================================

#[test]
fn test_on_trigger_off() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let (count, listener) = counter();

    tk.on(x, "test", listener.clone());
    assert_eq!(count.get(), 0);
    tk.trigger(x, "test");
    assert_eq!(count.get(), 1);

    tk.off(x, "test", &listener);
    tk.trigger(x, "test");
    assert_eq!(count.get(), 1);
    Ok(())
}

#[test]
fn test_trigger_without_listeners() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    tk.trigger(x, "nothing").trigger_with(x, "nothing", 3);
    assert_eq!(tk.listener_count(x, "nothing"), 0);
    Ok(())
}

#[test]
fn test_duplicate_registration_runs_twice() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let (count, listener) = counter();

    tk.on(x, "test", listener.clone()).on(x, "test", listener.clone());
    tk.trigger(x, "test");
    assert_eq!(count.get(), 2);

    tk.off(x, "test", &listener);
    assert_eq!(tk.listener_count(x, "test"), 0);
    Ok(())
}

#[test]
fn test_off_unknown_listener() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let (count, listener) = counter();
    let (_, stranger) = counter();

    tk.on(x, "test", listener);
    tk.off(x, "test", &stranger).off(x, "other", &stranger);
    tk.trigger(x, "test");
    assert_eq!(count.get(), 1);
    Ok(())
}

#[test]
fn test_payload_reaches_listener() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let seen = Rc::new(RefCell::new(None));
    let probe = Rc::clone(&seen);

    tk.on(x, "ping", Listener::new(move |_, ev| *probe.borrow_mut() = ev.value().cloned()));
    tk.trigger_with(x, "ping", "pong");
    assert_eq!(*seen.borrow(), Some(Value::from("pong")));
    Ok(())
}

// ============================================================================
// CONTEXT
// ============================================================================

#[test]
fn test_context() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let seen = Rc::new(RefCell::new(Some(Value::Null)));

    let probe = Rc::clone(&seen);
    tk.on(x, "test", Listener::new(move |_, ev| *probe.borrow_mut() = ev.this().cloned()));
    tk.trigger(x, "test");
    assert_eq!(*seen.borrow(), None);

    let probe = Rc::clone(&seen);
    tk.on_with_context(
        x,
        "test2",
        Listener::new(move |_, ev| *probe.borrow_mut() = ev.this().cloned()),
        "test",
    );
    tk.trigger(x, "test2");
    assert_eq!(*seen.borrow(), Some(Value::from("test")));
    Ok(())
}

// ============================================================================
// SNAPSHOT DISPATCH
// ============================================================================

#[test]
fn test_listener_added_during_dispatch_waits() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let (count, late) = counter();

    tk.on(
        x,
        "test",
        Listener::new(move |tk, _| {
            tk.on(x, "test", late.clone());
        }),
    );
    tk.trigger(x, "test");
    assert_eq!(count.get(), 0);
    tk.trigger(x, "test");
    assert_eq!(count.get(), 1);
    Ok(())
}

#[test]
fn test_listener_removed_during_dispatch_still_runs() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let (count, victim) = counter();

    let target = victim.clone();
    tk.on(x, "test", Listener::new(move |tk, _| {
        tk.off(x, "test", &target);
    }));
    tk.on(x, "test", victim);

    tk.trigger(x, "test");
    assert_eq!(count.get(), 1);
    tk.trigger(x, "test");
    assert_eq!(count.get(), 1);
    Ok(())
}

#[test]
fn test_reentrant_trigger() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let (count, listener) = counter();

    tk.on(x, "inner", listener);
    tk.on(x, "outer", Listener::new(move |tk, _| {
        tk.trigger(x, "inner");
    }));
    tk.trigger(x, "outer");
    assert_eq!(count.get(), 1);
    Ok(())
}

// ============================================================================
// CLASS-DECLARED EVENTS
// ============================================================================

#[test]
fn test_static_events() -> anyhow::Result<()> {
    let (first, on_first) = counter();
    let (second, on_second) = counter();

    let claz = ClassBuilder::new("Claz")
        .event("testevent", Handler::Function(on_first))
        .build()?;
    let claz2 = ClassBuilder::new("Claz2")
        .extends(&claz)
        .event("testevent2", Handler::Function(on_second))
        .build()?;

    let mut tk = toolkit()?;
    let x = tk.create(&claz);
    tk.trigger(x, "testevent");
    assert_eq!(first.get(), 1);

    let y = tk.create(&claz2);
    assert_eq!((first.get(), second.get()), (1, 0));
    tk.trigger(y, "testevent");
    assert_eq!((first.get(), second.get()), (2, 0));
    tk.trigger(y, "testevent2");
    assert_eq!((first.get(), second.get()), (2, 1));
    Ok(())
}

#[test]
fn test_static_events_context() -> anyhow::Result<()> {
    let seen = Rc::new(RefCell::new(None));
    let probe = Rc::clone(&seen);

    let claz = ClassBuilder::new("Claz")
        .method("test", move |_, ev: &Event| *probe.borrow_mut() = ev.this().cloned())
        .event("test", Handler::method("test"))
        .build()?;

    let mut tk = toolkit()?;
    let x = tk.create(&claz);
    tk.trigger(x, "test");
    assert_eq!(*seen.borrow(), Some(Value::Component(x)));
    Ok(())
}

#[test]
fn test_declared_listener_can_be_removed() -> anyhow::Result<()> {
    let (count, listener) = counter();
    let claz = ClassBuilder::new("Claz")
        .event("test", Handler::Function(listener.clone()))
        .build()?;

    let mut tk = toolkit()?;
    let x = tk.create(&claz);
    tk.off(x, "test", &listener);
    tk.trigger(x, "test");
    assert_eq!(count.get(), 0);
    Ok(())
}

#[test]
fn test_subclass_method_overrides_declared_handler() -> anyhow::Result<()> {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let (base_log, sub_log) = (Rc::clone(&calls), Rc::clone(&calls));

    let base = ClassBuilder::new("Base")
        .method("handle", move |_, _| base_log.borrow_mut().push("base"))
        .event("go", Handler::method("handle"))
        .build()?;
    let sub = ClassBuilder::new("Sub")
        .extends(&base)
        .method("handle", move |_, _| sub_log.borrow_mut().push("sub"))
        .build()?;

    let mut tk = toolkit()?;
    let a = tk.create(&base);
    let b = tk.create(&sub);
    tk.trigger(a, "go").trigger(b, "go");
    assert_eq!(*calls.borrow(), ["base", "sub"]);
    Ok(())
}

#[test]
fn test_destroy_discards_listeners() -> anyhow::Result<()> {
    let mut tk = toolkit()?;
    let x = tk.create(&Class::base());
    let (count, listener) = counter();
    tk.on(x, "test", listener);

    tk.destroy(x);
    tk.trigger(x, "test");
    assert_eq!(count.get(), 0);
    Ok(())
}

#[test]
fn test_declared_event_fires_during_render() -> anyhow::Result<()> {
    let (count, listener) = counter();
    let claz = ClassBuilder::new("Eager")
        .event("rendered", Handler::Function(listener))
        .render(|tk, w| {
            tk.trigger(w, "rendered");
            Ok(())
        })
        .build()?;

    let mut tk = toolkit()?;
    tk.create_widget(&claz)?;
    assert_eq!(count.get(), 1);
    Ok(())
}
