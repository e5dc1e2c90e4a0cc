mod common;
use bindery_signals::*;
use common::watcher;

fn event(name: &str, date: &str) -> Value { Value::record([("name", name), ("date", date)]) }

#[test]
fn test_set_then_get_returns_value() {
    let holder = Bindable::new();
    for (name, value) in [("title", Value::from("Home")), ("count", Value::from(3)), ("ready", Value::from(true))] {
        holder.set(name, value.clone()).unwrap();
        assert_eq!(holder.get(name).unwrap(), value);
    }
}

#[test]
fn test_identical_writes_emit_one_event() {
    let holder = Bindable::new();
    let (listener, check) = watcher("w");
    holder.subscribe("title", listener);

    holder.set("title", "Home").unwrap();
    holder.set("title", "Home").unwrap();
    assert_eq!(check(), ["w:title=Home"]);
}

#[test]
fn test_notify_property_change_featured_events() {
    let holder = Bindable::new();
    let received = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    {
        let received = received.clone();
        holder.subscribe("featuredEvents", move |e: &ChangeEvent| received.lock().unwrap().push(e.clone()));
    }

    let featured = Value::list([event("A", "2024-07-15"), event("B", "2024-06-20"), event("C", "2024-06-25")]);
    holder.notify_property_change("featuredEvents", featured.clone()).unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].name(), "featuredEvents");
    assert_eq!(received[0].property(), Some("featuredEvents"));
    assert_eq!(received[0].value(), Some(&featured));
}

#[test]
fn test_setting_equal_categories_emits_nothing() {
    let categories = Value::list([Value::record([("name", "Concerts")]), Value::record([("name", "Sports")])]);
    let holder = Bindable::with_values([("categories", categories.clone())]);
    let (listener, check) = watcher("any");
    holder.subscribe(Channel::Any, listener);

    holder.set("categories", categories).unwrap();
    assert_eq!(check(), [] as [&str; 0]);
}

#[test]
fn test_wildcard_sees_both_passes_of_a_change() {
    let holder = Bindable::new();
    let (any, check_any) = watcher("any");
    let (generic, check_generic) = watcher("generic");
    let (other, check_other) = watcher("other");
    holder.subscribe(Channel::Any, any);
    holder.subscribe(PROPERTY_CHANGE, generic);
    holder.subscribe("somethingElse", other);

    holder.set("title", "Home").unwrap();
    assert_eq!(check_any(), ["any:propertyChange=Home", "any:title=Home"]);
    assert_eq!(check_generic(), ["generic:propertyChange=Home"]);
    assert_eq!(check_other(), [] as [&str; 0]);
}

#[test]
fn test_events_name_the_holder_as_source() {
    let holder = Bindable::new();
    let (tx, rx) = std::sync::mpsc::channel::<ChangeEvent>();
    holder.subject().subscribe_with(Channel::Any, tx);

    holder.set("title", "Home").unwrap();
    let sources: Vec<SubjectId> = rx.try_iter().map(|e| e.source()).collect();
    assert_eq!(sources, [holder.subject().id(), holder.subject().id()]);
}

#[test]
fn test_unknown_property() {
    let holder = Bindable::new();
    let err = holder.get("featuredEvents").unwrap_err();
    assert_eq!(err.to_string(), "unknown property: featuredEvents");
}
