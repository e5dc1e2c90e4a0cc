use bindery_demo::*;
use bindery_signals::*;
use std::sync::{Arc, Mutex};

// Initialize tracing for tests
#[ctor::ctor]
unsafe fn init_tracing() { let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).with_test_writer().try_init(); }

fn collect(view_model: &HomeViewModel, channel: impl Into<Channel>) -> (SubscriptionHandle, Arc<Mutex<Vec<ChangeEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let handle = view_model.subscribe(channel, move |e: &ChangeEvent| sink.lock().unwrap().push(e.clone()));
    (handle, events)
}

#[test]
fn test_construction_is_silent_and_values_are_readable() {
    let view_model = HomeViewModel::default();
    let (_handle, events) = collect(&view_model, Channel::Any);

    assert!(events.lock().unwrap().is_empty());
    let featured = view_model.featured_events();
    let featured = featured.as_list().unwrap();
    assert_eq!(featured.len(), 3);
    assert_eq!(featured[0].field("name").and_then(Value::as_str), Some("Summer Music Festival"));
    assert_eq!(view_model.categories().as_list().map(<[Value]>::len), Some(4));
    assert_eq!(view_model.selected_category(), None);
}

#[test]
fn test_refresh_announces_featured_events_then_categories() {
    let view_model = HomeViewModel::default();
    let (_handle, events) = collect(&view_model, PROPERTY_CHANGE);

    view_model.refresh();
    let events = events.lock().unwrap();
    let properties: Vec<_> = events.iter().filter_map(ChangeEvent::property).collect();
    assert_eq!(properties, [FEATURED_EVENTS, CATEGORIES]);
    assert_eq!(events[0].value(), Some(&view_model.featured_events()));
}

#[test]
fn test_category_tap_records_selection_once() {
    let view_model = HomeViewModel::default();
    let (_handle, events) = collect(&view_model, SELECTED_CATEGORY);

    assert_eq!(view_model.on_category_tap(2).map(|c| c.name.as_str()), Some("Theater"));
    view_model.on_category_tap(2);
    assert_eq!(view_model.selected_category().as_deref(), Some("Theater"));
    assert_eq!(events.lock().unwrap().len(), 1);

    assert!(view_model.on_category_tap(99).is_none());
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_failing_binding_is_swallowed() {
    let view_model = HomeViewModel::default();
    view_model.subject().try_subscribe(Channel::Any, |_: &ChangeEvent| -> Result<(), ListenerError> { Err("view detached".into()) });
    let (_handle, events) = collect(&view_model, SELECTED_CATEGORY);

    view_model.on_category_tap(0);
    assert_eq!(view_model.selected_category().as_deref(), Some("Concerts"));
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_replacing_data_notifies_bound_views() {
    let mut view_model = HomeViewModel::new(HomeData::from_json(r#"{ "featuredEvents": [], "categories": [] }"#).unwrap());
    let (handle, events) = collect(&view_model, CATEGORIES);

    view_model.set_categories(vec![Category { name: "Jazz".into() }]);
    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(view_model.on_category_tap(0).map(|c| c.name.clone()), Some("Jazz".to_string()));

    view_model.unsubscribe(handle);
    view_model.set_categories(vec![Category { name: "Blues".into() }]);
    assert_eq!(events.lock().unwrap().len(), 1);
}
