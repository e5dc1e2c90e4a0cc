use bindery_signals::{Bindable, DeliveryError, Observable, Subject, Value};
use tracing::{info, warn};

use crate::data::{Category, FeaturedEvent, HomeData};

pub const FEATURED_EVENTS: &str = "featuredEvents";
pub const CATEGORIES: &str = "categories";
pub const SELECTED_CATEGORY: &str = "selectedCategory";

/// View-model for the home screen.
///
/// Owns its state through a [`Bindable`]; the presentation layer binds to it with
/// [`Observable::subscribe`] and must unsubscribe when it tears down.
pub struct HomeViewModel {
    state: Bindable,
    categories: Vec<Category>,
}

impl HomeViewModel {
    pub fn new(data: HomeData) -> Self {
        let state = Bindable::new();
        state.initialize(FEATURED_EVENTS, Value::list(data.featured_events.iter().map(Value::from)));
        state.initialize(CATEGORIES, Value::list(data.categories.iter().map(Value::from)));
        state.set_default(SELECTED_CATEGORY, Value::Null);
        Self { state, categories: data.categories }
    }

    pub fn featured_events(&self) -> Value { self.state.get(FEATURED_EVENTS).unwrap_or_default() }

    pub fn categories(&self) -> Value { self.state.get(CATEGORIES).unwrap_or_default() }

    pub fn selected_category(&self) -> Option<String> { self.state.get(SELECTED_CATEGORY).ok().and_then(|v| v.as_str().map(str::to_string)) }

    pub fn state(&self) -> &Bindable { &self.state }

    /// Announce the current featured events and categories, e.g. right after a view has bound.
    pub fn refresh(&self) {
        for name in [FEATURED_EVENTS, CATEGORIES] {
            let value = self.state.get(name).unwrap_or_default();
            swallow(name, self.state.notify_property_change(name, value));
        }
    }

    pub fn set_featured_events(&self, events: &[FeaturedEvent]) {
        swallow(FEATURED_EVENTS, self.state.set(FEATURED_EVENTS, Value::list(events.iter().map(Value::from))).map(|_| ()));
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        let value = Value::list(categories.iter().map(Value::from));
        self.categories = categories;
        swallow(CATEGORIES, self.state.set(CATEGORIES, value).map(|_| ()));
    }

    /// A category was tapped. Records the selection so bound views can react to it.
    pub fn on_category_tap(&self, index: usize) -> Option<&Category> {
        let Some(category) = self.categories.get(index) else {
            warn!("Tapped category {index} out of {}", self.categories.len());
            return None;
        };
        info!("Selected category: {}", category.name);
        swallow(SELECTED_CATEGORY, self.state.set(SELECTED_CATEGORY, category.name.as_str()).map(|_| ()));
        Some(category)
    }
}

impl Default for HomeViewModel {
    fn default() -> Self { Self::new(HomeData::sample()) }
}

impl Observable for HomeViewModel {
    fn subject(&self) -> &Subject { self.state.subject() }
}

// Listener failures stop at the binding boundary: logged, never returned
fn swallow(property: &str, result: Result<(), DeliveryError>) {
    if let Err(failures) = result {
        for failure in failures {
            warn!("Binding for {property} failed: {failure}");
        }
    }
}
