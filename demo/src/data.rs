use bindery_signals::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedEvent {
    pub name: String,
    pub date: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// The data shown on the home screen. Supplied by the caller; the view-model never fetches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeData {
    pub featured_events: Vec<FeaturedEvent>,
    pub categories: Vec<Category>,
}

impl HomeData {
    /// Built-in sample data
    pub fn sample() -> Self {
        let event = |name: &str, date: &str, price: &str| FeaturedEvent { name: name.into(), date: date.into(), price: price.into() };
        let category = |name: &str| Category { name: name.into() };
        Self {
            featured_events: vec![
                event("Summer Music Festival", "2024-07-15", "$49.99"),
                event("Comedy Night", "2024-06-20", "$29.99"),
                event("Theater Show", "2024-06-25", "$39.99"),
            ],
            categories: vec![category("Concerts"), category("Sports"), category("Theater"), category("Festivals")],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(json) }
}

impl From<&FeaturedEvent> for Value {
    fn from(event: &FeaturedEvent) -> Self {
        Value::record([("name", event.name.as_str()), ("date", event.date.as_str()), ("price", event.price.as_str())])
    }
}

impl From<&Category> for Value {
    fn from(category: &Category) -> Self { Value::record([("name", category.name.as_str())]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_json_matches_sample() {
        let bundled = HomeData::from_json(include_str!("../data/home.json")).unwrap();
        assert_eq!(bundled, HomeData::sample());
    }

    #[test]
    fn test_category_value() {
        let value = Value::from(&Category { name: "Sports".into() });
        assert_eq!(value.field("name").and_then(Value::as_str), Some("Sports"));
    }
}
