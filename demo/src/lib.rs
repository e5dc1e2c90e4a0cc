//! A thin home-screen view-model built on `bindery-signals`.
//!
//! The domain data is injected through [`HomeData`]; nothing here fetches or persists it.

pub mod data;
pub mod home;

pub use data::{Category, FeaturedEvent, HomeData};
pub use home::{HomeViewModel, CATEGORIES, FEATURED_EVENTS, SELECTED_CATEGORY};
