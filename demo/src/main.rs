use anyhow::{Context, Result};
use bindery_demo::{HomeData, HomeViewModel};
use bindery_signals::{ChangeEvent, Channel, Observable};
use std::str::FromStr;
use tracing::{info, Level};

fn main() -> Result<()> {
    // initialize tracing
    let level = std::env::var("LOG_LEVEL").ok().and_then(|level| Level::from_str(&level).ok()).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    // Sample data unless a JSON file is given
    let data = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            HomeData::from_json(&json).with_context(|| format!("parsing {path}"))?
        }
        None => HomeData::sample(),
    };

    let view_model = HomeViewModel::new(data);

    // Stand-in for the rendering layer
    let binding = view_model.subscribe(Channel::Any, |event: &ChangeEvent| info!("render {event}"));

    view_model.refresh();
    view_model.on_category_tap(1);
    view_model.on_category_tap(1);
    view_model.on_category_tap(7);

    view_model.unsubscribe(binding);
    Ok(())
}
