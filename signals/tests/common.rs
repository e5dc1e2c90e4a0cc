use std::str::FromStr;
use std::sync::{Arc, Mutex};

use bindery_signals::ChangeEvent;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
unsafe fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    let level = std::env::var("LOG_LEVEL").ok().and_then(|level| Level::from_str(&level).ok()).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_test_writer().try_init();
}

/// Returns a listener that formats each event it receives, and a check function that drains what
/// has been accumulated so far.
#[allow(unused)]
pub fn watcher(tag: &'static str) -> (impl Fn(&ChangeEvent) + Send + Sync + 'static, impl Fn() -> Vec<String>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let accumulate = {
        let changes = changes.clone();
        move |event: &ChangeEvent| {
            let mut line = format!("{tag}:{}", event.name());
            if let Some(value) = event.value() {
                line.push_str(&format!("={value}"));
            }
            changes.lock().unwrap().push(line);
        }
    };

    let check = move || changes.lock().unwrap().drain(..).collect::<Vec<String>>();

    (accumulate, check)
}

/// A shared log that several listeners can push into, to observe interleaving.
#[allow(unused)]
#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

#[allow(unused)]
impl Trace {
    pub fn push(&self, entry: impl Into<String>) { self.0.lock().unwrap().push(entry.into()) }

    pub fn take(&self) -> Vec<String> { self.0.lock().unwrap().drain(..).collect() }
}
