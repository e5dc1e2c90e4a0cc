/*!
Observable property-change notification for bindery

# Design requirements:
- Single object, synchronous, same thread. `notify` returns only after every listener of the pass has run.
- Delivery order is registration order; named listeners first, then wildcard listeners.
- Each delivery pass works on a snapshot, so listeners may subscribe, unsubscribe and notify re-entrantly.
- The subject never owns its observers: unsubscribe with the handle, drop a guard, or register a `Weak` observer.
- A failing listener never stops delivery to the others; failures are reported together after the pass.

# Nomenclature:
- `Subject` - manages subscriptions and dispatches change events
- `Bindable` - a subject that also tracks named property values and announces changes to them
- `Channel::Any` - the wildcard channel, receives every event regardless of name

# Basic usage

```rust
use bindery_signals::*;

let holder = Bindable::with_values([("categories", Value::list(["Concerts", "Sports"]))]);

let handle = holder.subscribe(PROPERTY_CHANGE, |event: &ChangeEvent| {
    println!("{} changed to {:?}", event.property().unwrap_or_default(), event.value());
});

holder.set("title", "Home").unwrap(); // prints: title changed to Some(String("Home"))
holder.set("title", "Home").unwrap(); // unchanged, nothing is printed
holder.unsubscribe(handle);
```
*/

pub mod bindable;
pub mod error;
pub mod event;
pub mod listener;
pub mod registry;
pub mod subject;
pub mod value;

pub use bindable::*;
pub use error::*;
pub use event::*;
pub use listener::*;
pub use registry::*;
pub use subject::*;
pub use value::*;
