//! Counter Example - Click handling and incremental re-render
//!
//! This example demonstrates the full render cycle:
//! - A component reading a signal at render time
//! - An `onClick` handler that bumps the signal and requests an update
//! - Time-sliced rendering on 1ms frames against the in-memory host
//! - The host mutations each click produces
//!
//! Run with: cargo run --example counter
//! Set `RUST_LOG=spark_fiber=debug` to see render passes.

use std::time::Duration;

use spark_signals::signal;
use spark_fiber::{
    create_element, Child, Component, Engine, EngineConfig, EngineError, EventHandler, FrameIdle,
    MemoryHost, Props,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== spark-fiber Counter Example ===\n");

    let host = MemoryHost::new();
    let container = host.create_container("root");
    let mut engine = Engine::new(host.clone(), EngineConfig::default());

    let count = signal(0i32);
    let count_for_app = count.clone();
    let handle = engine.handle();

    let app = Component::new("Counter", move |_props: &Props| {
        let count = count_for_app.clone();
        let handle = handle.clone();
        let on_click = EventHandler::new(move |_| {
            count.set(count.get() + 1);
            handle.request_update();
        });

        create_element(
            "div",
            Props::new().with("class", "counter"),
            vec![
                Child::from(format!("count：{}", count_for_app.get())),
                Child::from(create_element(
                    "button",
                    Props::new().with("onClick", on_click),
                    vec![Child::from("+1")],
                )),
            ],
        )
    });

    engine.render(create_element(app, Props::new(), vec![]), container)?;
    engine.run(frames())?;

    println!("Initial render:");
    println!("  {}", host.to_markup(container));
    println!("  {} host calls, stats {:?}\n", host.take_calls().len(), engine.last_stats());

    for click in 1..=3 {
        let Some(button) = host.find_element(container, "button") else {
            break;
        };
        host.dispatch(button, "click");
        engine.run(frames())?;

        println!("After click {click}:");
        println!("  {}", host.to_markup(container));
        for call in host.take_calls() {
            println!("    {call:?}");
        }
    }

    engine.stop();
    println!("\nFinal count: {}", count.get());
    println!("Host nodes: {}", host.node_count());

    Ok(())
}

/// A short burst of 1ms frames, enough to drain a small tree.
fn frames() -> FrameIdle {
    FrameIdle::new(Duration::from_millis(1), Duration::from_millis(4)).limit(16)
}
