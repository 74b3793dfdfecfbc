//! End-to-end counter app.
//!
//! A component renders a text node `count：N` and a button whose click
//! handler bumps a signal and requests a re-render. Driven entirely by
//! synthetic slices against the in-memory host.
//!
//! Run with: cargo test --test counter

use spark_signals::{signal, Signal};
use spark_fiber::{
    create_element, Child, Component, Engine, EngineConfig, EngineHandle, EventHandler, HostCall,
    MemoryHost, NodeId, PropValue, Props, StepBudget, TEXT_VALUE_PROP,
};

fn counter_app(count: Signal<i32>, handle: EngineHandle) -> Component {
    Component::new("Counter", move |_props: &Props| {
        let count_for_click = count.clone();
        let handle_for_click = handle.clone();
        let on_click = EventHandler::new(move |_| {
            count_for_click.set(count_for_click.get() + 1);
            handle_for_click.request_update();
        });

        create_element(
            "div",
            Props::new(),
            vec![
                Child::from(format!("count：{}", count.get())),
                Child::from(create_element(
                    "button",
                    Props::new().with("onClick", on_click),
                    vec![Child::from("+1")],
                )),
            ],
        )
    })
}

fn drain(engine: &mut Engine<MemoryHost>) -> usize {
    let mut slices = 1;
    while engine.run_slice(&StepBudget::new(2)).unwrap() {
        slices += 1;
    }
    slices
}

struct Mounted {
    host: MemoryHost,
    container: NodeId,
    engine: Engine<MemoryHost>,
    count: Signal<i32>,
}

fn mount() -> Mounted {
    let host = MemoryHost::new();
    let container = host.create_container("root");
    let mut engine = Engine::new(host.clone(), EngineConfig::default());
    let count = signal(0);

    let app = counter_app(count.clone(), engine.handle());
    engine
        .render(create_element(app, Props::new(), vec![]), container)
        .unwrap();
    drain(&mut engine);

    Mounted {
        host,
        container,
        engine,
        count,
    }
}

#[test]
fn test_initial_render() {
    let Mounted { host, container, engine, .. } = mount();

    assert_eq!(
        host.to_markup(container),
        "<root><div>count：0<button>+1</button></div></root>"
    );

    let div = host.children(container)[0];
    let children = host.children(div);
    assert_eq!(children.len(), 2);
    assert_eq!(host.text(children[0]), Some("count：0".to_string()));
    assert_eq!(host.listeners(children[1], "click").len(), 1);

    let stats = engine.last_stats().unwrap();
    // root, Counter, div, text, button, "+1"
    assert_eq!(stats.units, 6);
    assert_eq!(stats.created, 4);
    assert_eq!(stats.placed, 4);
    assert_eq!(stats.updated, 0);
}

#[test]
fn test_click_rerenders_in_place() {
    let Mounted { host, container, mut engine, count } = mount();

    let div = host.children(container)[0];
    let children = host.children(div);
    let [text, button] = children[..] else {
        panic!("expected text and button");
    };
    let old_handler = host.listeners(button, "click").remove(0);
    let created_before = host.node_count();
    host.take_calls();

    assert_eq!(host.dispatch(button, "click"), 1);
    assert_eq!(count.get(), 1);
    assert!(engine.handle().update_pending());

    drain(&mut engine);

    // Same host nodes, new content.
    assert_eq!(host.children(container), vec![div]);
    assert_eq!(host.children(div), vec![text, button]);
    assert_eq!(host.node_count(), created_before);
    assert_eq!(host.text(text), Some("count：1".to_string()));

    // The click listener was swapped for the new closure.
    let handlers = host.listeners(button, "click");
    assert_eq!(handlers.len(), 1);
    assert!(!handlers[0].ptr_eq(&old_handler));

    assert_eq!(
        host.take_calls(),
        vec![
            HostCall::SetProperty {
                node: text,
                name: TEXT_VALUE_PROP.to_string(),
                value: PropValue::from("count：1"),
            },
            HostCall::RemoveListener {
                node: button,
                event: "click".to_string(),
            },
            HostCall::AddListener {
                node: button,
                event: "click".to_string(),
            },
        ]
    );

    let stats = engine.last_stats().unwrap();
    assert_eq!(stats.created, 0);
    assert_eq!(stats.placed, 0);
    assert_eq!(stats.updated, 4);
}

#[test]
fn test_repeated_clicks_accumulate() {
    let Mounted { host, container, mut engine, count } = mount();

    for _ in 0..3 {
        let button = host.find_element(container, "button").unwrap();
        host.dispatch(button, "click");
        drain(&mut engine);
    }

    assert_eq!(count.get(), 3);
    assert_eq!(
        host.to_markup(container),
        "<root><div>count：3<button>+1</button></div></root>"
    );
    let button = host.find_element(container, "button").unwrap();
    assert_eq!(host.listeners(button, "click").len(), 1);
}

#[test]
fn test_clicks_between_slices_collapse() {
    let Mounted { host, container, mut engine, count } = mount();
    let button = host.find_element(container, "button").unwrap();

    host.dispatch(button, "click");
    host.dispatch(button, "click");
    drain(&mut engine);

    assert_eq!(count.get(), 2);
    assert_eq!(
        host.to_markup(container),
        "<root><div>count：2<button>+1</button></div></root>"
    );
}
