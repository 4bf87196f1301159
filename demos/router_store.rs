//! Router Store
//!
//! This example demonstrates a session machine whose variants carry a
//! nested route machine.
//!
//! Key concepts:
//! - Wrapper kinds as payload-holding variants
//! - Partial updates that reach into nested machines
//! - Default rescue when a route is not legal for the session
//! - Pattern matching with `when`
//!
//! Run with: cargo run --example router_store

use variantstate::core::{Kind, StateMachine, Value};
use variantstate::{declare, record};

fn current_route(state: &StateMachine, logged_out: &Kind, logged_in: &Kind) -> String {
    let route = |payload: &Value| {
        payload
            .field("route")
            .and_then(Value::as_machine)
            .and_then(StateMachine::value)
            .map(Value::type_name)
    };

    state
        .when(logged_out, route)
        .when(logged_in, route)
        .collect()
        .flatten()
        .unwrap_or_else(|| "<none>".to_string())
}

fn main() {
    println!("=== Router Store Example ===\n");

    let logged_out = Kind::new("LoggedOut");
    let logged_in = Kind::new("LoggedIn");

    let public_routes = declare!("login", "home").default("login").build().unwrap();
    let private_routes = declare!("report", "home").default("home").build().unwrap();
    let session = declare!(&logged_out, &logged_in).build().unwrap();

    let mut store = session
        .init(logged_out.wrap(record! { "route" => public_routes.create().unwrap() }))
        .unwrap();
    println!("Started at: {}", current_route(&store, &logged_out, &logged_in));

    store.update(record! { "route" => "home" }).unwrap();
    println!("Navigated to: {}", current_route(&store, &logged_out, &logged_in));

    // "report" is not public, so the nested machine falls back to "login".
    store.update(record! { "route" => "report" }).unwrap();
    println!(
        "Asked for report, landed on: {}",
        current_route(&store, &logged_out, &logged_in)
    );

    store
        .set(logged_in.wrap(record! {
            "token" => "DEADBEEF",
            "route" => private_routes.init("report").unwrap(),
        }))
        .unwrap();
    println!("\nLogged in at: {}", current_route(&store, &logged_out, &logged_in));

    let token = store
        .when(&logged_in, |payload| {
            payload.field("token").and_then(Value::as_str).map(str::to_string)
        })
        .collect()
        .flatten();
    println!("Token: {}", token.unwrap_or_default());

    match store.update(record! { "theme" => "dark" }) {
        Ok(_) => println!("Unexpected: unknown field accepted"),
        Err(err) => println!("Rejected update: {err}"),
    }

    println!("\n=== Example Complete ===");
}
