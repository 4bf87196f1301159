//! Consensus
//!
//! This example demonstrates driving several machines to one agreed value.
//!
//! Key concepts:
//! - Intersections over independently declared machines
//! - Member defaults redirecting a rejected proposal
//! - Intersection-level default when no agreement is reached
//! - Subscriptions notified after each committed write
//!
//! Run with: cargo run --example consensus

use stillwater::validation::Validation;
use variantstate::core::{StateError, Value};
use variantstate::{declare, intersect};

fn main() {
    println!("=== Consensus Example ===\n");

    let evens = declare!(0, 2, 4, 6).default(2).build().unwrap();
    let small = declare!(1, 2, 3, 4).default(4).build().unwrap();

    let mut both = intersect([
        ("evens", evens.init(2).unwrap()),
        ("small", small.init(2).unwrap()),
    ])
    .default(2)
    .create()
    .unwrap();
    println!("Agreed on: {:?}", both.value());

    let id = both.subscribe(|value: &Value| println!("  listener saw {}", value.type_name()));

    // 3 is rejected by "evens", which proposes 2; both members accept it.
    println!("\nProposing 3");
    both.set(3).unwrap();
    println!("Agreed on: {:?}", both.value());

    // 6 is rejected by "small", which proposes 4.
    println!("\nProposing 6");
    both.set(6).unwrap();
    println!("Agreed on: {:?}", both.value());

    println!("\nChecking 7 without writing:");
    match both.check(&Value::from(7)) {
        Validation::Success(()) => println!("  accepted"),
        Validation::Failure(rejections) => {
            for rejection in rejections.iter() {
                println!("  {rejection}");
            }
        }
    }

    both.unsubscribe(id);

    let low = declare!(0, 1).build().unwrap();
    let high = declare!(2, 3).build().unwrap();
    let disjoint = intersect([
        ("low", low.init(0).unwrap()),
        ("high", high.init(2).unwrap()),
    ])
    .create();
    match disjoint {
        Ok(_) => println!("\nUnexpected: disjoint members agreed"),
        Err(StateError::InconsistentInitialState { member, .. }) => {
            println!("\nDisjoint members disagree at start ({member})")
        }
        Err(err) => println!("\nFailed: {err}"),
    }

    println!("\n=== Example Complete ===");
}
