//! Property tests for element id allocation and reload fidelity.

use std::sync::Arc;

use builder_core::{ElementStore, ElementStyle, MemoryStore, Position};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    DeleteNth(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-z]{1,8}".prop_map(Op::Create),
        1 => (0usize..8).prop_map(Op::DeleteNth),
    ]
}

proptest! {
    #[test]
    fn ids_strictly_increase_in_creation_order(ops in prop::collection::vec(op(), 1..40)) {
        let mut store = ElementStore::new(MemoryStore::new());
        let mut issued = Vec::new();

        for op in ops {
            match op {
                Op::Create(kind) => {
                    let handle = store
                        .create_element(kind, "", Position::default(), ElementStyle::default())
                        .expect("create");
                    issued.push(store.get(handle).expect("live").id);
                }
                Op::DeleteNth(n) => {
                    let handle = store.elements().nth(n).map(|(h, _)| h);
                    if let Some(handle) = handle {
                        store.delete_element(handle).expect("delete");
                    }
                }
            }
        }

        prop_assert!(issued.windows(2).all(|w| w[0] < w[1]));
        let live: Vec<_> = store.elements().map(|(_, e)| e.id).collect();
        prop_assert!(live.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn reload_reproduces_elements(
        positions in prop::collection::vec((-2000i32..2000, -2000i32..2000), 0..12),
    ) {
        let sink = Arc::new(MemoryStore::new());
        let mut store = ElementStore::new(Arc::clone(&sink));
        for (x, y) in positions {
            store
                .create_element(
                    "box",
                    format!("{x},{y}"),
                    Position::new(f64::from(x), f64::from(y)),
                    ElementStyle::new(format!("{}px", x.rem_euclid(40)), "bold"),
                )
                .expect("create");
        }

        let reloaded = ElementStore::load(Arc::clone(&sink)).expect("load");
        prop_assert_eq!(reloaded.snapshot(), store.snapshot());
    }
}
