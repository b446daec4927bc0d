//! Property tests: the registry stays a bijection under any add/remove mix.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use webview_bridge::{Error, Instance, InstanceId, InstanceRegistry};

#[derive(Debug, Clone)]
enum Op {
    /// Register object `object` under remote id `id`.
    Add { object: usize, id: i64 },
    /// Register object `object` under a host-created id.
    AddHost { object: usize },
    Remove { id: i64 },
}

const OBJECTS: usize = 6;

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..OBJECTS, 0_i64..8).prop_map(|(object, id)| Op::Add { object, id }),
        (0..OBJECTS).prop_map(|object| Op::AddHost { object }),
        (0_i64..8).prop_map(|id| Op::Remove { id }),
    ]
}

fn id(value: i64) -> InstanceId {
    InstanceId::new(value).expect("valid instance id")
}

proptest! {
    #[test]
    fn registry_matches_model(ops in proptest::collection::vec(op(), 1..40)) {
        let registry = InstanceRegistry::new();
        let objects: Vec<Arc<u32>> = (0..OBJECTS as u32).map(Arc::new).collect();

        // id -> object index
        let mut model: HashMap<i64, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Add { object, id: raw } => {
                    let result = registry.add(Instance::object(Arc::clone(&objects[object])), id(raw));
                    let owner = model.iter().find(|(_, o)| **o == object).map(|(i, _)| *i);

                    if model.contains_key(&raw) {
                        let duplicate_id = matches!(result, Err(Error::DuplicateId { .. }));
                        prop_assert!(duplicate_id, "expected DuplicateId, got {:?}", result);
                    } else if owner.is_some() {
                        let duplicate_object = matches!(result, Err(Error::DuplicateObject { .. }));
                        prop_assert!(duplicate_object, "expected DuplicateObject, got {:?}", result);
                    } else {
                        prop_assert!(result.is_ok(), "expected add to succeed, got {:?}", result);
                        model.insert(raw, object);
                    }
                }
                Op::AddHost { object } => {
                    let result = registry.add_host_created(Instance::object(Arc::clone(&objects[object])));
                    let owned = model.values().any(|o| *o == object);

                    if owned {
                        let duplicate_object = matches!(result, Err(Error::DuplicateObject { .. }));
                        prop_assert!(duplicate_object, "expected DuplicateObject, got {:?}", result);
                    } else {
                        let assigned = result.expect("host id assigned");
                        prop_assert!(assigned.get() >= registry.min_host_identifier());
                        prop_assert!(!model.contains_key(&assigned.get()));
                        model.insert(assigned.get(), object);
                    }
                }
                Op::Remove { id: raw } => {
                    let removed = registry.remove(id(raw));
                    prop_assert_eq!(removed.is_some(), model.remove(&raw).is_some());

                    prop_assert!(registry.remove(id(raw)).is_none());
                    let not_found = matches!(registry.get(id(raw)), Err(Error::NotFound { .. }));
                    prop_assert!(not_found, "expected NotFound after remove of {}", raw);
                }
            }

            prop_assert_eq!(registry.len(), model.len());
        }

        for (raw, object) in &model {
            let stored = registry.get_object::<u32>(id(*raw)).expect("registered object");
            prop_assert!(Arc::ptr_eq(&stored, &objects[*object]));
            prop_assert_eq!(registry.identifier_for(&objects[*object]), Some(id(*raw)));
        }

        for (index, object) in objects.iter().enumerate() {
            if !model.values().any(|o| *o == index) {
                prop_assert_eq!(registry.identifier_for(object), None);
            }
        }
    }
}
