#![no_main]

use libfuzzer_sys::fuzz_target;
use named_di::{MarkerRegistry, NamedServices, ServiceCollection};
use std::sync::Arc;

const NAMES: [&str; 4] = ["a", "B", "ab", "Ab"];

fuzz_target!(|data: &[u8]| {
    let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
    let mut fallback = ServiceCollection::new();
    let mut native = ServiceCollection::with_native_naming();

    // Each byte registers its value under one of the names
    for byte in data.iter().take(64) {
        let name = NAMES[(*byte as usize) % NAMES.len()];
        for sc in [&mut fallback, &mut native] {
            named
                .add_singleton_instance_as::<u8, _, _>(sc, name, Arc::new(*byte))
                .expect("valid registration");
        }
    }

    let fallback = fallback.build();
    let native = native.build();

    for name in NAMES {
        let left: Vec<u8> = named.get_all_named::<u8, _>(&fallback, name).unwrap().iter().map(|v| **v).collect();
        let right: Vec<u8> = named.get_all_named::<u8, _>(&native, name).unwrap().iter().map(|v| **v).collect();
        assert_eq!(left, right);
    }
});
