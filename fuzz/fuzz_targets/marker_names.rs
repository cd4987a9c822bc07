#![no_main]

use libfuzzer_sys::fuzz_target;
use named_di::{MarkerRegistry, NamedKeyBuilder, ServiceType};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Names are separated by '/'; markers must agree with case folding
    let markers = Arc::new(MarkerRegistry::new());
    let names: Vec<&str> = text.split('/').collect();

    for a in &names {
        for b in &names {
            match (markers.get_or_create(a), markers.get_or_create(b)) {
                (Ok(ma), Ok(mb)) => assert_eq!(ma == mb, a.to_lowercase() == b.to_lowercase()),
                (Err(_), _) => assert!(a.is_empty()),
                (_, Err(_)) => assert!(b.is_empty()),
            }
        }
    }

    let keys = NamedKeyBuilder::new(markers.clone());
    for name in names.iter().filter(|n| !n.is_empty()) {
        let key = keys.build_key(&ServiceType::of::<u8>(), name).expect("non-empty name");
        let again = keys.build_key(&ServiceType::of::<u8>(), &name.to_lowercase()).expect("non-empty name");
        assert_eq!(key, again);
    }
});
