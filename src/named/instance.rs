//! Wrapper that keeps named payloads distinct from unnamed services of the same type.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::registration::{downcast_service, erase, AnyArc};

/// Payload of every fallback (compound key) registration.
pub(crate) struct NamedInstance {
    service: AnyArc,
}

impl NamedInstance {
    pub(crate) fn wrap(service: AnyArc) -> AnyArc {
        erase(Arc::new(NamedInstance { service }))
    }

    pub(crate) fn unwrap(payload: AnyArc) -> DiResult<AnyArc> {
        downcast_service::<NamedInstance>(payload)
            .map(|wrapper| wrapper.service.clone())
            .map_err(|_| DiError::InvalidState("named service payload is not a named instance".to_string()))
    }
}
