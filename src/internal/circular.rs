//! Circular dependency detection infrastructure.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{DiError, DiResult};

const MAX_DEPTH: usize = 1024;

// Per-thread stack of keys currently being resolved
thread_local! {
    static RESOLUTION_TLS: RefCell<ResolutionTls> = RefCell::new(ResolutionTls::default());
}

#[derive(Default)]
struct ResolutionTls {
    stack: Vec<String>,
}

/// Panic payload carrying the cycle, e.g. `["A", "B", "A"]`.
#[derive(Debug)]
pub(crate) struct CircularPanic {
    path: Vec<String>,
}

pub(crate) struct StackGuard;

impl StackGuard {
    pub(crate) fn new(name: String) -> Self {
        RESOLUTION_TLS.with(|tls| {
            let mut tls = tls.borrow_mut();

            // Checked before pushing so the path ends on the repeated key
            if tls.stack.iter().any(|n| *n == name) {
                let mut path = tls.stack.clone();
                path.push(name);
                drop(tls);
                panic::panic_any(CircularPanic { path });
            }

            if tls.stack.len() >= MAX_DEPTH {
                let depth = tls.stack.len();
                drop(tls);
                panic::panic_any(DiError::DepthExceeded(depth));
            }

            tls.stack.push(name);
        });

        StackGuard
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            tls.borrow_mut().stack.pop();
        });
    }
}

/// Runs `f` with `name` on the resolution stack, turning a detected cycle
/// anywhere below into [`DiError::Circular`].
pub(crate) fn with_circular_catch<T, F>(name: String, f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    let _guard = StackGuard::new(name);

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            if let Some(circular) = payload.downcast_ref::<CircularPanic>() {
                Err(DiError::Circular(circular.path.clone()))
            } else if let Some(error) = payload.downcast_ref::<DiError>() {
                Err(error.clone())
            } else {
                panic::resume_unwind(payload)
            }
        }
    }
}
