//! Panic containment for external callbacks.
//!
//! Engine dispatch, host event delivery and the accessibility-change
//! listener are foreign code. A panic inside one of them is caught at the
//! call site and reported to the bridge's fault handler instead of
//! unwinding through the bridge and leaving the cache half updated.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use horizon_semantics_core::logging::targets;

/// A panic caught at a callback boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// The callback that panicked, e.g. `"engine.dispatch_action"`.
    pub operation: &'static str,
    pub message: String,
}

/// Receives faults caught by the bridge.
pub type FaultHandler = Box<dyn FnMut(&Fault)>;

fn log_fault(fault: &Fault) {
    tracing::error!(
        target: targets::BRIDGE,
        operation = fault.operation,
        message = %fault.message,
        "external callback panicked"
    );
}

pub(crate) struct FaultBoundary {
    handler: FaultHandler,
}

impl Default for FaultBoundary {
    fn default() -> Self {
        Self {
            handler: Box::new(log_fault),
        }
    }
}

impl FaultBoundary {
    pub(crate) fn set_handler(&mut self, handler: FaultHandler) {
        self.handler = handler;
    }

    /// Run `f`, returning `None` if it panicked.
    pub(crate) fn run<R>(&mut self, operation: &'static str, f: impl FnOnce() -> R) -> Option<R> {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => Some(result),
            Err(payload) => {
                let fault = Fault {
                    operation,
                    message: panic_message(payload.as_ref()),
                };
                (self.handler)(&fault);
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "callback panicked".to_owned())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_result_passes_through() {
        let mut boundary = FaultBoundary::default();
        assert_eq!(boundary.run("test", || 7), Some(7));
    }

    #[test]
    fn test_panic_reported() {
        let faults = Rc::new(RefCell::new(Vec::new()));
        let sink = faults.clone();
        let mut boundary = FaultBoundary::default();
        boundary.set_handler(Box::new(move |fault: &Fault| sink.borrow_mut().push(fault.clone())));

        let result: Option<()> = boundary.run("engine.dispatch_action", || panic!("engine gone"));

        assert_eq!(result, None);
        let faults = faults.borrow();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].operation, "engine.dispatch_action");
        assert_eq!(faults[0].message, "engine gone");
    }

    #[test]
    fn test_formatted_panic_message() {
        let faults = Rc::new(RefCell::new(Vec::new()));
        let sink = faults.clone();
        let mut boundary = FaultBoundary::default();
        boundary.set_handler(Box::new(move |fault: &Fault| {
            sink.borrow_mut().push(fault.message.clone())
        }));

        let code = 3;
        let result: Option<()> = boundary.run("host.send_event", || panic!("bad code {code}"));
        assert!(result.is_none());
        assert_eq!(faults.borrow().as_slice(), ["bad code 3".to_owned()]);
    }
}
