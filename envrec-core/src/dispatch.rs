//! Payload dispatch keyed on message identifier
//!
//! The dispatcher is a pure routing table: it inspects a decoded envelope's
//! `data_type` and hands the raw payload to whichever handler registered for
//! it. Handlers are injected capabilities; the core stays decoupled from any
//! payload codec or presentation mechanism.

use crate::error::RecError;
use crate::types::Envelope;
#[cfg(feature = "logging")]
use crate::types::MessageKind;
use std::collections::HashMap;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// A type-specific payload consumer
///
/// Invoked once per recognized envelope, synchronously, in stream order,
/// with the exact payload bytes as carried by the envelope.
pub trait PayloadHandler {
    /// Interpret one payload of the given message identifier
    fn handle(&mut self, data_type: i32, payload: &[u8]) -> Result<(), RecError>;
}

impl<F> PayloadHandler for F
where
    F: FnMut(i32, &[u8]) -> Result<(), RecError>,
{
    fn handle(&mut self, data_type: i32, payload: &[u8]) -> Result<(), RecError> {
        self(data_type, payload)
    }
}

/// Routing table from message identifier to handler
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<i32, Box<dyn PayloadHandler>>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `data_type`, replacing any previous entry
    pub fn register<H>(&mut self, data_type: i32, handler: H) -> &mut Self
    where
        H: PayloadHandler + 'static,
    {
        self.handlers.insert(data_type, Box::new(handler));
        self
    }

    /// Whether a handler is registered for `data_type`
    pub fn is_registered(&self, data_type: i32) -> bool {
        self.handlers.contains_key(&data_type)
    }

    /// Route one envelope's payload to its handler
    ///
    /// Returns `Ok(true)` if a handler consumed the payload, `Ok(false)` if
    /// no handler is registered for the identifier (the envelope is dropped),
    /// or the handler's error.
    pub fn dispatch(&mut self, envelope: &Envelope) -> Result<bool, RecError> {
        match self.handlers.get_mut(&envelope.data_type) {
            Some(handler) => {
                #[cfg(feature = "logging")]
                debug!(
                    data_type = envelope.data_type,
                    sender_stamp = envelope.sender_stamp,
                    kind = MessageKind::from_id(envelope.data_type).map(|k| k.name()),
                    "dispatching payload"
                );
                handler.handle(envelope.data_type, &envelope.payload)?;
                Ok(true)
            }
            None => {
                #[cfg(feature = "logging")]
                trace!(
                    data_type = envelope.data_type,
                    sender_stamp = envelope.sender_stamp,
                    "no handler registered, dropping envelope"
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GROUND_STEERING_REQUEST, IMAGE_READING};
    use bytes::Bytes;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn envelope_of(data_type: i32, payload: &'static [u8]) -> Envelope {
        Envelope {
            data_type,
            payload: Bytes::from_static(payload),
            ..Envelope::default()
        }
    }

    #[test]
    fn test_routes_only_to_matching_handler() {
        let calls: Rc<RefCell<Vec<(i32, Vec<u8>)>>> = Rc::new(RefCell::new(Vec::new()));

        let mut dispatcher = Dispatcher::new();
        for id in [IMAGE_READING, GROUND_STEERING_REQUEST] {
            let calls = Rc::clone(&calls);
            dispatcher.register(id, move |data_type: i32, payload: &[u8]| {
                calls.borrow_mut().push((data_type, payload.to_vec()));
                Ok(())
            });
        }

        assert!(dispatcher
            .dispatch(&envelope_of(GROUND_STEERING_REQUEST, b"gsr"))
            .unwrap());
        assert!(dispatcher.dispatch(&envelope_of(IMAGE_READING, b"img")).unwrap());
        assert!(!dispatcher.dispatch(&envelope_of(0, b"zero")).unwrap());
        assert!(!dispatcher.dispatch(&envelope_of(9999, b"other")).unwrap());

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (GROUND_STEERING_REQUEST, b"gsr".to_vec()));
        assert_eq!(calls[1], (IMAGE_READING, b"img".to_vec()));
    }

    #[test]
    fn test_handler_error_surfaces() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(42, |_: i32, _: &[u8]| {
            Err(RecError::Handler("payload rejected".into()))
        });

        let result = dispatcher.dispatch(&envelope_of(42, b""));
        assert!(matches!(result, Err(RecError::Handler(_))));
    }

    #[test]
    fn test_register_replaces_previous_handler() {
        let count = Rc::new(RefCell::new(0u32));

        let mut dispatcher = Dispatcher::new();
        dispatcher.register(7, |_: i32, _: &[u8]| Ok(()));
        {
            let count = Rc::clone(&count);
            dispatcher.register(7, move |_: i32, _: &[u8]| {
                *count.borrow_mut() += 1;
                Ok(())
            });
        }

        dispatcher.dispatch(&envelope_of(7, b"")).unwrap();
        assert_eq!(*count.borrow(), 1);
        assert!(dispatcher.is_registered(7));
        assert!(!dispatcher.is_registered(8));
    }
}
