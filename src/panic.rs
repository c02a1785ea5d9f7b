//! Conversion of caught panic payloads into reportable errors.
//!
//! Step bodies, release operations and run hooks are all user code. A panic
//! in any of them is caught at the call site and turned into [`Panicked`],
//! which carries the payload's message when it is a string.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use thiserror::Error;

/// A panic caught while running user code.
///
/// ```
/// use stepwise::panic::catch;
///
/// let caught = catch::<()>(|| panic!("boom")).unwrap_err();
/// assert_eq!(caught.message(), "boom");
/// assert_eq!(caught.to_string(), "panicked: boom");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("panicked: {message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    /// Build from a payload returned by [`std::panic::catch_unwind`].
    ///
    /// `String` and `&'static str` payloads keep their text; anything else is
    /// reported as an opaque payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else {
            "non-string panic payload".to_owned()
        };
        Self { message }
    }

    /// The panic message.
    #[must_use]
    pub fn message(&self) -> &str { &self.message }
}

/// Run `f`, converting a panic into [`Panicked`].
///
/// # Errors
///
/// Returns [`Panicked`] if `f` panics.
pub fn catch<T>(f: impl FnOnce() -> T) -> Result<T, Panicked> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| Panicked::from_payload(&*payload))
}
