use std::fmt;

/// An ordered list of subscriber callbacks.
///
/// Callbacks fire synchronously on the caller's stack, in registration
/// order. They receive a borrowed payload value rather than the emitting
/// object, so a handler cannot re-enter the engine's mutating operations.
pub struct CallbackList<T> {
    callbacks: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> CallbackList<T> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    pub fn push(&mut self, callback: impl FnMut(&T) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn fire(&mut self, payload: &T) {
        for callback in &mut self.callbacks {
            callback(payload);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T> Default for CallbackList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CallbackList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.callbacks.len())
            .finish()
    }
}
