use std::cell::RefCell;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use tracing::error;

#[derive(Default)]
struct ContextState {
    entries: BTreeMap<String, String>,
    depth: usize,
}

thread_local! {
    static CONTEXT: RefCell<ContextState> = RefCell::new(ContextState::default());
}

/// Returns the current thread's value for `key`.
pub fn get(key: &str) -> Option<String> {
    CONTEXT.with(|context| context.borrow().entries.get(key).cloned())
}

/// Returns a copy of all entries of the current thread.
pub fn snapshot() -> BTreeMap<String, String> {
    CONTEXT.with(|context| context.borrow().entries.clone())
}

/// Handle on the diagnostic context of the current call.
///
/// Every key put through the scope gets its previous value (or absence) restored when the
/// scope is restored, either explicitly with [`Self::restore`] or on drop. Scopes are bound
/// to the thread that entered them and must be released in reverse order of entry.
pub struct ContextScope {
    previous: Vec<(String, Option<String>)>,
    depth: usize,
    restored: bool,

    _thread_bound: PhantomData<*const ()>,
}

impl ContextScope {
    pub fn enter() -> Self {
        let depth = CONTEXT.with(|context| {
            let mut context = context.borrow_mut();
            context.depth += 1;
            context.depth
        });

        Self {
            previous: vec![],
            depth,
            restored: false,
            _thread_bound: PhantomData,
        }
    }

    pub fn put(&mut self, key: &str, value: &str) {
        let old = CONTEXT.with(|context| context.borrow_mut().entries.insert(key.to_string(), value.to_string()));

        if !self.previous.iter().any(|(k, _)| k == key) {
            self.previous.push((key.to_string(), old));
        }
    }

    /// Keys touched by this scope, in the order they were first put.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.previous.iter().map(|(k, _)| k.as_str())
    }

    pub fn restore(mut self) {
        self.restore_entries();
    }

    fn restore_entries(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        let previous = std::mem::take(&mut self.previous);
        let current_depth = CONTEXT.with(|context| {
            let mut context = context.borrow_mut();
            for (key, value) in previous.into_iter().rev() {
                match value {
                    Some(value) => context.entries.insert(key, value),
                    None => context.entries.remove(&key),
                };
            }

            let current_depth = context.depth;
            context.depth = context.depth.saturating_sub(1);
            current_depth
        });

        if current_depth != self.depth {
            error!(expected = self.depth, actual = current_depth, "diagnostic context restored out of order");
            debug_assert_eq!(current_depth, self.depth, "diagnostic context restored out of order");
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        self.restore_entries()
    }
}
