//! Grouped teardown for listeners and command registrations.

/// Undoes a single registration. Calling it is the only way to unregister;
/// dropping it without calling leaves the registration in place.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// Ordered set of disposers that are run together, exactly once.
///
/// Dropping the group disposes it. Members that never registered can be
/// added as `None` and are skipped.
#[derive(Default)]
pub struct SubscriptionGroup {
    disposers: Vec<Unsubscribe>,
    disposed: bool,
}

impl std::fmt::Debug for SubscriptionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGroup")
            .field("len", &self.disposers.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl SubscriptionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member. If the group was already disposed the member is disposed immediately.
    pub fn add(&mut self, disposer: impl Into<Option<Unsubscribe>>) {
        let Some(disposer) = disposer.into() else {
            return;
        };
        if self.disposed {
            disposer();
        } else {
            self.disposers.push(disposer);
        }
    }

    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Run every disposer in registration order. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let disposers = std::mem::take(&mut self.disposers);
        tracing::trace!(
            target: "weaver::link_editor::subscriptions",
            count = disposers.len(),
            "disposing subscription group"
        );
        for disposer in disposers {
            disposer();
        }
    }

    /// Collapse the group into a single disposer.
    pub fn into_unsubscribe(mut self) -> Unsubscribe {
        let disposers = std::mem::take(&mut self.disposers);
        self.disposed = true;
        Box::new(move || {
            for disposer in disposers {
                disposer();
            }
        })
    }
}

impl Drop for SubscriptionGroup {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Combine several registrations into one disposer.
pub fn merge_register(disposers: impl IntoIterator<Item = Unsubscribe>) -> Unsubscribe {
    let mut group = SubscriptionGroup::new();
    for disposer in disposers {
        group.add(disposer);
    }
    group.into_unsubscribe()
}
