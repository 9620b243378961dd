//! Scoped outside-activation watchers.
//!
//! A watcher fires when the user clicks outside its region or presses Escape/Enter. Watchers are
//! owned through a [`WatchGuard`]; dropping the guard detaches the listener, so nothing fires
//! after the owning view is gone.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque id of an on-screen region (the tree list, a toolbar, ...).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RegionId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// `hit` lists every region containing the click target, outermost first.
    Click { hit: Vec<RegionId> },
    Key(Key),
}

impl Gesture {
    pub fn click(hit: impl IntoIterator<Item = RegionId>) -> Self {
        Self::Click {
            hit: hit.into_iter().collect(),
        }
    }
}

/// How long a watcher stays attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum WatchMode {
    /// Until the guard is dropped.
    #[default]
    Persistent,
    /// Clicks and keys each fire once. The watcher detaches after both have fired, or
    /// when the guard is dropped.
    Once,
}

type Callback = Box<dyn FnMut(&Gesture)>;

struct Listener {
    id: u64,
    region: RegionId,
    mode: WatchMode,
    click_armed: bool,
    key_armed: bool,
    // Taken out while the callback runs.
    callback: Option<Callback>,
}

impl Listener {
    fn triggered_by(&self, gesture: &Gesture) -> bool {
        match gesture {
            Gesture::Click { hit } => self.click_armed && !hit.contains(&self.region),
            Gesture::Key(Key::Escape | Key::Enter) => self.key_armed,
            Gesture::Key(Key::Other(_)) => false,
        }
    }

    fn disarm(&mut self, gesture: &Gesture) {
        match gesture {
            Gesture::Click { .. } => self.click_armed = false,
            Gesture::Key(_) => self.key_armed = false,
        }
    }
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Single-threaded gesture dispatcher. Clones share the same listener table.
#[derive(Clone, Default)]
pub struct GestureHub {
    inner: Rc<RefCell<HubInner>>,
}

impl GestureHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `callback` to fire on activations outside `region`.
    pub fn watch_outside(
        &self,
        region: RegionId,
        mode: WatchMode,
        callback: impl FnMut(&Gesture) + 'static,
    ) -> WatchGuard {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.push(Listener {
            id,
            region,
            mode,
            click_armed: true,
            key_armed: true,
            callback: Some(Box::new(callback)),
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(id, region = region.0, ?mode, "outside watcher attached");

        WatchGuard {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver `gesture` to every listener it triggers. Returns how many fired.
    ///
    /// Callbacks may attach or drop watchers on this hub while running.
    pub fn dispatch(&self, gesture: &Gesture) -> usize {
        let targets: Vec<u64> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.triggered_by(gesture))
            .map(|listener| listener.id)
            .collect();

        let mut fired = 0;
        for id in targets {
            let taken = {
                let mut inner = self.inner.borrow_mut();
                let taken = inner
                    .listeners
                    .iter_mut()
                    .find(|listener| listener.id == id)
                    .and_then(|listener| listener.callback.take().map(|cb| (cb, listener.mode)));
                taken
            };
            let Some((mut callback, mode)) = taken else {
                continue;
            };
            callback(gesture);
            fired += 1;

            let mut inner = self.inner.borrow_mut();
            // Gone if the callback dropped its own guard.
            let Some(listener) = inner.listeners.iter_mut().find(|l| l.id == id) else {
                continue;
            };
            if mode == WatchMode::Once {
                listener.disarm(gesture);
            }
            if listener.click_armed || listener.key_armed {
                listener.callback = Some(callback);
            } else {
                inner.listeners.retain(|listener| listener.id != id);
            }
        }
        fired
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Keeps a watcher attached for as long as it lives.
#[must_use = "dropping the guard detaches the watcher immediately"]
pub struct WatchGuard {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl WatchGuard {
    /// False once the watcher fired in [`WatchMode::Once`] or the hub is gone.
    pub fn is_attached(&self) -> bool {
        let Some(inner) = self.hub.upgrade() else {
            return false;
        };
        let attached = inner.borrow().listeners.iter().any(|l| l.id == self.id);
        attached
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            inner
                .borrow_mut()
                .listeners
                .retain(|listener| listener.id != self.id);

            #[cfg(feature = "tracing")]
            tracing::trace!(id = self.id, "outside watcher detached");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const TREE: RegionId = RegionId(1);
    const ROW: RegionId = RegionId(2);
    const TOOLBAR: RegionId = RegionId(3);

    fn counter() -> (Rc<Cell<usize>>, impl FnMut(&Gesture) + 'static) {
        let hits = Rc::new(Cell::new(0));
        let sink = hits.clone();
        (hits, move |_: &Gesture| sink.set(sink.get() + 1))
    }

    #[test]
    fn fires_on_outside_click_and_confirm_keys_only() {
        let hub = GestureHub::new();
        let (hits, cb) = counter();
        let _guard = hub.watch_outside(TREE, WatchMode::Persistent, cb);

        assert_eq!(hub.dispatch(&Gesture::click([TREE, ROW])), 0);
        assert_eq!(hub.dispatch(&Gesture::Key(Key::Other("a".into()))), 0);
        assert_eq!(hub.dispatch(&Gesture::click([TOOLBAR])), 1);
        assert_eq!(hub.dispatch(&Gesture::Key(Key::Escape)), 1);
        assert_eq!(hub.dispatch(&Gesture::Key(Key::Enter)), 1);
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn dropping_guard_detaches() {
        let hub = GestureHub::new();
        let (hits, cb) = counter();
        let guard = hub.watch_outside(TREE, WatchMode::Persistent, cb);
        assert_eq!(hub.listener_count(), 1);
        drop(guard);
        assert_eq!(hub.listener_count(), 0);
        hub.dispatch(&Gesture::Key(Key::Escape));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn once_mode_spends_clicks_and_keys_separately() {
        let hub = GestureHub::new();
        let (hits, cb) = counter();
        let guard = hub.watch_outside(TREE, WatchMode::Once, cb);
        assert_eq!(hub.dispatch(&Gesture::click([TOOLBAR])), 1);
        assert_eq!(hub.dispatch(&Gesture::click([TOOLBAR])), 0);
        assert!(guard.is_attached());

        assert_eq!(hub.dispatch(&Gesture::Key(Key::Escape)), 1);
        assert_eq!(hub.dispatch(&Gesture::Key(Key::Enter)), 0);
        assert_eq!(hits.get(), 2);
        assert!(!guard.is_attached());
    }

    #[test]
    fn callback_may_drop_another_guard() {
        let hub = GestureHub::new();
        let (hits, cb) = counter();
        let victim = Rc::new(RefCell::new(Some(hub.watch_outside(TREE, WatchMode::Persistent, cb))));
        let slot = victim.clone();
        let _killer = hub.watch_outside(TOOLBAR, WatchMode::Persistent, move |_| {
            slot.borrow_mut().take();
        });
        // registered first, so the victim fires before the killer removes it
        assert_eq!(hub.dispatch(&Gesture::Key(Key::Escape)), 2);
        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn guard_outliving_hub_is_harmless() {
        let hub = GestureHub::new();
        let (_, cb) = counter();
        let guard = hub.watch_outside(TREE, WatchMode::Persistent, cb);
        drop(hub);
        assert!(!guard.is_attached());
        drop(guard);
    }
}
