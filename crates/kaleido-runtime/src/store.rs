#![forbid(unsafe_code)]

//! The store: one state value, a registry of path scopes, and its history.
//!
//! A [`Store`] is an explicit context object. Clones are handles to the same
//! store; independent stores never share state, scopes or history.
//!
//! # Commit sequence
//!
//! Every write, whether from [`Scope::set`], [`Scope::update`],
//! [`Store::set_state`] or [`Store::undo`], goes through one commit:
//!
//! 1. The new state is computed from the current one (outside the store, by
//!    the caller's lens).
//! 2. The state cell is replaced and the snapshot is recorded in history.
//!    Nothing is notified yet, so every observer sees state and history
//!    agree.
//! 3. State subscribers are notified.
//! 4. The notification cell of the written path is pushed the new slice,
//!    along with paths spelling it differently (`m.0` and `m."0"`).
//! 5. Every other registered path the write touches is pushed its new slice:
//!    ancestors from the nearest one up to the root, then descendants in path
//!    order. Keys are compared with [`Key::same_slot`](kaleido_value::Key::same_slot).
//! 6. Any remaining registered path whose slice nonetheless changed is pushed
//!    too, in path order. This covers writes that grow a list (a write at
//!    index 3 of an empty list makes index 0 hold `Null`).
//! 7. History subscribers are notified.
//!
//! Steps 4 to 6 always read the state as it is at that moment, so a write
//! made from inside a callback never leaves a notification cell holding a
//! stale slice. Cells from steps 4 and 5 are in flight until pushed; a nested
//! commit leaves them alone, so each is pushed once per write.
//!
//! # Invariants
//!
//! 1. For every registered path `p`, the notification cell of `p` holds
//!    `get_in(state, p)` whenever no commit is in flight.
//! 2. The registry holds at most one notification cell per path.
//! 3. `history().len() == version() + 1`, and the last entry is the current
//!    state.
//! 4. Undo appends; history never shrinks.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing path | Read of an absent slice | `None` |
//! | Transform panic | `Scope::update` closure panics | State untouched, panic propagates |
//! | Transform error | `Scope::try_update` closure errs | State untouched, error returned |
//! | Undo out of range | `steps == 0` or before first entry | `StoreError::UndoOutOfRange`, nothing written |
//! | Subscriber panic | Callback panics mid-commit | Data already committed; later callbacks skipped; the next commit reconciles stale cells |

use std::cell::{Cell, RefCell};
use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use kaleido_value::{Lens, Path, Value, get_in};
use tracing::{debug, trace, warn};

use crate::config::{StoreConfig, UndoMode};
use crate::error::StoreError;
use crate::history::HistoryLog;
use crate::reactive::{Observable, ReadOnly, Subscription};
use crate::scope::Scope;

/// Where a commit came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Origin {
    Write,
    /// Undo restoring the history entry at `target`.
    Undo { target: usize },
}

struct StoreInner {
    config: StoreConfig,
    state: Observable<Value>,
    scopes: RefCell<BTreeMap<Path, Observable<Option<Value>>>>,
    history: HistoryLog,
    /// History index the last undo restored, while in [`UndoMode::Anchored`].
    undo_anchor: Cell<Option<usize>>,
    /// Touched cells of commits still propagating, not yet pushed. Nested
    /// commits leave them to the commit that owns them.
    in_flight: RefCell<Vec<Path>>,
}

/// A reactive state container addressed by path.
///
/// ```
/// use kaleido_runtime::Store;
/// use kaleido_value::{Value, path};
///
/// let store = Store::new();
/// let a = store.scope(path!["a"]);
/// a.set(1);
/// a.set(2);
/// store.undo(1).unwrap();
/// assert_eq!(a.get(), Some(Value::Int(1)));
/// assert_eq!(store.history().len(), 4);
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    /// A store holding `{}` with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_state(Value::map(), config)
    }

    /// A store starting from `initial`, which becomes the first history entry.
    #[must_use]
    pub fn with_state(initial: Value, config: StoreConfig) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                config,
                history: HistoryLog::new(initial.clone()),
                state: Observable::new(initial),
                scopes: RefCell::new(BTreeMap::new()),
                undo_anchor: Cell::new(None),
                in_flight: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The thread-local default store.
    #[must_use]
    pub fn global() -> Self {
        crate::global::store()
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Scope the store at `path`.
    ///
    /// The notification cell for `path` is created on first use, holding the
    /// current slice, and shared by every later scope of an equal path.
    pub fn scope(&self, path: impl Into<Path>) -> Scope {
        let lens = Lens::new(path);
        let stream = self.stream_for(lens.path());
        Scope::new(self.clone(), lens, stream)
    }

    /// Scope the store at `path` and immediately write `initial` there.
    ///
    /// The write is an ordinary one: it notifies and is recorded in history.
    pub fn scope_with(&self, path: impl Into<Path>, initial: impl Into<Value>) -> Scope {
        let scope = self.scope(path);
        scope.set(initial);
        scope
    }

    fn stream_for(&self, path: &Path) -> Observable<Option<Value>> {
        let existing = self.inner.scopes.borrow().get(path).cloned();
        if let Some(stream) = existing {
            return stream;
        }
        let current = self.read(|state| get_in(state, path.keys()).cloned());
        let stream = Observable::new(current);
        let count = {
            let mut scopes = self.inner.scopes.borrow_mut();
            scopes.insert(path.clone(), stream.clone());
            scopes.len()
        };
        debug!(path = %path, scopes = count, "registered scope");
        stream
    }

    /// Number of distinct paths that have been scoped.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.inner.scopes.borrow().len()
    }

    /// The current state. O(1): values are persistent.
    #[must_use]
    pub fn state(&self) -> Value {
        self.inner.state.get()
    }

    /// Run `f` against the current state without cloning it.
    ///
    /// `f` must not write to the store.
    pub fn read<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        self.inner.state.with(f)
    }

    /// Read-only view of the state cell.
    #[must_use]
    pub fn state_cell(&self) -> ReadOnly<Value> {
        self.inner.state.read_only()
    }

    /// Call `callback` with the whole state after every commit.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&Value) + 'static) -> Subscription {
        self.inner.state.subscribe(callback)
    }

    /// Number of commits since the store was created.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.state.version()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.inner.history
    }

    /// Replace the whole state. Every registered scope is touched.
    pub fn set_state(&self, state: impl Into<Value>) {
        self.commit(&Path::root(), state.into(), Origin::Write);
    }

    /// Restore an earlier snapshot as a new write.
    ///
    /// In [`UndoMode::Live`] the target is `steps` entries before the end of
    /// history as it is now; since undos are recorded too, repeating
    /// `undo(1)` toggles between the last two states. In
    /// [`UndoMode::Anchored`] consecutive undos keep stepping back from the
    /// entry the previous undo restored.
    ///
    /// # Errors
    ///
    /// [`StoreError::UndoOutOfRange`] if `steps` is 0 or reaches before the
    /// first entry. Nothing is written in that case.
    pub fn undo(&self, steps: usize) -> Result<(), StoreError> {
        let len = self.inner.history.len();
        let newest = len.saturating_sub(1);
        let base = match self.inner.config.undo_mode {
            UndoMode::Live => newest,
            UndoMode::Anchored => self.inner.undo_anchor.get().unwrap_or(newest),
        };
        if steps == 0 || steps > base {
            warn!(steps, available = base, "undo out of range");
            return Err(StoreError::UndoOutOfRange {
                steps,
                available: base,
            });
        }
        let target = base - steps;
        let snapshot = self.inner.history.entry(target);
        debug!(steps, target, mode = ?self.inner.config.undo_mode, "undo");
        self.commit(&Path::root(), snapshot, Origin::Undo { target });
        Ok(())
    }

    /// Install `next` as the state after a write at `at`, then propagate.
    pub(crate) fn commit(&self, at: &Path, next: Value, origin: Origin) {
        self.inner.state.update_quiet(|state| *state = next.clone());
        self.inner.history.record(next);
        self.inner.undo_anchor.set(match origin {
            Origin::Write => None,
            Origin::Undo { target } => Some(target),
        });
        trace!(
            path = %at,
            version = self.inner.state.version(),
            history = self.inner.history.len(),
            "commit"
        );

        let touched = self.touched(at);
        let pending = InFlight::enter(&self.inner.in_flight, &touched);

        self.inner.state.notify();
        for (path, stream) in touched {
            pending.land(&path);
            let slice = self.read(|state| get_in(state, path.keys()).cloned());
            stream.set(slice);
        }
        drop(pending);
        for (path, stream, slice) in self.collateral(at) {
            trace!(path = %path, written = %at, "collateral slice change");
            stream.set(slice);
        }
        self.inner.history.notify();
    }

    /// Registered cells the write at `at` cannot reach by path whose slice
    /// no longer matches the state, with their new slice. Cells an enclosing
    /// commit has yet to push are skipped.
    fn collateral(&self, at: &Path) -> Vec<(Path, Observable<Option<Value>>, Option<Value>)> {
        let scopes = self.inner.scopes.borrow();
        let in_flight = self.inner.in_flight.borrow();
        self.read(|state| {
            scopes
                .iter()
                .filter(|(path, _)| !path.may_overlap(at) && !in_flight.contains(path))
                .filter_map(|(path, stream)| {
                    let slice = get_in(state, path.keys());
                    let stale = stream.with(|held| match (held, slice) {
                        (Some(held), Some(slice)) => !held.same_as(slice),
                        (None, None) => false,
                        _ => true,
                    });
                    stale.then(|| (path.clone(), stream.clone(), slice.cloned()))
                })
                .collect()
        })
    }

    /// Registered cells whose slice a write at `at` can change, in
    /// notification order: `at` itself, its ancestors nearest first, then its
    /// descendants in path order. Paths that differ from `at` only in how a
    /// key is spelled (`0` against `"0"`) count as the same path.
    fn touched(&self, at: &Path) -> Vec<(Path, Observable<Option<Value>>)> {
        let scopes = self.inner.scopes.borrow();
        let mut same = Vec::new();
        let mut ancestors = Vec::new();
        let mut descendants = Vec::new();
        for (path, stream) in scopes.iter().filter(|(path, _)| path.may_overlap(at)) {
            let entry = (path.clone(), stream.clone());
            match path.len().cmp(&at.len()) {
                Ordering::Equal if path == at => same.insert(0, entry),
                Ordering::Equal => same.push(entry),
                Ordering::Less => ancestors.push(entry),
                Ordering::Greater => descendants.push(entry),
            }
        }
        ancestors.sort_by_key(|(path, _)| Reverse(path.len()));
        same.extend(ancestors);
        same.extend(descendants);
        same
    }
}

/// One commit's share of the in-flight list. Entries are removed as their
/// cells are pushed; whatever is left is dropped with the guard, so a
/// panicking callback cannot leave stale entries behind.
struct InFlight<'a> {
    list: &'a RefCell<Vec<Path>>,
    mark: usize,
}

impl<'a> InFlight<'a> {
    fn enter(list: &'a RefCell<Vec<Path>>, touched: &[(Path, Observable<Option<Value>>)]) -> Self {
        let mut paths = list.borrow_mut();
        let mark = paths.len();
        paths.extend(touched.iter().map(|(path, _)| path.clone()));
        Self { list, mark }
    }

    fn land(&self, path: &Path) {
        let mut paths = self.list.borrow_mut();
        if let Some(pos) = paths[self.mark..].iter().position(|p| p == path) {
            paths.remove(self.mark + pos);
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.list.borrow_mut().truncate(self.mark);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("version", &self.version())
            .field("scopes", &self.scope_count())
            .field("history", &self.inner.history.len())
            .field("undo_mode", &self.inner.config.undo_mode)
            .finish()
    }
}
