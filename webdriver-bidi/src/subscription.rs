//! Listener bookkeeping. The registry itself knows nothing about the connection; it only
//! reports which remote subscriptions become necessary or unnecessary.

use core::fmt::{self, Debug};
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;
use tracing::{debug, error, trace};

use crate::browsing_context::BrowsingContext;
use crate::error::{ErrorKind, SubscriptionError};
use crate::event::EventData;
use crate::session::SubscriptionRequest;
use crate::webdriver::WebDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Listeners of one owner are released together, see [`EventRegistry::remove_owner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

type Callback = Box<dyn Fn(&EventData) + Send + Sync>;
type Filter = Box<dyn Fn(&EventData) -> bool + Send + Sync>;

/// (event, context) as subscribed on the remote end. `None` is a global subscription.
pub type SubscriptionKey = (String, Option<BrowsingContext>);

/// How a `session.subscribe` for some keys ended. `Err` carries the rendered error.
pub type SubscribeOutcome = Result<(), String>;

/// Bound on the walk from a frame to its top-level context, in case of a parent cycle.
const MAX_FRAME_DEPTH: usize = 64;

pub struct Listener {
    event: String,
    contexts: Option<Vec<BrowsingContext>>,
    filter: Option<Filter>,
    callback: Callback,
}

impl Listener {
    /// `event` is either a method like `log.entryAdded` or a whole module like `log`.
    pub fn new(
        event: impl Into<String>,
        callback: impl Fn(&EventData) + Send + Sync + 'static,
    ) -> Self {
        Self {
            event: event.into(),
            contexts: None,
            filter: None,
            callback: Box::new(callback),
        }
    }

    /// Only events from these contexts are delivered. An empty list means all contexts.
    ///
    /// The remote end also sends events of frames nested in a subscribed context. Those
    /// are delivered too, as long as the frame's `browsingContext.contextCreated` event
    /// reached the client (some listener on the connection has to receive it).
    #[must_use]
    pub fn with_contexts(mut self, contexts: Option<Vec<BrowsingContext>>) -> Self {
        self.contexts = contexts.filter(|contexts| !contexts.is_empty());
        self
    }

    #[must_use]
    pub fn with_filter(
        mut self,
        filter: impl Fn(&EventData) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    #[must_use]
    pub fn contexts(&self) -> Option<&[BrowsingContext]> {
        self.contexts.as_deref()
    }

    fn matches(&self, event: &EventData, parents: &HashMap<BrowsingContext, BrowsingContext>) -> bool {
        let method = event.method();
        let name_matches = method == self.event
            || method
                .strip_prefix(self.event.as_str())
                .is_some_and(|rest| rest.starts_with('.'));
        if !name_matches {
            return false;
        }
        if let Some(contexts) = &self.contexts {
            let Some(mut context) = event.context() else {
                return false;
            };
            let mut depth = 0;
            while !contexts.contains(context) {
                match parents.get(context) {
                    Some(parent) if depth < MAX_FRAME_DEPTH => {
                        context = parent;
                        depth += 1;
                    }
                    _ => return false,
                }
            }
        }
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    fn keys(&self) -> Vec<SubscriptionKey> {
        match &self.contexts {
            None => vec![(self.event.clone(), None)],
            Some(contexts) => contexts
                .iter()
                .map(|context| (self.event.clone(), Some(context.clone())))
                .collect(),
        }
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event", &self.event)
            .field("contexts", &self.contexts)
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Registration {
    id: ListenerId,
    owner: OwnerId,
    listener: Listener,
}

/// What [`EventRegistry::add`] decided for a new listener.
#[derive(Debug)]
pub struct Added {
    pub id: ListenerId,
    /// Subscriptions this listener has to send itself. Their keys are pending until
    /// [`EventRegistry::settle`] is called.
    pub requests: Vec<SubscriptionRequest>,
    /// Subscriptions another listener already sent and that are not answered yet.
    pub waiting: Vec<oneshot::Receiver<SubscribeOutcome>>,
}

/// Listeners in registration order, plus the state of every remote subscription.
#[derive(Debug, Default)]
pub struct EventRegistry {
    next_id: u64,
    registrations: Vec<Registration>,
    /// Keys the remote end acknowledged.
    confirmed: HashSet<SubscriptionKey>,
    /// Keys with a `session.subscribe` in flight and who else waits for it.
    pending: HashMap<SubscriptionKey, Vec<oneshot::Sender<SubscribeOutcome>>>,
    /// child -> parent, learned from `contextCreated`.
    parents: HashMap<BrowsingContext, BrowsingContext>,
}

impl EventRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys nobody subscribed yet become pending and are returned as requests. Keys that
    /// are pending for another listener hand out a receiver for that answer.
    pub fn add(&mut self, owner: OwnerId, listener: Listener) -> Added {
        let mut needed = Vec::new();
        let mut waiting = Vec::new();
        for key in listener.keys() {
            if self.confirmed.contains(&key) {
                continue;
            }
            if let Some(waiters) = self.pending.get_mut(&key) {
                let (sender, receiver) = oneshot::channel();
                waiters.push(sender);
                waiting.push(receiver);
            } else {
                self.pending.insert(key.clone(), Vec::new());
                needed.push(key);
            }
        }
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        debug!(listener = id.0, event = %listener.event, "adding listener");
        self.registrations.push(Registration {
            id,
            owner,
            listener,
        });
        Added {
            id,
            requests: requests_for(needed),
            waiting,
        }
    }

    /// Records the answer to a `session.subscribe` and wakes everyone waiting on it. A
    /// failed key goes back to unsubscribed, so the next listener tries again.
    ///
    /// Returns `session.unsubscribe` requests for keys that were confirmed after every
    /// listener needing them was already removed.
    pub fn settle(
        &mut self,
        keys: &[SubscriptionKey],
        outcome: &SubscribeOutcome,
    ) -> Vec<SubscriptionRequest> {
        let mut stale = Vec::new();
        for key in keys {
            for waiter in self.pending.remove(key).unwrap_or_default() {
                if waiter.send(outcome.clone()).is_err() {
                    trace!(event = %key.0, "subscription waiter went away");
                }
            }
            if outcome.is_ok() {
                if self.is_active(key) {
                    self.confirmed.insert(key.clone());
                } else if !stale.contains(key) {
                    stale.push(key.clone());
                }
            }
        }
        requests_for(stale)
    }

    /// Returns the `session.unsubscribe` requests for keys nobody needs any more.
    pub fn remove(
        &mut self,
        id: ListenerId,
    ) -> Result<Vec<SubscriptionRequest>, SubscriptionError> {
        let index = self
            .registrations
            .iter()
            .position(|registration| registration.id == id)
            .ok_or(SubscriptionError::UnknownListener(id.0))?;
        let removed = self.registrations.remove(index);
        debug!(listener = id.0, "removed listener");
        Ok(self.released(&[removed]))
    }

    pub fn remove_owner(&mut self, owner: OwnerId) -> Vec<SubscriptionRequest> {
        let (removed, kept): (Vec<_>, Vec<_>) = core::mem::take(&mut self.registrations)
            .into_iter()
            .partition(|registration| registration.owner == owner);
        self.registrations = kept;
        debug!(owner = owner.0, count = removed.len(), "removed listeners of owner");
        self.released(&removed)
    }

    /// Invokes every matching listener in registration order and returns how many matched.
    /// A panicking listener is logged and does not affect the others.
    pub fn dispatch(&mut self, event: &EventData) -> usize {
        if let EventData::ContextCreated(info) = event {
            if let Some(parent) = &info.parent {
                self.parents.insert(info.context.clone(), parent.clone());
            }
        }

        let mut invoked = 0;
        for registration in &self.registrations {
            let listener = &registration.listener;
            let parents = &self.parents;
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                let matched = listener.matches(event, parents);
                if matched {
                    (listener.callback)(event);
                }
                matched
            }));
            match outcome {
                Ok(false) => {}
                Ok(true) => invoked += 1,
                Err(_) => {
                    invoked += 1;
                    error!(
                        listener = registration.id.0,
                        method = event.method(),
                        "event listener panicked"
                    );
                }
            }
        }

        if let EventData::ContextDestroyed(info) = event {
            self.parents.remove(&info.context);
        }
        invoked
    }

    /// Drops every listener. Pending subscribers see their waiters closed.
    pub fn clear(&mut self) {
        self.registrations.clear();
        self.confirmed.clear();
        self.pending.clear();
        self.parents.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn is_active(&self, key: &SubscriptionKey) -> bool {
        self.registrations
            .iter()
            .any(|registration| registration.listener.keys().contains(key))
    }

    /// Only confirmed keys are released. A pending key is dealt with in
    /// [`Self::settle`].
    fn released(&mut self, removed: &[Registration]) -> Vec<SubscriptionRequest> {
        let mut keys = Vec::new();
        for key in removed
            .iter()
            .flat_map(|registration| registration.listener.keys())
        {
            if !keys.contains(&key) && self.confirmed.contains(&key) && !self.is_active(&key) {
                keys.push(key);
            }
        }
        for key in &keys {
            self.confirmed.remove(key);
        }
        requests_for(keys)
    }
}

/// The keys a single request covers.
#[must_use]
pub fn keys_of(request: &SubscriptionRequest) -> Vec<SubscriptionKey> {
    match &request.contexts {
        None => request
            .events
            .iter()
            .map(|event| (event.clone(), None))
            .collect(),
        Some(contexts) => request
            .events
            .iter()
            .flat_map(|event| {
                contexts
                    .iter()
                    .map(move |context| (event.clone(), Some(context.clone())))
            })
            .collect(),
    }
}

/// One request for all global events, and one per event scoped to contexts.
fn requests_for(keys: Vec<SubscriptionKey>) -> Vec<SubscriptionRequest> {
    let mut global = Vec::new();
    let mut scoped: Vec<SubscriptionRequest> = Vec::new();
    for (event, context) in keys {
        match context {
            None => global.push(event),
            Some(context) => {
                if let Some(request) = scoped
                    .iter_mut()
                    .find(|request| request.events.first() == Some(&event))
                {
                    request.contexts.get_or_insert_with(Vec::new).push(context);
                } else {
                    scoped.push(SubscriptionRequest {
                        events: vec![event],
                        contexts: Some(vec![context]),
                    });
                }
            }
        }
    }
    let mut requests = Vec::with_capacity(scoped.len() + 1);
    if !global.is_empty() {
        requests.push(SubscriptionRequest {
            events: global,
            contexts: None,
        });
    }
    requests.extend(scoped);
    requests
}

/// The listeners of one module. Closing releases all of them; the connection stays open.
#[derive(Debug)]
pub struct ModuleSubscriptions {
    driver: WebDriver,
    owner: OwnerId,
    closed: AtomicBool,
}

impl ModuleSubscriptions {
    #[must_use]
    pub fn new(driver: WebDriver) -> Self {
        let owner = driver.new_owner();
        Self {
            driver,
            owner,
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub const fn driver(&self) -> &WebDriver {
        &self.driver
    }

    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn listen(&self, listener: Listener) -> crate::Result<ListenerId> {
        if self.is_closed() {
            return Err(SubscriptionError::ModuleClosed.into());
        }
        let id = self.driver.add_listener(self.owner, listener).await?;
        // `close` may have released this owner while the subscribe was in flight.
        if self.is_closed() {
            if let Err(error) = self.driver.remove_listener(id).await {
                debug!(listener = id.0, %error, "listener was already released");
            }
            return Err(SubscriptionError::ModuleClosed.into());
        }
        Ok(id)
    }

    pub async fn unlisten(&self, listener: ListenerId) -> crate::Result<()> {
        self.driver.remove_listener(listener).await
    }

    /// Closing twice is a no-op. Closing after the connection is gone succeeds, there is
    /// nothing left to release.
    pub async fn close(&self) -> crate::Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        match self.driver.remove_owner(self.owner).await {
            Err(error) if error.kind() == ErrorKind::Transport => {
                debug!(owner = self.owner.0, "connection already closed");
                Ok(())
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::protocol::EventMessage;

    fn event(method: &str, params: serde_json::Value) -> EventData {
        EventData::from_message(EventMessage {
            method: method.to_owned(),
            params,
        })
        .unwrap()
    }

    fn load(context: &str) -> EventData {
        event(
            "browsingContext.load",
            json!({"context": context, "navigation": null, "timestamp": 0, "url": "about:blank"}),
        )
    }

    fn context(id: &str) -> BrowsingContext {
        BrowsingContext(id.to_owned())
    }

    #[test]
    fn fan_out_in_registration_order() {
        let mut registry = EventRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let calls = Arc::clone(&calls);
            registry.add(
                OwnerId(1),
                Listener::new("browsingContext.load", move |_| calls.lock().push(name)),
            );
        }

        assert_eq!(registry.dispatch(&load("ctx")), 3);
        assert_eq!(*calls.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn panicking_listener_does_not_stop_the_others() {
        let mut registry = EventRegistry::new();
        let calls = Arc::new(Mutex::new(0));

        registry.add(
            OwnerId(1),
            Listener::new("browsingContext.load", |_| panic!("listener bug")),
        );
        let counter = Arc::clone(&calls);
        registry.add(
            OwnerId(1),
            Listener::new("browsingContext.load", move |_| *counter.lock() += 1),
        );

        assert_eq!(registry.dispatch(&load("ctx")), 2);
        assert_eq!(registry.dispatch(&load("ctx")), 2);
        assert_eq!(*calls.lock(), 2);
    }

    #[test]
    fn contexts_filters_and_module_prefixes() {
        let mut registry = EventRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let scoped = Arc::clone(&seen);
        registry.add(
            OwnerId(1),
            Listener::new("browsingContext.load", move |_| scoped.lock().push("scoped"))
                .with_contexts(Some(vec![context("a")])),
        );
        let module = Arc::clone(&seen);
        registry.add(
            OwnerId(1),
            Listener::new("browsingContext", move |_| module.lock().push("module")),
        );
        let filtered = Arc::clone(&seen);
        registry.add(
            OwnerId(1),
            Listener::new("browsingContext.load", move |_| {
                filtered.lock().push("filtered");
            })
            .with_filter(|event| event.context() == Some(&context("b"))),
        );
        let prefix_only = Arc::clone(&seen);
        registry.add(
            OwnerId(1),
            Listener::new("browsing", move |_| prefix_only.lock().push("wrong prefix")),
        );

        registry.dispatch(&load("a"));
        assert_eq!(*seen.lock(), vec!["scoped", "module"]);
        seen.lock().clear();

        registry.dispatch(&load("b"));
        assert_eq!(*seen.lock(), vec!["module", "filtered"]);
    }

    fn global(event: &str) -> SubscriptionRequest {
        SubscriptionRequest {
            events: vec![event.to_owned()],
            contexts: None,
        }
    }

    #[test]
    fn remote_subscriptions_are_shared_between_listeners() {
        let mut registry = EventRegistry::new();

        let first = registry.add(OwnerId(1), Listener::new("log.entryAdded", |_| {}));
        assert_eq!(first.requests, vec![global("log.entryAdded")]);
        assert!(first.waiting.is_empty());
        assert!(registry
            .settle(&keys_of(&first.requests[0]), &Ok(()))
            .is_empty());

        let second = registry.add(OwnerId(2), Listener::new("log.entryAdded", |_| {}));
        assert!(second.requests.is_empty());
        assert!(second.waiting.is_empty());

        let scoped = registry.add(
            OwnerId(2),
            Listener::new("log.entryAdded", |_| {})
                .with_contexts(Some(vec![context("a"), context("b")])),
        );
        assert_eq!(
            scoped.requests,
            vec![SubscriptionRequest {
                events: vec!["log.entryAdded".to_owned()],
                contexts: Some(vec![context("a"), context("b")]),
            }]
        );
        registry.settle(&keys_of(&scoped.requests[0]), &Ok(()));

        assert!(registry.remove(first.id).unwrap().is_empty());
        let released = registry.remove_owner(OwnerId(2));
        assert_eq!(released.len(), 2);
        assert!(registry.is_empty());

        assert!(matches!(
            registry.remove(second.id),
            Err(SubscriptionError::UnknownListener(_))
        ));
    }

    #[test]
    fn concurrent_adders_share_the_pending_answer() {
        let mut registry = EventRegistry::new();

        let first = registry.add(OwnerId(1), Listener::new("log.entryAdded", |_| {}));
        let mut second = registry.add(OwnerId(1), Listener::new("log.entryAdded", |_| {}));
        assert!(second.requests.is_empty());
        assert_eq!(second.waiting.len(), 1);

        let keys = keys_of(&first.requests[0]);
        assert!(registry
            .settle(&keys, &Err("invalid argument".to_owned()))
            .is_empty());
        assert_eq!(
            second.waiting.remove(0).try_recv().unwrap(),
            Err("invalid argument".to_owned())
        );

        // Nothing was subscribed, so rolling back must not unsubscribe.
        assert!(registry.remove(first.id).unwrap().is_empty());
        assert!(registry.remove(second.id).unwrap().is_empty());

        let third = registry.add(OwnerId(1), Listener::new("log.entryAdded", |_| {}));
        assert_eq!(third.requests, vec![global("log.entryAdded")]);
    }

    #[test]
    fn subscription_confirmed_after_its_listener_left_is_released() {
        let mut registry = EventRegistry::new();
        let added = registry.add(OwnerId(1), Listener::new("log.entryAdded", |_| {}));
        assert!(registry.remove(added.id).unwrap().is_empty());
        assert_eq!(
            registry.settle(&keys_of(&added.requests[0]), &Ok(())),
            vec![global("log.entryAdded")]
        );
    }

    #[test]
    fn child_frames_reach_listeners_of_their_top_level_context() {
        let mut registry = EventRegistry::new();
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        registry.add(
            OwnerId(1),
            Listener::new("browsingContext.load", move |_| *counter.lock() += 1)
                .with_contexts(Some(vec![context("top")])),
        );

        assert_eq!(registry.dispatch(&load("frame")), 0);

        let created = |id: &str, parent: &str| {
            event(
                "browsingContext.contextCreated",
                json!({"context": id, "url": "about:blank", "children": null, "parent": parent}),
            )
        };
        registry.dispatch(&created("frame", "top"));
        registry.dispatch(&created("nested", "frame"));
        assert_eq!(registry.dispatch(&load("frame")), 1);
        assert_eq!(registry.dispatch(&load("nested")), 1);
        assert_eq!(registry.dispatch(&load("elsewhere")), 0);
        assert_eq!(*seen.lock(), 2);

        registry.dispatch(&event(
            "browsingContext.contextDestroyed",
            json!({"context": "frame", "url": "about:blank", "children": null, "parent": "top"}),
        ));
        assert_eq!(registry.dispatch(&load("frame")), 0);
    }

    #[test]
    fn remove_owner_keeps_other_modules() {
        let mut registry = EventRegistry::new();
        registry.add(OwnerId(1), Listener::new("browsingContext.load", |_| {}));
        registry.add(OwnerId(2), Listener::new("browsingContext.load", |_| {}));

        assert!(registry.remove_owner(OwnerId(1)).is_empty());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.dispatch(&load("ctx")), 1);
    }
}
