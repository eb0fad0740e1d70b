//! Client side view of each context's lifecycle, fed by `browsingContext` events.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::BrowsingContext;
use crate::error::ErrorCode;
use crate::event::EventData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Created,
    Navigating,
    Loaded,
    Closed,
}

/// `prompt_open` is independent of `state`: a prompt can open while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLifecycle {
    pub state: ContextState,
    pub prompt_open: bool,
}

impl Default for ContextLifecycle {
    fn default() -> Self {
        Self {
            state: ContextState::Created,
            prompt_open: false,
        }
    }
}

#[derive(Debug, Default)]
struct Tracked {
    /// Prompt checks only apply once events are followed.
    enabled: bool,
    contexts: HashMap<BrowsingContext, ContextLifecycle>,
}

/// Shared between the module and its event listener.
#[derive(Debug, Clone, Default)]
pub struct LifecycleTracker(Arc<Mutex<Tracked>>);

impl LifecycleTracker {
    pub fn enable(&self) {
        self.0.lock().enabled = true;
    }

    /// Without events the tracked state goes stale, so it is dropped with the listener.
    pub fn disable(&self) {
        let mut tracked = self.0.lock();
        tracked.enabled = false;
        tracked.contexts.clear();
    }

    #[must_use]
    pub fn get(&self, context: &BrowsingContext) -> Option<ContextLifecycle> {
        self.0.lock().contexts.get(context).copied()
    }

    pub fn apply(&self, event: &EventData) {
        let Some(context) = event.context() else {
            return;
        };
        let mut tracked = self.0.lock();
        let lifecycle = tracked.contexts.entry(context.clone()).or_default();
        if lifecycle.state == ContextState::Closed {
            return;
        }
        match event {
            EventData::ContextCreated(_) => *lifecycle = ContextLifecycle::default(),
            EventData::NavigationStarted(_) => lifecycle.state = ContextState::Navigating,
            EventData::Load(_)
            | EventData::FragmentNavigated(_)
            | EventData::NavigationAborted(_)
            | EventData::NavigationFailed(_) => lifecycle.state = ContextState::Loaded,
            EventData::ContextDestroyed(_) => {
                lifecycle.state = ContextState::Closed;
                lifecycle.prompt_open = false;
            }
            EventData::UserPromptOpened(_) => lifecycle.prompt_open = true,
            EventData::UserPromptClosed(_) => lifecycle.prompt_open = false,
            _ => {}
        }
    }

    pub fn created(&self, context: &BrowsingContext) {
        self.0
            .lock()
            .contexts
            .insert(context.clone(), ContextLifecycle::default());
    }

    pub fn closed(&self, context: &BrowsingContext) {
        let mut tracked = self.0.lock();
        let lifecycle = tracked.contexts.entry(context.clone()).or_default();
        lifecycle.state = ContextState::Closed;
        lifecycle.prompt_open = false;
    }

    pub fn prompt_closed(&self, context: &BrowsingContext) {
        if let Some(lifecycle) = self.0.lock().contexts.get_mut(context) {
            lifecycle.prompt_open = false;
        }
    }

    pub fn check_open(&self, context: &BrowsingContext) -> crate::Result<()> {
        match self.get(context) {
            Some(ContextLifecycle {
                state: ContextState::Closed,
                ..
            }) => Err(crate::Error::protocol(
                ErrorCode::NoSuchFrame,
                format!("browsing context {context} was closed"),
            )),
            _ => Ok(()),
        }
    }

    pub fn check_navigable(&self, context: &BrowsingContext) -> crate::Result<()> {
        self.check_open(context)?;
        if self.get(context).is_some_and(|lifecycle| lifecycle.prompt_open) {
            return Err(crate::Error::protocol(
                ErrorCode::UnexpectedAlertOpen,
                format!("browsing context {context} has a user prompt open"),
            ));
        }
        Ok(())
    }

    pub fn check_prompt_open(&self, context: &BrowsingContext) -> crate::Result<()> {
        self.check_open(context)?;
        let tracked = self.0.lock();
        let prompt_open = tracked
            .contexts
            .get(context)
            .is_some_and(|lifecycle| lifecycle.prompt_open);
        if tracked.enabled && !prompt_open {
            return Err(crate::Error::protocol(
                ErrorCode::NoSuchAlert,
                format!("browsing context {context} has no user prompt open"),
            ));
        }
        Ok(())
    }
}
