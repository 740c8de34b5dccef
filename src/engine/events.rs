//! Host lifecycle events
//!
//! The host publishes events through [`ScopeEngine::dispatch`]; the engine
//! reacts first, then notifies whoever subscribed to that kind of event.

use std::fmt;

use tracing::debug;

use super::{RestoreOutcome, ScopeEngine};
use crate::host::{Host, ItemId, ScopeId, WindowState};
use crate::scope::{accessor, CallContext, Phase, RestoreMode};

/// How a new scope came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOrigin {
    Fresh,
    /// Copied from an existing scope, membership included
    Duplicated { parent: ScopeId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScopeEvent {
    Created {
        scope: ScopeId,
        origin: ScopeOrigin,
    },
    AboutToSwitch {
        from: Option<ScopeId>,
        to: ScopeId,
    },
    /// The host serialized a scope's windows into `state`
    StateCaptured {
        scope: ScopeId,
        state: WindowState,
    },
    /// The host is applying `state` to a scope's windows
    StateRestored {
        scope: ScopeId,
        state: WindowState,
        focused: Option<ItemId>,
    },
    ItemDisplayed {
        scope: ScopeId,
        item: ItemId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    AboutToSwitch,
    StateCaptured,
    StateRestored,
    ItemDisplayed,
}

impl ScopeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ScopeEvent::Created { .. } => EventKind::Created,
            ScopeEvent::AboutToSwitch { .. } => EventKind::AboutToSwitch,
            ScopeEvent::StateCaptured { .. } => EventKind::StateCaptured,
            ScopeEvent::StateRestored { .. } => EventKind::StateRestored,
            ScopeEvent::ItemDisplayed { .. } => EventKind::ItemDisplayed,
        }
    }
}

/// What the engine did in response to an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Filters were applied to a fresh scope
    Filtered(Vec<ItemId>),
    /// A duplicated scope took over its parent's membership
    Inherited,
    /// The captured state, with membership embedded
    Captured(WindowState),
    Restored(RestoreOutcome),
    Switched {
        /// Restore of the target's pending state, if it had one
        restored: Option<RestoreOutcome>,
    },
    Touched,
    /// The event arrived while the engine was already handling a switch
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ScopeEvent, &EventOutcome)>;

/// Typed callback registry for lifecycle events
#[derive(Default)]
pub struct EventRegistry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, EventKind, Listener)>,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventRegistry {
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&ScopeEvent, &EventOutcome) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn notify(&mut self, event: &ScopeEvent, outcome: &EventOutcome) {
        let kind = event.kind();
        for (_, listens_to, listener) in &mut self.listeners {
            if *listens_to == kind {
                listener(event, outcome);
            }
        }
    }
}

impl ScopeEngine {
    /// React to a host lifecycle event, then notify subscribers
    pub fn dispatch<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &CallContext,
        event: ScopeEvent,
    ) -> EventOutcome {
        let outcome = self.react(host, ctx, &event);
        debug!(kind = ?event.kind(), outcome = ?outcome, "Dispatched scope event");
        self.events.notify(&event, &outcome);
        outcome
    }

    fn react<H: Host + ?Sized>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        event: &ScopeEvent,
    ) -> EventOutcome {
        match event {
            ScopeEvent::Created {
                scope,
                origin: ScopeOrigin::Fresh,
            } => EventOutcome::Filtered(self.apply_filters(host, *scope)),
            ScopeEvent::Created {
                scope,
                origin: ScopeOrigin::Duplicated { parent },
            } => {
                let active = accessor::active(&*host, *parent);
                let buried = accessor::buried(&*host, *parent);
                accessor::set_active(host, *scope, active);
                accessor::set_buried(host, *scope, buried);
                EventOutcome::Inherited
            }
            ScopeEvent::AboutToSwitch { from, to } => self.switch(host, ctx, *from, *to),
            ScopeEvent::StateCaptured { scope, state } => {
                EventOutcome::Captured(self.embed_into(&*host, ctx, *scope, state.clone()))
            }
            ScopeEvent::StateRestored {
                scope,
                state,
                focused,
            } => EventOutcome::Restored(self.restore_state(host, ctx, state, *scope, *focused)),
            ScopeEvent::ItemDisplayed { scope, item } => {
                self.touch(host, *scope, *item);
                EventOutcome::Touched
            }
        }
    }

    /// Switching into a dormant scope clears whatever membership the host
    /// pre-populated it with, then restores its pending state exactly once.
    fn switch<H: Host + ?Sized>(
        &self,
        host: &mut H,
        ctx: &CallContext,
        from: Option<ScopeId>,
        to: ScopeId,
    ) -> EventOutcome {
        let Some(_clearing) = ctx.enter(Phase::Clearing) else {
            return EventOutcome::Ignored;
        };

        if let Some(from) = from.filter(|from| *from != to) {
            let state = self.capture_state(&*host, ctx, from);
            host.store_window_state(from, state);
        }

        if host.is_scope_live(to) {
            return EventOutcome::Switched { restored: None };
        }
        // Leave the pending state in place for the outer restore
        if ctx.is_active(Phase::Restoring) {
            debug!(scope = %to, "Switch during restore; keeping pending state");
            return EventOutcome::Switched {
                restored: Some(RestoreOutcome::Reentrant),
            };
        }
        let Some(state) = host.take_window_state(to) else {
            return EventOutcome::Switched { restored: None };
        };

        accessor::set_active(host, to, Vec::new());
        accessor::set_buried(host, to, Vec::new());

        let _forced = ctx.raise_restore(RestoreMode::Forced);
        let focused = host.focused_item(to);
        let restored = self.restore_state(host, ctx, &state, to, focused);
        EventOutcome::Switched {
            restored: Some(restored),
        }
    }
}
