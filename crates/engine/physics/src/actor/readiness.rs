//! One-shot readiness signal
//!
//! An actor starts `Uninitialized` and moves to `Ready` on the first
//! synchronized frame in which its engine body exists. The transition happens
//! once; listeners are told about it exactly once.

use glam::Vec3;
use rapier3d::prelude::RigidBodyHandle;

/// Readiness of an actor's engine body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    #[default]
    Uninitialized,
    Ready,
}

/// Payload delivered to ready listeners
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyEvent {
    /// Name of the actor that became ready
    pub name: String,
    pub body: RigidBodyHandle,
    /// World step on which the transition happened
    pub step: u64,
    /// Synchronized position at that step
    pub position: Vec3,
}

type ReadyListener = Box<dyn FnMut(&ReadyEvent)>;

/// Observer list plus the single allowed state transition
#[derive(Default)]
pub struct ReadySignal {
    state: Readiness,
    fired: Option<ReadyEvent>,
    listeners: Vec<ReadyListener>,
}

impl ReadySignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Readiness {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == Readiness::Ready
    }

    /// The event recorded at the transition, if it happened
    pub fn event(&self) -> Option<&ReadyEvent> {
        self.fired.as_ref()
    }

    /// Register a listener.
    ///
    /// Listeners added after the transition are invoked immediately with the
    /// recorded event and then dropped.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&ReadyEvent) + 'static) {
        match &self.fired {
            Some(event) => listener(event),
            None => self.listeners.push(Box::new(listener)),
        }
    }

    /// Take the `Uninitialized -> Ready` transition.
    ///
    /// Returns the event on the transition and `None` on every later call.
    pub fn fire(&mut self, event: ReadyEvent) -> Option<ReadyEvent> {
        if self.state == Readiness::Ready {
            return None;
        }
        self.state = Readiness::Ready;

        for mut listener in self.listeners.drain(..) {
            listener(&event);
        }
        self.fired = Some(event.clone());
        Some(event)
    }
}

impl std::fmt::Debug for ReadySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadySignal")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
