use bevy::prelude::*;

use super::host::PlacementHost;
use super::placer::SlotPlacer;

/// Transport side of a replicated grab.
pub trait ReplicationClient: Send + Sync {
    /// Ask for exclusive ownership so the grab can be applied.
    fn request_grab(&mut self, grabbed: bool);
}

/// Decides whether a grab signal is applied now or after ownership is granted.
pub trait GrabIntegration: Send + Sync {
    /// Handle a select/unselect signal. Returns the value to apply locally now.
    fn grab_signal(&mut self, grabbed: bool) -> Option<bool>;

    /// Ownership was confirmed. Returns the value to apply, if one is pending.
    fn ownership_granted(&mut self) -> Option<bool> {
        None
    }

    fn is_replicated(&self) -> bool {
        false
    }
}

/// Applies grab signals immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalGrab;

impl GrabIntegration for LocalGrab {
    fn grab_signal(&mut self, grabbed: bool) -> Option<bool> {
        Some(grabbed)
    }
}

/// Defers grab signals until the replication layer grants ownership.
pub struct ReplicatedGrab {
    client: Box<dyn ReplicationClient>,
    pending: Option<bool>,
}

impl ReplicatedGrab {
    pub fn new(client: impl ReplicationClient + 'static) -> Self {
        Self {
            client: Box::new(client),
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<bool> {
        self.pending
    }
}

impl GrabIntegration for ReplicatedGrab {
    fn grab_signal(&mut self, grabbed: bool) -> Option<bool> {
        // Latest request wins if an earlier one is still in flight.
        self.pending = Some(grabbed);
        self.client.request_grab(grabbed);
        None
    }

    fn ownership_granted(&mut self) -> Option<bool> {
        self.pending.take()
    }

    fn is_replicated(&self) -> bool {
        true
    }
}

/// Turns external select/unselect signals into placement transitions.
pub struct GrabGate {
    integration: Box<dyn GrabIntegration>,
}

impl Default for GrabGate {
    fn default() -> Self {
        Self::local()
    }
}

impl GrabGate {
    pub fn new(integration: impl GrabIntegration + 'static) -> Self {
        Self {
            integration: Box::new(integration),
        }
    }

    pub fn local() -> Self {
        Self::new(LocalGrab)
    }

    pub fn replicated(client: impl ReplicationClient + 'static) -> Self {
        Self::new(ReplicatedGrab::new(client))
    }

    pub fn is_replicated(&self) -> bool {
        self.integration.is_replicated()
    }

    pub fn selected<H: PlacementHost + ?Sized>(&mut self, placer: &mut SlotPlacer, host: &mut H) {
        self.signal(true, placer, host);
    }

    pub fn unselected<H: PlacementHost + ?Sized>(&mut self, placer: &mut SlotPlacer, host: &mut H) {
        self.signal(false, placer, host);
    }

    pub fn signal<H: PlacementHost + ?Sized>(
        &mut self,
        grabbed: bool,
        placer: &mut SlotPlacer,
        host: &mut H,
    ) {
        match self.integration.grab_signal(grabbed) {
            Some(value) => placer.set_grabbed(value, host),
            None => debug!("Grab {} deferred until ownership is granted", grabbed),
        }
    }

    /// Apply a grab deferred by a replicated integration.
    ///
    /// Safe to call at any time: `set_grabbed` ignores unchanged values and
    /// place/unplace re-check the attachment state.
    pub fn ownership_granted<H: PlacementHost + ?Sized>(
        &mut self,
        placer: &mut SlotPlacer,
        host: &mut H,
    ) {
        if let Some(value) = self.integration.ownership_granted() {
            placer.set_grabbed(value, host);
        }
    }
}
