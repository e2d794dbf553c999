use bevy::prelude::*;

use super::attachment::{AttachMode, Attachment, AttachmentState};
use super::candidates::CandidateList;
use super::error::PlacementError;
use super::highlight::set_highlight;
use super::host::{PlacementHost, SlotNotification};
use super::slot::{SlotId, SlotRegistry};

/// Placement state of one movable object.
///
/// Tracks the slots it overlaps, which of them is lit, whether it is
/// grabbed, and the attachment it holds while placed.
#[derive(Debug, Clone)]
pub struct SlotPlacer {
    mode: AttachMode,
    registry: SlotRegistry,
    candidates: CandidateList,
    state: AttachmentState,
    grabbed: bool,
    highlighted: Option<SlotId>,
}

impl SlotPlacer {
    pub fn new(mode: AttachMode, registry: SlotRegistry) -> Self {
        if registry.is_empty() {
            warn!("Placeable has no placement slots and will never place");
        }
        Self {
            mode,
            registry,
            candidates: CandidateList::new(),
            state: AttachmentState::Free,
            grabbed: false,
            highlighted: None,
        }
    }

    pub fn mode(&self) -> AttachMode {
        self.mode
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn state(&self) -> &AttachmentState {
        &self.state
    }

    pub fn placed_slot(&self) -> Option<SlotId> {
        self.state.slot()
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Slot whose highlight this object currently has switched on.
    pub fn highlighted(&self) -> Option<SlotId> {
        self.highlighted
    }

    /// Trigger volume `slot` started overlapping the object.
    ///
    /// Returns true if the slot became a candidate.
    pub fn on_enter<H: PlacementHost + ?Sized>(&mut self, slot: SlotId, host: &mut H) -> bool {
        if !self.registry.contains(slot) || !self.tracks_overlaps() {
            return false;
        }
        if !self.candidates.insert(slot) {
            return false;
        }
        self.refresh_highlight(host);
        true
    }

    /// Trigger volume `slot` stopped overlapping the object.
    ///
    /// Returns true if the slot was a candidate.
    pub fn on_exit<H: PlacementHost + ?Sized>(&mut self, slot: SlotId, host: &mut H) -> bool {
        if !self.registry.contains(slot) || !self.tracks_overlaps() {
            return false;
        }
        if !self.candidates.remove(slot) {
            return false;
        }
        self.refresh_highlight(host);
        true
    }

    /// Attach the object to `slot`. Only valid while free.
    pub fn place<H: PlacementHost + ?Sized>(
        &mut self,
        slot: SlotId,
        host: &mut H,
    ) -> Result<(), PlacementError> {
        if let AttachmentState::Placed(attachment) = &self.state {
            return Err(PlacementError::AlreadyPlaced {
                placed_in: attachment.slot,
                attempted: slot,
            });
        }
        let Some(descriptor) = self.registry.get(slot).cloned() else {
            return Err(PlacementError::UnknownSlot(slot));
        };
        // Joint placement only happens on release.
        if self.mode == AttachMode::Joint && self.grabbed {
            return Err(PlacementError::HeldByGrab(slot));
        }
        if self.mode == AttachMode::Anchor && host.is_occupied(slot) {
            return Err(PlacementError::SlotOccupied(slot));
        }

        if descriptor.sleep_on_place {
            host.sleep_body();
        }
        // Snap before attaching so the joint/anchor captures the final pose.
        if let Some(pose) = descriptor.pose {
            host.move_to(pose);
        }
        let handle = match self.mode {
            AttachMode::Joint => host.create_joint(descriptor.attach_target),
            AttachMode::Anchor => host.create_anchor_binding(descriptor.attach_target),
        };
        self.state = AttachmentState::Placed(Attachment {
            slot,
            target: descriptor.attach_target,
            handle,
        });

        self.refresh_highlight(host);
        if self.mode == AttachMode::Anchor {
            host.set_trigger_enabled(slot, false);
            host.set_occupied(slot, true);
            self.candidates.clear();
        }
        host.notify(slot, SlotNotification::Place);
        info!("Placed into {} ({:?})", descriptor.label(), self.mode);
        Ok(())
    }

    /// Release the current attachment. Returns false if the object was free.
    pub fn unplace<H: PlacementHost + ?Sized>(&mut self, host: &mut H) -> Result<bool, PlacementError> {
        let AttachmentState::Placed(attachment) = self.state else {
            return Ok(false);
        };
        let Some(slot) = self
            .registry
            .resolve_target(attachment.target, Some(attachment.slot))
        else {
            return Err(PlacementError::UnresolvedAttachment {
                target: attachment.target,
            });
        };

        host.destroy(attachment.handle);
        self.state = AttachmentState::Free;

        if self.mode == AttachMode::Anchor {
            host.set_trigger_enabled(slot, true);
            host.set_occupied(slot, false);
        }
        self.refresh_highlight(host);
        host.notify(slot, SlotNotification::Remove);
        if let Some(descriptor) = self.registry.get(slot) {
            info!("Removed from {}", descriptor.label());
        }
        Ok(true)
    }

    /// Place into the active candidate, if there is one.
    pub fn try_place<H: PlacementHost + ?Sized>(&mut self, host: &mut H) -> Result<bool, PlacementError> {
        match self.candidates.active() {
            Some(slot) => self.place(slot, host).map(|_| true),
            None => Ok(false),
        }
    }

    /// Apply a grab transition. Grabbing always detaches first; releasing
    /// places into the active candidate.
    pub fn set_grabbed<H: PlacementHost + ?Sized>(&mut self, grabbed: bool, host: &mut H) {
        if self.grabbed == grabbed {
            return;
        }
        self.grabbed = grabbed;

        let result = if grabbed {
            self.unplace(host).map(|_| ())
        } else {
            match self.mode {
                AttachMode::Joint => match self.candidates.active() {
                    Some(slot) => self.place(slot, host),
                    None => Ok(()),
                },
                AttachMode::Anchor => self.try_place(host).map(|_| ()),
            }
        };
        if let Err(err) = result {
            report(&err);
        }
        self.refresh_highlight(host);
    }

    /// Release everything before the object goes away.
    pub fn teardown<H: PlacementHost + ?Sized>(&mut self, host: &mut H) {
        self.grabbed = false;
        self.candidates.clear();
        if let Err(err) = self.unplace(host) {
            report(&err);
            if let AttachmentState::Placed(attachment) = self.state {
                host.destroy(attachment.handle);
                self.state = AttachmentState::Free;
            }
        }
        self.refresh_highlight(host);
    }

    fn tracks_overlaps(&self) -> bool {
        match self.mode {
            AttachMode::Joint => true,
            AttachMode::Anchor => self.state.is_free(),
        }
    }

    fn wants_highlight(&self) -> bool {
        match self.mode {
            AttachMode::Joint => self.grabbed && self.state.is_free(),
            AttachMode::Anchor => self.state.is_free(),
        }
    }

    // Move the highlight onto the active candidate, or switch it off.
    fn refresh_highlight<H: PlacementHost + ?Sized>(&mut self, host: &mut H) {
        let desired = if self.wants_highlight() {
            self.candidates.active()
        } else {
            None
        };
        if desired == self.highlighted {
            return;
        }
        if let Some(previous) = self.highlighted.take() {
            if let Some(descriptor) = self.registry.get(previous) {
                set_highlight(host, descriptor, false);
            }
        }
        if let Some(next) = desired {
            if let Some(descriptor) = self.registry.get(next) {
                set_highlight(host, descriptor, true);
                self.highlighted = Some(next);
            }
        }
    }
}

fn report(err: &PlacementError) {
    if err.is_invariant_violation() {
        error!("{}", err);
    } else {
        warn!("{}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::attachment::AttachmentHandle;
    use crate::placement::host::recording::{HostCall, RecordingHost};
    use crate::placement::slot::{HighlightId, Pose, SlotDescriptor, TargetId};

    const A: SlotId = SlotId(1);
    const B: SlotId = SlotId(2);
    const UNKNOWN: SlotId = SlotId(77);

    fn descriptor(id: SlotId) -> SlotDescriptor {
        SlotDescriptor::new(id, TargetId(id.0 + 10), HighlightId(id.0 + 20))
    }

    fn placer(mode: AttachMode) -> SlotPlacer {
        SlotPlacer::new(
            mode,
            SlotRegistry::new(vec![descriptor(A), descriptor(B).with_name("B")]),
        )
    }

    fn lit(host: &RecordingHost) -> Vec<HighlightId> {
        let mut on = Vec::new();
        for call in &host.calls {
            if let HostCall::Highlight(h, visible) = call {
                on.retain(|x| x != h);
                if *visible {
                    on.push(*h);
                }
            }
        }
        on
    }

    #[test]
    fn joint_scenario_highlights_tail_and_places_into_last_entered() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();
        placer.set_grabbed(true, &mut host);

        placer.on_enter(A, &mut host);
        assert_eq!(placer.candidates().as_slice(), &[A]);
        assert_eq!(placer.highlighted(), Some(A));

        placer.on_enter(B, &mut host);
        assert_eq!(placer.candidates().as_slice(), &[A, B]);
        assert_eq!(placer.highlighted(), Some(B));
        assert_eq!(lit(&host), vec![HighlightId(22)]);

        host.take();
        placer.on_exit(A, &mut host);
        assert_eq!(placer.candidates().as_slice(), &[B]);
        assert_eq!(placer.highlighted(), Some(B));
        assert!(host.calls.is_empty(), "exiting a non-tail slot must not re-notify");

        placer.set_grabbed(false, &mut host);
        assert_eq!(placer.placed_slot(), Some(B));
        assert_eq!(placer.highlighted(), None);
        assert_eq!(
            host.notifications(),
            vec![(B, SlotNotification::Unhover), (B, SlotNotification::Place)]
        );
        assert!(matches!(host.calls[0], HostCall::CreateJoint(TargetId(12), _)));
    }

    #[test]
    fn joint_mode_only_highlights_while_grabbed() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();

        placer.on_enter(A, &mut host);
        assert_eq!(placer.highlighted(), None);
        assert!(host.calls.is_empty());

        placer.set_grabbed(true, &mut host);
        assert_eq!(placer.highlighted(), Some(A));
    }

    #[test]
    fn grabbing_a_placed_object_detaches_before_anything_else() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();
        placer.on_enter(B, &mut host);
        placer.place(B, &mut host).unwrap();
        let handle = placer.state().attachment().unwrap().handle;
        host.take();

        placer.set_grabbed(true, &mut host);

        assert!(placer.state().is_free());
        assert_eq!(host.calls[0], HostCall::Destroy(handle));
        assert!(host.live.is_empty());
        // Still inside B, so the grab lights it again.
        assert_eq!(placer.highlighted(), Some(B));
        assert_eq!(
            host.notifications(),
            vec![(B, SlotNotification::Hover), (B, SlotNotification::Remove)]
        );
    }

    #[test]
    fn place_twice_is_rejected_without_side_effects() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();
        placer.place(A, &mut host).unwrap();
        let before = *placer.state();
        host.take();

        let err = placer.place(B, &mut host).unwrap_err();

        assert_eq!(
            err,
            PlacementError::AlreadyPlaced {
                placed_in: A,
                attempted: B
            }
        );
        assert!(err.is_invariant_violation());
        assert_eq!(*placer.state(), before);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn unplace_is_a_noop_when_free() {
        let mut placer = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();
        assert_eq!(placer.unplace(&mut host), Ok(false));
        placer.place(A, &mut host).unwrap();
        assert_eq!(placer.unplace(&mut host), Ok(true));
        assert_eq!(placer.unplace(&mut host), Ok(false));
        assert!(host.live.is_empty());
    }

    #[test]
    fn place_moves_to_pose_and_sleeps_before_attaching() {
        let pose = Pose::new(Vec3::new(0.0, 1.0, 2.0), Quat::from_rotation_x(0.5));
        let mut placer = SlotPlacer::new(
            AttachMode::Joint,
            SlotRegistry::new(vec![descriptor(A).with_pose(pose).with_sleep_on_place(true)]),
        );
        let mut host = RecordingHost::default();

        placer.place(A, &mut host).unwrap();

        assert_eq!(host.calls[0], HostCall::Sleep);
        assert_eq!(host.calls[1], HostCall::MoveTo(pose));
        assert!(matches!(host.calls[2], HostCall::CreateJoint(TargetId(11), _)));
        assert_eq!(placer.placed_slot(), Some(A));
    }

    #[test]
    fn unknown_volumes_are_ignored() {
        let mut placer = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();
        assert!(!placer.on_enter(UNKNOWN, &mut host));
        assert!(!placer.on_exit(UNKNOWN, &mut host));
        assert!(placer.candidates().is_empty());
        assert_eq!(placer.place(UNKNOWN, &mut host), Err(PlacementError::UnknownSlot(UNKNOWN)));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn repeated_enter_does_not_duplicate_or_renotify() {
        let mut placer = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();
        assert!(placer.on_enter(A, &mut host));
        assert!(!placer.on_enter(A, &mut host));
        assert_eq!(placer.candidates().len(), 1);
        assert_eq!(host.notifications(), vec![(A, SlotNotification::Hover)]);
    }

    #[test]
    fn anchor_place_disables_trigger_and_clears_candidates() {
        let mut placer = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();
        placer.on_enter(A, &mut host);
        placer.on_enter(B, &mut host);
        assert_eq!(placer.highlighted(), Some(B));

        placer.set_grabbed(true, &mut host);
        host.take();
        placer.set_grabbed(false, &mut host);

        assert_eq!(placer.placed_slot(), Some(B));
        assert!(placer.candidates().is_empty());
        assert!(host.occupied.contains(&B));
        assert!(host.calls.contains(&HostCall::Trigger(B, false)));
        assert_eq!(placer.highlighted(), None);

        // Overlaps are not tracked while anchored.
        assert!(!placer.on_enter(A, &mut host));
        assert!(placer.candidates().is_empty());
    }

    #[test]
    fn anchor_unplace_reenables_trigger_and_fires_remove() {
        let mut placer = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();
        placer.on_enter(A, &mut host);
        placer.try_place(&mut host).unwrap();
        host.take();

        placer.set_grabbed(true, &mut host);

        assert!(placer.state().is_free());
        assert!(host.occupied.is_empty());
        assert!(host.calls.contains(&HostCall::Trigger(A, true)));
        assert_eq!(host.notifications(), vec![(A, SlotNotification::Remove)]);
    }

    #[test]
    fn try_place_with_no_candidates_stays_free() {
        let mut placer = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();
        assert_eq!(placer.try_place(&mut host), Ok(false));
        placer.set_grabbed(true, &mut host);
        placer.set_grabbed(false, &mut host);
        assert!(placer.state().is_free());
        assert!(host.calls.is_empty());
    }

    #[test]
    fn unresolvable_attachment_is_reported_and_state_kept() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();
        let orphan = Attachment {
            slot: A,
            target: TargetId(999),
            handle: AttachmentHandle(5),
        };
        placer.state = AttachmentState::Placed(orphan);

        let err = placer.unplace(&mut host).unwrap_err();

        assert_eq!(err, PlacementError::UnresolvedAttachment { target: TargetId(999) });
        assert_eq!(*placer.state(), AttachmentState::Placed(orphan));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn teardown_releases_attachment_and_highlight() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();
        placer.set_grabbed(true, &mut host);
        placer.on_enter(A, &mut host);
        placer.on_enter(B, &mut host);
        placer.set_grabbed(false, &mut host);
        placer.on_exit(B, &mut host);
        assert_eq!(placer.placed_slot(), Some(B));

        placer.teardown(&mut host);

        assert!(placer.state().is_free());
        assert!(placer.candidates().is_empty());
        assert!(host.live.is_empty());
        assert!(lit(&host).is_empty());
    }

    fn assert_single_highlight(placer: &SlotPlacer, host: &RecordingHost) {
        let on = lit(host);
        assert!(on.len() <= 1);
        let expected =
            placer.is_grabbed() && placer.state().is_free() && !placer.candidates().is_empty();
        assert_eq!(on.len() == 1, expected);
    }

    #[test]
    fn at_most_one_slot_is_lit_through_any_sequence() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();

        placer.set_grabbed(true, &mut host);
        assert_single_highlight(&placer, &host);
        placer.on_enter(A, &mut host);
        assert_single_highlight(&placer, &host);
        placer.on_enter(B, &mut host);
        assert_single_highlight(&placer, &host);
        placer.on_exit(B, &mut host);
        assert_single_highlight(&placer, &host);
        assert_eq!(placer.highlighted(), Some(A));
        placer.on_enter(B, &mut host);
        assert_single_highlight(&placer, &host);
        placer.set_grabbed(false, &mut host);
        assert_single_highlight(&placer, &host);
        placer.set_grabbed(true, &mut host);
        assert_single_highlight(&placer, &host);
        placer.on_exit(A, &mut host);
        assert_single_highlight(&placer, &host);
        assert_eq!(placer.highlighted(), Some(B));
    }

    #[test]
    fn joint_place_is_refused_while_grabbed() {
        let mut placer = placer(AttachMode::Joint);
        let mut host = RecordingHost::default();
        placer.set_grabbed(true, &mut host);
        placer.on_enter(A, &mut host);
        host.take();

        let err = placer.place(A, &mut host).unwrap_err();

        assert_eq!(err, PlacementError::HeldByGrab(A));
        assert!(!err.is_invariant_violation());
        assert!(placer.state().is_free());
        assert_eq!(placer.highlighted(), Some(A));
        assert!(host.calls.is_empty());

        // Releasing still places normally.
        placer.set_grabbed(false, &mut host);
        assert_eq!(placer.placed_slot(), Some(A));
    }

    #[test]
    fn anchored_slot_refuses_a_second_object_on_the_same_host() {
        let mut first = placer(AttachMode::Anchor);
        let mut second = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();
        first.on_enter(A, &mut host);
        second.on_enter(A, &mut host);
        first.set_grabbed(true, &mut host);
        second.set_grabbed(true, &mut host);

        first.set_grabbed(false, &mut host);
        second.set_grabbed(false, &mut host);

        assert_eq!(first.placed_slot(), Some(A));
        assert_eq!(second.placed_slot(), None);
        assert_eq!(host.live.len(), 1);
        assert_eq!(
            second.place(A, &mut host),
            Err(PlacementError::SlotOccupied(A))
        );

        // Once the first object leaves, the slot is free again.
        first.set_grabbed(true, &mut host);
        assert!(host.occupied.is_empty());
        second.set_grabbed(true, &mut host);
        second.set_grabbed(false, &mut host);
        assert_eq!(second.placed_slot(), Some(A));
        assert!(host.occupied.contains(&A));
    }

    #[test]
    fn empty_registry_never_highlights_or_places() {
        let mut placer = SlotPlacer::new(AttachMode::Anchor, SlotRegistry::default());
        let mut host = RecordingHost::default();

        assert!(!placer.on_enter(A, &mut host));
        assert_eq!(placer.try_place(&mut host), Ok(false));
        placer.set_grabbed(true, &mut host);
        placer.set_grabbed(false, &mut host);

        assert!(placer.state().is_free());
        assert_eq!(placer.highlighted(), None);
        assert!(host.calls.is_empty());
    }

    fn assert_single_anchor_highlight(placer: &SlotPlacer, host: &RecordingHost) {
        let on = lit(host);
        assert!(on.len() <= 1);
        // Lit whenever free with a candidate, grabbed or not.
        let expected = placer.state().is_free() && !placer.candidates().is_empty();
        assert_eq!(on.len() == 1, expected);
    }

    #[test]
    fn anchor_mode_lights_one_slot_whenever_free() {
        let mut placer = placer(AttachMode::Anchor);
        let mut host = RecordingHost::default();

        placer.on_enter(A, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        assert_eq!(placer.highlighted(), Some(A));
        placer.on_enter(B, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        placer.set_grabbed(true, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        assert_eq!(placer.highlighted(), Some(B));

        placer.set_grabbed(false, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        assert_eq!(placer.placed_slot(), Some(B));
        assert_eq!(placer.highlighted(), None);

        placer.on_enter(A, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        assert_eq!(placer.highlighted(), None);

        placer.set_grabbed(true, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        placer.on_enter(A, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        assert_eq!(placer.highlighted(), Some(A));
        placer.on_exit(A, &mut host);
        assert_single_anchor_highlight(&placer, &host);
        assert_eq!(placer.highlighted(), None);
    }
}
