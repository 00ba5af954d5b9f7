use super::*;

fn release_after(direction: LayoutDirection, delta: f64) -> GestureOutcome {
    let mut gesture = SwipeGesture::new(direction);
    assert!(gesture.begin(200.0));
    gesture.drag(200.0 + delta).expect("dragging");
    gesture.end().expect("outcome")
}

#[test]
fn ltr_release_decides_by_threshold() {
    assert_eq!(
        release_after(LayoutDirection::Ltr, -101.0),
        GestureOutcome::CommitDelete
    );
    assert_eq!(
        release_after(LayoutDirection::Ltr, -99.0),
        GestureOutcome::Reverted
    );
    assert_eq!(
        release_after(LayoutDirection::Ltr, 101.0),
        GestureOutcome::CommitReset
    );
    assert_eq!(
        release_after(LayoutDirection::Ltr, 99.0),
        GestureOutcome::Reverted
    );
}

#[test]
fn rtl_release_mirrors_the_pointer() {
    assert_eq!(
        release_after(LayoutDirection::Rtl, 101.0),
        GestureOutcome::CommitDelete
    );
    assert_eq!(
        release_after(LayoutDirection::Rtl, 99.0),
        GestureOutcome::Reverted
    );
    assert_eq!(
        release_after(LayoutDirection::Rtl, -101.0),
        GestureOutcome::CommitReset
    );
    assert_eq!(
        release_after(LayoutDirection::Rtl, -99.0),
        GestureOutcome::Reverted
    );
}

#[test]
fn exactly_at_threshold_reverts() {
    assert_eq!(
        release_after(LayoutDirection::Ltr, -100.0),
        GestureOutcome::Reverted
    );
    assert_eq!(
        release_after(LayoutDirection::Ltr, 100.0),
        GestureOutcome::Reverted
    );
}

#[test]
fn frame_is_clamped_but_commit_uses_raw_offset() {
    let mut gesture = SwipeGesture::default();
    gesture.begin(0.0);
    let frame = gesture.drag(-400.0).expect("dragging");
    assert_eq!(frame.offset, -MAX_DRAG_OFFSET);
    assert_eq!(frame.delete_reveal, 1.0);
    assert_eq!(frame.reset_reveal, 0.0);
    assert_eq!(
        gesture.phase(),
        GesturePhase::Dragging {
            start: 0.0,
            offset: -400.0
        }
    );
    assert_eq!(gesture.end(), Some(GestureOutcome::CommitDelete));
}

#[test]
fn reveal_grows_with_distance_on_one_side_only() {
    let mut gesture = SwipeGesture::default();
    gesture.begin(0.0);

    let half = gesture.drag(50.0).expect("dragging");
    assert_eq!(half.reset_reveal, 0.5);
    assert_eq!(half.delete_reveal, 0.0);

    let left = gesture.drag(-25.0).expect("dragging");
    assert_eq!(left.delete_reveal, 0.25);
    assert_eq!(left.reset_reveal, 0.0);

    let centered = gesture.drag(0.0).expect("dragging");
    assert_eq!(centered, SwipeFrame::at_rest());
}

#[test]
fn rtl_frame_translates_with_the_finger() {
    let mut gesture = SwipeGesture::new(LayoutDirection::Rtl);
    gesture.begin(100.0);
    let frame = gesture.drag(160.0).expect("dragging");
    assert_eq!(frame.offset, -60.0);
    assert!(frame.delete_reveal > 0.0);
    assert_eq!(frame.translate_x(LayoutDirection::Rtl), 60.0);
}

#[test]
fn events_outside_their_phase_are_ignored() {
    let mut gesture = SwipeGesture::default();
    assert_eq!(gesture.drag(10.0), None);
    assert_eq!(gesture.end(), None);
    assert_eq!(gesture.cancel(), None);

    gesture.begin(0.0);
    assert!(!gesture.begin(50.0), "second pointer down is ignored");
    gesture.drag(-150.0);
    assert_eq!(gesture.end(), Some(GestureOutcome::CommitDelete));
    assert_eq!(gesture.phase(), GesturePhase::Committed(SwipeAction::Delete));

    assert!(!gesture.begin(0.0), "must settle before a new drag");
    assert_eq!(gesture.settle(), SwipeFrame::at_rest());
    assert_eq!(gesture.phase(), GesturePhase::Idle);
    assert!(gesture.begin(0.0));
}

#[test]
fn release_without_movement_reverts() {
    let mut gesture = SwipeGesture::default();
    gesture.begin(30.0);
    assert_eq!(gesture.end(), Some(GestureOutcome::Reverted));
    assert_eq!(gesture.phase(), GesturePhase::Reverting);
    gesture.settle();
    assert_eq!(gesture.phase(), GesturePhase::Idle);
}

#[test]
fn cancel_reverts_even_past_threshold() {
    let mut gesture = SwipeGesture::default();
    gesture.begin(0.0);
    gesture.drag(300.0);
    assert_eq!(gesture.cancel(), Some(GestureOutcome::Reverted));
    assert_eq!(gesture.phase(), GesturePhase::Reverting);
}

#[test]
fn settle_does_not_interrupt_a_drag() {
    let mut gesture = SwipeGesture::default();
    gesture.begin(0.0);
    gesture.drag(20.0);
    gesture.settle();
    assert!(matches!(gesture.phase(), GesturePhase::Dragging { .. }));
}

#[test]
fn outcomes_map_to_store_intents() {
    let id = SwimmerId(9);
    assert_eq!(
        GestureOutcome::CommitDelete.intent(id),
        Some(Intent::Remove(id))
    );
    assert_eq!(GestureOutcome::CommitReset.intent(id), Some(Intent::Reset(id)));
    assert_eq!(GestureOutcome::Reverted.intent(id), None);
}

#[test]
fn layout_direction_parses_case_insensitively() {
    assert_eq!("RTL".parse::<LayoutDirection>(), Ok(LayoutDirection::Rtl));
    assert_eq!(" ltr ".parse::<LayoutDirection>(), Ok(LayoutDirection::Ltr));
    assert!("sideways".parse::<LayoutDirection>().is_err());
    assert_eq!(LayoutDirection::Rtl.to_string(), "rtl");
}
