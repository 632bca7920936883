//! Camera focus/reset sequencing.
//!
//! The sequencer is a small state machine advanced by `update(dt)`:
//!
//! ```text
//! Idle -> Focusing -> Focused -> Resetting -> Idle
//!   \-> Entering -> Idle            (load flourish)
//! ```
//!
//! During `Focusing` the camera eye and orbit target are interpolated with
//! the same eased parameter from the same tick, so the two stay in lockstep
//! by construction. Side effects (revealing a section halfway through,
//! completing a reset) are returned as events rather than run on timers,
//! which keeps the whole thing drivable by a synthetic clock in tests.
//!
//! `is_interacting` is true from a successful `focus_on` until the reset
//! completes; input handlers gate on it to prevent re-entrant triggers.
//! There is no tween cancellation - overlapping requests are rejected.

use cgmath::Vector3;

use crate::content::SectionId;
use crate::gfx::camera::orbit_camera::CameraPose;

use super::easing::{ease_in_out_cubic, ease_out_cubic};

/// Camera offset used when an interactable does not specify one.
pub const DEFAULT_FOCUS_OFFSET: Vector3<f32> = Vector3::new(5.0, 5.0, 5.0);

/// Externally visible phase of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerPhase {
    Idle,
    Entering,
    Focusing,
    Focused,
    Resetting,
}

/// Side effects emitted by [`CameraSequencer::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Reveal this section; fired once per focus, halfway through the move
    /// so the panel appears as the camera settles.
    RevealSection(SectionId),
    /// The focus move finished; the camera is parked on the target.
    FocusSettled,
    /// The reset finished; orbit input may be re-enabled.
    ResetComplete,
}

/// Result of advancing the sequencer by one tick.
#[derive(Debug, Default)]
pub struct SequencerOutput {
    /// Pose to apply to the camera this frame, if the camera is animating.
    pub pose: Option<CameraPose>,
    pub events: Vec<SequencerEvent>,
}

enum State {
    Idle,
    Entering {
        elapsed: f32,
        from: CameraPose,
    },
    Focusing {
        elapsed: f32,
        from: CameraPose,
        to: CameraPose,
        section: SectionId,
        revealed: bool,
    },
    Focused {
        at: CameraPose,
        section: SectionId,
    },
    Resetting {
        elapsed: f32,
        from: CameraPose,
    },
}

pub struct CameraSequencer {
    duration: f32,
    entry_duration: f32,
    default_pose: CameraPose,
    state: State,
}

impl CameraSequencer {
    pub fn new(duration_secs: f32, entry_duration_secs: f32, default_pose: CameraPose) -> Self {
        Self {
            duration: duration_secs.max(f32::EPSILON),
            entry_duration: entry_duration_secs.max(f32::EPSILON),
            default_pose,
            state: State::Idle,
        }
    }

    pub fn phase(&self) -> SequencerPhase {
        match self.state {
            State::Idle => SequencerPhase::Idle,
            State::Entering { .. } => SequencerPhase::Entering,
            State::Focusing { .. } => SequencerPhase::Focusing,
            State::Focused { .. } => SequencerPhase::Focused,
            State::Resetting { .. } => SequencerPhase::Resetting,
        }
    }

    /// True from a successful [`CameraSequencer::focus_on`] until the
    /// matching reset completes.
    pub fn is_interacting(&self) -> bool {
        matches!(
            self.state,
            State::Focusing { .. } | State::Focused { .. } | State::Resetting { .. }
        )
    }

    /// Whether free orbit input should currently be accepted. The entry
    /// flourish does not lock input; a focus does.
    pub fn orbit_enabled(&self) -> bool {
        !self.is_interacting()
    }

    pub fn default_pose(&self) -> CameraPose {
        self.default_pose
    }

    /// Starts the one-shot entry flourish from `entry_eye` down to the
    /// default pose. Ignored while an interaction is in flight.
    pub fn begin_entry(&mut self, entry_eye: Vector3<f32>) {
        if self.is_interacting() {
            return;
        }
        self.state = State::Entering {
            elapsed: 0.0,
            from: CameraPose::new(entry_eye, self.default_pose.target),
        };
    }

    /// Begins a focus move from `current` toward `target + offset`, looking
    /// at `target`. Returns false (and does nothing) when an interaction is
    /// already in flight; callers treat that as "ignore the click".
    pub fn focus_on(
        &mut self,
        current: CameraPose,
        target: Vector3<f32>,
        offset: Option<Vector3<f32>>,
        section: SectionId,
    ) -> bool {
        if self.is_interacting() {
            return false;
        }
        let to = CameraPose::new(target + offset.unwrap_or(DEFAULT_FOCUS_OFFSET), target);
        self.state = State::Focusing {
            elapsed: 0.0,
            from: current,
            to,
            section,
            revealed: false,
        };
        true
    }

    /// Begins the reverse move back to the default pose. Only legal while
    /// focusing or focused; returns false otherwise.
    pub fn reset(&mut self) -> bool {
        let from = match &self.state {
            State::Focusing { elapsed, from, to, .. } => {
                from.lerp(to, ease_in_out_cubic(elapsed / self.duration))
            }
            State::Focused { at, .. } => *at,
            _ => return false,
        };
        self.state = State::Resetting { elapsed: 0.0, from };
        true
    }

    /// The section currently focused or being focused, if any.
    pub fn active_section(&self) -> Option<SectionId> {
        match &self.state {
            State::Focusing { section, .. } | State::Focused { section, .. } => Some(*section),
            _ => None,
        }
    }

    /// Advances the animation clock by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> SequencerOutput {
        let mut output = SequencerOutput::default();

        self.state = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                output.pose = None;
                State::Idle
            }
            State::Entering { elapsed, from } => {
                let elapsed = elapsed + dt;
                let t = ease_out_cubic(elapsed / self.entry_duration);
                output.pose = Some(from.lerp(&self.default_pose, t));
                if elapsed >= self.entry_duration {
                    State::Idle
                } else {
                    State::Entering { elapsed, from }
                }
            }
            State::Focusing {
                elapsed,
                from,
                to,
                section,
                mut revealed,
            } => {
                let elapsed = elapsed + dt;
                let t = ease_in_out_cubic(elapsed / self.duration);
                output.pose = Some(from.lerp(&to, t));

                if !revealed && elapsed >= self.duration * 0.5 {
                    revealed = true;
                    output.events.push(SequencerEvent::RevealSection(section));
                }

                if elapsed >= self.duration {
                    output.events.push(SequencerEvent::FocusSettled);
                    State::Focused { at: to, section }
                } else {
                    State::Focusing {
                        elapsed,
                        from,
                        to,
                        section,
                        revealed,
                    }
                }
            }
            State::Focused { at, section } => {
                output.pose = None;
                State::Focused { at, section }
            }
            State::Resetting { elapsed, from } => {
                let elapsed = elapsed + dt;
                let t = ease_in_out_cubic(elapsed / self.duration);
                output.pose = Some(from.lerp(&self.default_pose, t));
                if elapsed >= self.duration {
                    output.events.push(SequencerEvent::ResetComplete);
                    State::Idle
                } else {
                    State::Resetting { elapsed, from }
                }
            }
        };

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    const DURATION: f32 = 1.5;

    fn default_pose() -> CameraPose {
        CameraPose::new(Vector3::new(18.0, 12.0, 18.0), Vector3::new(0.0, 0.0, 0.0))
    }

    fn sequencer() -> CameraSequencer {
        CameraSequencer::new(DURATION, 2.0, default_pose())
    }

    /// Runs updates until the predicate event fires, returning the elapsed
    /// virtual time and the last pose seen.
    fn run_until(
        seq: &mut CameraSequencer,
        dt: f32,
        stop_on: SequencerEvent,
    ) -> (f32, Option<CameraPose>) {
        let mut elapsed = 0.0;
        let mut last_pose = None;
        for _ in 0..1000 {
            elapsed += dt;
            let out = seq.update(dt);
            if out.pose.is_some() {
                last_pose = out.pose;
            }
            if out.events.contains(&stop_on) {
                return (elapsed, last_pose);
            }
        }
        panic!("event {stop_on:?} never fired");
    }

    #[test]
    fn idle_until_first_focus() {
        let mut seq = sequencer();
        assert!(!seq.is_interacting());
        assert_eq!(seq.phase(), SequencerPhase::Idle);
        assert!(seq.update(0.1).pose.is_none());
    }

    #[test]
    fn focus_becomes_interacting_immediately() {
        let mut seq = sequencer();
        assert!(seq.focus_on(
            default_pose(),
            Vector3::new(0.0, 1.0, 0.0),
            None,
            SectionId::Skills,
        ));
        assert!(seq.is_interacting());
        assert!(!seq.orbit_enabled());
    }

    #[test]
    fn tv_click_lands_camera_at_offset_and_target() {
        // TV at (10, 2, -5) with offset (0, 0, 4): camera must end at
        // (10, 2, -1), looking at the TV.
        let mut seq = sequencer();
        seq.focus_on(
            default_pose(),
            Vector3::new(10.0, 2.0, -5.0),
            Some(Vector3::new(0.0, 0.0, 4.0)),
            SectionId::GameProject,
        );
        let (_, pose) = run_until(&mut seq, 0.1, SequencerEvent::FocusSettled);
        let pose = pose.unwrap();
        assert!((pose.eye - Vector3::new(10.0, 2.0, -1.0)).magnitude() < 1e-4);
        assert!((pose.target - Vector3::new(10.0, 2.0, -5.0)).magnitude() < 1e-4);
        assert_eq!(seq.phase(), SequencerPhase::Focused);
        assert!(seq.is_interacting());
    }

    #[test]
    fn missing_offset_defaults_to_the_diagonal() {
        let mut seq = sequencer();
        seq.focus_on(default_pose(), Vector3::new(1.0, 1.0, 1.0), None, SectionId::AboutMe);
        let (_, pose) = run_until(&mut seq, 0.1, SequencerEvent::FocusSettled);
        assert!((pose.unwrap().eye - Vector3::new(6.0, 6.0, 6.0)).magnitude() < 1e-4);
    }

    #[test]
    fn reveal_fires_once_between_half_and_full_duration() {
        let mut seq = sequencer();
        seq.focus_on(default_pose(), Vector3::new(0.0, 1.0, 0.0), None, SectionId::Projects);

        let mut reveal_time = None;
        let mut reveal_count = 0;
        let mut elapsed = 0.0;
        while seq.phase() != SequencerPhase::Focused {
            elapsed += 0.05;
            let out = seq.update(0.05);
            for event in &out.events {
                if matches!(event, SequencerEvent::RevealSection(SectionId::Projects)) {
                    reveal_count += 1;
                    reveal_time = Some(elapsed);
                }
            }
        }

        assert_eq!(reveal_count, 1);
        let reveal_time = reveal_time.unwrap();
        assert!(reveal_time >= DURATION * 0.5 - 1e-4);
        assert!(reveal_time <= DURATION + 1e-4);
    }

    #[test]
    fn eye_and_target_move_in_lockstep() {
        let mut seq = sequencer();
        let from = default_pose();
        let target = Vector3::new(10.0, 2.0, -5.0);
        seq.focus_on(from, target, Some(Vector3::new(0.0, 0.0, 4.0)), SectionId::GameProject);
        let to = CameraPose::new(Vector3::new(10.0, 2.0, -1.0), target);

        let mut elapsed: f32 = 0.0;
        for _ in 0..10 {
            elapsed += 0.1;
            let out = seq.update(0.1);
            let pose = out.pose.unwrap();
            let t = crate::interaction::easing::ease_in_out_cubic(elapsed / DURATION);
            let expected = from.lerp(&to, t);
            assert!((pose.eye - expected.eye).magnitude() < 1e-4);
            assert!((pose.target - expected.target).magnitude() < 1e-4);
        }
    }

    #[test]
    fn second_focus_while_interacting_is_rejected() {
        let mut seq = sequencer();
        assert!(seq.focus_on(default_pose(), Vector3::new(0.0, 1.0, 0.0), None, SectionId::Skills));
        assert!(!seq.focus_on(
            default_pose(),
            Vector3::new(9.0, 9.0, 9.0),
            None,
            SectionId::Contact,
        ));
        // Still heading for the first target.
        assert_eq!(seq.active_section(), Some(SectionId::Skills));

        seq.update(DURATION + 0.1);
        assert!(!seq.focus_on(default_pose(), Vector3::new(9.0, 9.0, 9.0), None, SectionId::Contact));
    }

    #[test]
    fn reset_requires_a_focus_and_releases_interaction_only_on_completion() {
        let mut seq = sequencer();
        assert!(!seq.reset());

        seq.focus_on(default_pose(), Vector3::new(0.0, 1.0, 0.0), None, SectionId::Skills);
        seq.update(DURATION + 0.1);
        assert!(seq.reset());
        assert!(seq.is_interacting());

        let mut done = false;
        for _ in 0..40 {
            let out = seq.update(0.05);
            if out.events.contains(&SequencerEvent::ResetComplete) {
                done = true;
                break;
            }
            assert!(seq.is_interacting());
        }
        assert!(done);
        assert!(!seq.is_interacting());
        assert!(seq.orbit_enabled());
        assert_eq!(seq.phase(), SequencerPhase::Idle);
    }

    #[test]
    fn reset_returns_the_camera_to_the_default_pose() {
        let mut seq = sequencer();
        seq.focus_on(default_pose(), Vector3::new(3.0, 0.5, 2.0), None, SectionId::AboutMe);
        seq.update(DURATION + 0.1);
        seq.reset();
        let (_, pose) = run_until(&mut seq, 0.1, SequencerEvent::ResetComplete);
        let pose = pose.unwrap();
        assert!((pose.eye - default_pose().eye).magnitude() < 1e-4);
        assert!((pose.target - default_pose().target).magnitude() < 1e-4);
    }

    #[test]
    fn reset_midway_through_a_focus_starts_from_the_interpolated_pose() {
        let mut seq = sequencer();
        seq.focus_on(default_pose(), Vector3::new(0.0, 2.0, 6.0), None, SectionId::Skills);
        let midway = seq.update(DURATION * 0.4).pose.unwrap();
        assert!(seq.reset());
        // The first reset tick should continue from (near) the midway pose,
        // not jump to the focus destination.
        let first = seq.update(1e-4).pose.unwrap();
        assert!((first.eye - midway.eye).magnitude() < 0.01);
    }

    #[test]
    fn entry_flourish_settles_on_the_default_pose_without_interacting() {
        let mut seq = sequencer();
        seq.begin_entry(Vector3::new(50.0, 50.0, 50.0));
        assert_eq!(seq.phase(), SequencerPhase::Entering);
        assert!(!seq.is_interacting());
        assert!(seq.orbit_enabled());

        let mut last = None;
        for _ in 0..50 {
            if let Some(pose) = seq.update(0.05).pose {
                last = Some(pose);
            }
            if seq.phase() == SequencerPhase::Idle {
                break;
            }
        }
        let last = last.unwrap();
        assert!((last.eye - default_pose().eye).magnitude() < 1e-3);
        assert_eq!(seq.phase(), SequencerPhase::Idle);
    }

    #[test]
    fn focus_interrupts_the_entry_flourish() {
        let mut seq = sequencer();
        seq.begin_entry(Vector3::new(50.0, 50.0, 50.0));
        seq.update(0.2);
        assert!(seq.focus_on(default_pose(), Vector3::new(0.0, 1.0, 0.0), None, SectionId::AboutMe));
        assert_eq!(seq.phase(), SequencerPhase::Focusing);
    }
}
