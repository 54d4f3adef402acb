//! Per-card motion: which state a card is in, and where that state wants
//! the card to be.
//!
//! Target poses are pure functions of global state.  Getting there smoothly
//! is [`DampedPose`](super::damp::DampedPose)'s job.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::damp::{wrap_angle, Pose, PoseSmoothing};

// ───────────────────────────────────────── mode ──────────────

/// Global interaction mode.  Exactly one item is open, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Browsing,
    Viewing(usize),
}

impl InteractionMode {
    pub fn open_index(self) -> Option<usize> {
        match self {
            InteractionMode::Browsing => None,
            InteractionMode::Viewing(i) => Some(i),
        }
    }

    pub fn is_viewing(self) -> bool {
        matches!(self, InteractionMode::Viewing(_))
    }
}

// ───────────────────────────────────────── state ─────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Browsing, not under the pointer.
    Idle,
    /// Browsing, under the pointer.
    Hovered,
    /// This card is open.
    Active,
    /// Another card is open.
    Receding,
}

impl CardState {
    pub fn resolve(mode: InteractionMode, hovered: Option<usize>, index: usize) -> Self {
        match mode {
            InteractionMode::Viewing(open) if open == index => CardState::Active,
            InteractionMode::Viewing(_) => CardState::Receding,
            InteractionMode::Browsing if hovered == Some(index) => CardState::Hovered,
            InteractionMode::Browsing => CardState::Idle,
        }
    }
}

// ───────────────────────────────────────── tuning ────────────

/// Constants shaping every target pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTuning {
    /// Vertical push applied to neighbours of the hovered card.
    pub hover_separation: f32,
    /// How far a hovered card comes toward the viewer.
    pub hover_depth: f32,
    pub hover_scale: f32,
    /// X tilt of a hovered card (close to camera-facing).
    pub hover_tilt: f32,
    /// Resting X tilt of every card.
    pub rest_tilt: f32,
    /// Resting yaw, alternating sign per card.
    pub rest_yaw: f32,
    /// Idle yaw rate in rad/s.
    pub idle_spin_rate: f32,
    /// Where the open card sits, relative to the stack group.
    pub reading_slot: Vec3,
    pub reading_scale: f32,
    /// Where other cards go while one is open.
    pub receding_offset: Vec3,
    pub idle_smoothing: f32,
    pub active_smoothing: f32,
    pub receding_smoothing: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            hover_separation: 1.8,
            hover_depth: 2.5,
            hover_scale: 1.05,
            hover_tilt: 1.3,
            rest_tilt: 0.4,
            rest_yaw: 0.1,
            idle_spin_rate: 0.25,
            reading_slot: Vec3::new(3.5, 0.0, 0.0),
            reading_scale: 2.0,
            receding_offset: Vec3::new(-20.0, 0.0, -10.0),
            idle_smoothing: 0.3,
            active_smoothing: 0.4,
            receding_smoothing: 0.5,
        }
    }
}

// ───────────────────────────────────────── targets ───────────

/// Everything a card's target depends on, snapshotted at frame start.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub index: usize,
    pub state: CardState,
    /// Resting y of this card inside the stack group.
    pub rest_y: f32,
    /// Hovered card, if any (only meaningful while browsing).
    pub hovered: Option<usize>,
    /// Seconds since the stage started; drives the idle spin.
    pub elapsed: f32,
}

/// The pose a card rests in before anything happens.
pub fn rest_pose(index: usize, rest_y: f32, tuning: &MotionTuning) -> Pose {
    Pose {
        position: Vec3::new(0.0, rest_y, 0.0),
        rotation: Vec3::new(tuning.rest_tilt, rest_yaw(index, tuning), 0.0),
        scale: Vec3::ONE,
    }
}

fn rest_yaw(index: usize, tuning: &MotionTuning) -> f32 {
    if index % 2 == 0 {
        tuning.rest_yaw
    } else {
        -tuning.rest_yaw
    }
}

/// Where `ctx.state` wants the card.
pub fn target_pose(ctx: &TargetContext, tuning: &MotionTuning) -> Pose {
    match ctx.state {
        CardState::Idle => {
            let mut y = ctx.rest_y;
            let mut yaw = rest_yaw(ctx.index, tuning);
            match ctx.hovered {
                Some(h) if ctx.index > h => y += tuning.hover_separation,
                Some(h) if ctx.index < h => y -= tuning.hover_separation,
                Some(_) => {}
                None => {
                    let spin = ctx.elapsed * tuning.idle_spin_rate;
                    if spin.is_finite() {
                        yaw = wrap_angle(yaw + spin);
                    }
                }
            }
            Pose {
                position: Vec3::new(0.0, y, 0.0),
                rotation: Vec3::new(tuning.rest_tilt, yaw, 0.0),
                scale: Vec3::ONE,
            }
        }
        CardState::Hovered => Pose {
            position: Vec3::new(0.0, ctx.rest_y, tuning.hover_depth),
            rotation: Vec3::new(tuning.hover_tilt, 0.0, 0.0),
            scale: Vec3::splat(tuning.hover_scale),
        },
        CardState::Active => Pose {
            position: tuning.reading_slot,
            rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
            scale: Vec3::splat(tuning.reading_scale),
        },
        CardState::Receding => Pose {
            position: Vec3::new(
                tuning.receding_offset.x,
                ctx.rest_y + tuning.receding_offset.y,
                tuning.receding_offset.z,
            ),
            rotation: Vec3::new(tuning.rest_tilt, rest_yaw(ctx.index, tuning), 0.0),
            scale: Vec3::ONE,
        },
    }
}

/// Smoothing times for a state.
pub fn smoothing_for(state: CardState, tuning: &MotionTuning) -> PoseSmoothing {
    match state {
        CardState::Idle | CardState::Hovered => PoseSmoothing::uniform(tuning.idle_smoothing),
        CardState::Active => PoseSmoothing::uniform(tuning.active_smoothing),
        CardState::Receding => PoseSmoothing {
            position: tuning.receding_smoothing,
            rotation: tuning.receding_smoothing,
            scale: tuning.active_smoothing,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    fn ctx(index: usize, state: CardState, hovered: Option<usize>) -> TargetContext {
        TargetContext {
            index,
            state,
            rest_y: index as f32 * 1.5,
            hovered,
            elapsed: 0.0,
        }
    }

    #[test]
    fn resolves_states_from_mode_and_hover() {
        use InteractionMode::*;
        assert_eq!(CardState::resolve(Browsing, None, 2), CardState::Idle);
        assert_eq!(CardState::resolve(Browsing, Some(2), 2), CardState::Hovered);
        assert_eq!(CardState::resolve(Browsing, Some(1), 2), CardState::Idle);
        assert_eq!(CardState::resolve(Viewing(2), Some(2), 2), CardState::Active);
        assert_eq!(CardState::resolve(Viewing(0), None, 2), CardState::Receding);
    }

    #[test]
    fn neighbours_make_room_for_the_hovered_card() {
        let t = MotionTuning::default();
        let above = target_pose(&ctx(3, CardState::Idle, Some(2)), &t);
        let below = target_pose(&ctx(1, CardState::Idle, Some(2)), &t);
        assert!((above.position.y - (4.5 + t.hover_separation)).abs() < 1e-5);
        assert!((below.position.y - (1.5 - t.hover_separation)).abs() < 1e-5);
    }

    #[test]
    fn hovered_card_comes_forward_and_flattens() {
        let t = MotionTuning::default();
        let idle = target_pose(&ctx(2, CardState::Idle, None), &t);
        let hovered = target_pose(&ctx(2, CardState::Hovered, Some(2)), &t);
        assert!(hovered.position.z > idle.position.z);
        assert!(hovered.scale.x > idle.scale.x);
        assert!(hovered.rotation.x > idle.rotation.x);
        assert_eq!(hovered.rotation.y, 0.0);
    }

    #[test]
    fn idle_spin_only_without_hover() {
        let t = MotionTuning::default();
        let mut a = ctx(0, CardState::Idle, None);
        let mut b = a;
        a.elapsed = 0.0;
        b.elapsed = 1.7;
        assert_ne!(target_pose(&a, &t).rotation.y, target_pose(&b, &t).rotation.y);

        // A full turn later the card faces the same way: the spin keeps going
        // rather than swinging back.
        let mut c = a;
        c.elapsed = TAU / t.idle_spin_rate;
        let (ya, yc) = (target_pose(&a, &t).rotation.y, target_pose(&c, &t).rotation.y);
        assert!(wrap_angle(ya - yc).abs() < 1e-3);
        let mut half = a;
        half.elapsed = PI / t.idle_spin_rate;
        let yh = target_pose(&half, &t).rotation.y;
        assert!((wrap_angle(yh - ya).abs() - PI).abs() < 1e-3);

        a.hovered = Some(3);
        b.hovered = Some(3);
        assert_eq!(target_pose(&a, &t).rotation.y, target_pose(&b, &t).rotation.y);
    }

    #[test]
    fn active_and_receding_targets() {
        let t = MotionTuning::default();
        let active = target_pose(&ctx(4, CardState::Active, None), &t);
        assert_eq!(active.position, t.reading_slot);
        assert_eq!(active.scale, Vec3::splat(2.0));
        assert!((active.rotation.x - FRAC_PI_2).abs() < 1e-6);

        let away = target_pose(&ctx(1, CardState::Receding, None), &t);
        assert!(away.position.x <= -10.0);
        assert!(away.position.z < 0.0);
        assert_eq!(away.scale, Vec3::ONE);
    }
}
