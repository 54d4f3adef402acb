//! Frame-rate independent damped interpolation.
//!
//! Every animated value keeps its own velocity so it can be retargeted
//! mid-flight without a visible kink.  The spring is the critically damped
//! "smooth damp" formulation: `smooth_time` is roughly the time it takes
//! to cover most of the remaining distance.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Below this distance a value snaps onto its target.
const SETTLE_EPSILON: f32 = 1e-3;

/// Smallest smoothing time accepted (avoids an infinite spring constant).
const MIN_SMOOTH_TIME: f32 = 1e-4;

// ───────────────────────────────────────── scalar ────────────

/// One damped scalar with carried velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Damped {
    pub value: f32,
    pub velocity: f32,
}

impl Damped {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
        }
    }

    /// Move toward `target`.  Returns `true` while still moving.
    ///
    /// A non-positive or non-finite `dt`, or a non-finite target, leaves the
    /// value untouched.
    pub fn step(&mut self, target: f32, smooth_time: f32, dt: f32) -> bool {
        if dt <= 0.0 || !dt.is_finite() || !target.is_finite() {
            return false;
        }
        if (self.value - target).abs() <= SETTLE_EPSILON && self.velocity.abs() <= SETTLE_EPSILON {
            self.value = target;
            self.velocity = 0.0;
            return false;
        }

        let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
        let omega = 2.0 / smooth_time;
        let x = omega * dt;
        // Padé approximation of exp(-x).
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = self.value - target;
        let temp = (self.velocity + omega * change) * dt;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut output = target + (change + temp) * decay;

        // Never overshoot.
        if (target - self.value > 0.0) == (output > target) {
            output = target;
            self.velocity = 0.0;
        }

        self.value = output;
        true
    }

    /// Like [`step`](Self::step) but treats the value as an angle in radians
    /// and travels the short way round.
    pub fn step_angle(&mut self, target: f32, smooth_time: f32, dt: f32) -> bool {
        if !target.is_finite() {
            return false;
        }
        let delta = wrap_angle(target - self.value);
        self.step(self.value + delta, smooth_time, dt)
    }

    /// Jump straight to `value` and forget any velocity.
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }
}

/// Wrap an angle difference into `(-π, π]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

// ───────────────────────────────────────── vectors ───────────

/// Three independently damped axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DampedVec3 {
    axes: [Damped; 3],
}

impl DampedVec3 {
    pub fn new(value: Vec3) -> Self {
        Self {
            axes: [
                Damped::new(value.x),
                Damped::new(value.y),
                Damped::new(value.z),
            ],
        }
    }

    pub fn value(&self) -> Vec3 {
        Vec3::new(self.axes[0].value, self.axes[1].value, self.axes[2].value)
    }

    pub fn step(&mut self, target: Vec3, smooth_time: f32, dt: f32) -> bool {
        let t = target.to_array();
        let mut moving = false;
        for (axis, goal) in self.axes.iter_mut().zip(t) {
            moving |= axis.step(goal, smooth_time, dt);
        }
        moving
    }

    /// Per-axis shortest-angle damping for Euler rotations.
    pub fn step_euler(&mut self, target: Vec3, smooth_time: f32, dt: f32) -> bool {
        let t = target.to_array();
        let mut moving = false;
        for (axis, goal) in self.axes.iter_mut().zip(t) {
            moving |= axis.step_angle(goal, smooth_time, dt);
        }
        moving
    }
}

// ───────────────────────────────────────── pose ──────────────

/// Position, XYZ Euler rotation, and scale of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Pose {
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

/// A pose that approaches a target pose.  Each channel can use its own
/// smoothing time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DampedPose {
    position: DampedVec3,
    rotation: DampedVec3,
    scale: DampedVec3,
}

/// Smoothing times for one step of a [`DampedPose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSmoothing {
    pub position: f32,
    pub rotation: f32,
    pub scale: f32,
}

impl PoseSmoothing {
    pub const fn uniform(t: f32) -> Self {
        Self {
            position: t,
            rotation: t,
            scale: t,
        }
    }
}

impl DampedPose {
    pub fn new(pose: Pose) -> Self {
        Self {
            position: DampedVec3::new(pose.position),
            rotation: DampedVec3::new(pose.rotation),
            scale: DampedVec3::new(pose.scale),
        }
    }

    pub fn current(&self) -> Pose {
        Pose {
            position: self.position.value(),
            rotation: self.rotation.value(),
            scale: self.scale.value(),
        }
    }

    /// Advance every channel toward `target`.  Returns `true` while moving.
    pub fn step(&mut self, target: &Pose, smoothing: PoseSmoothing, dt: f32) -> bool {
        let a = self.position.step(target.position, smoothing.position, dt);
        let b = self.rotation.step_euler(target.rotation, smoothing.rotation, dt);
        let c = self.scale.step(target.scale, smoothing.scale, dt);
        a || b || c
    }
}

// ───────────────────────────────────────── arena ─────────────

/// Current poses for every card, indexed by gallery position.
#[derive(Debug, Clone, Default)]
pub struct PoseArena {
    poses: Vec<DampedPose>,
}

impl PoseArena {
    pub fn from_poses(initial: impl IntoIterator<Item = Pose>) -> Self {
        Self {
            poses: initial.into_iter().map(DampedPose::new).collect(),
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut DampedPose> {
        self.poses.get_mut(index)
    }
}
