//! Steering-based locomotion along waypoint paths
//!
//! Seek, separation and bounded integration are accumulated
//! independently each tick. The grid search only needs to get an agent
//! near its goal; steering lets many agents share corridors without
//! grid-level coordination.

use glam::{Quat, Vec3};

use crate::core::constants::{
    BASE_MOVE_SPEED, IDLE_FRICTION, MAX_STEER_FORCE, SEEK_WEIGHT, SEPARATION_RADIUS,
    SEPARATION_WEIGHT, TURN_EPSILON_SQ, TURN_SPEED, WAYPOINT_RADIUS,
};
use crate::core::types::AgentId;

/// Position snapshot of another agent, taken before any agent moves so
/// the whole tick observes one consistent neighbor state.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub id: AgentId,
    pub position: Vec3,
}

/// A moving entity steering along a waypoint path on the ground plane.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    orientation: Quat,
    pub move_speed: f32,
    /// Transient slow factor (e.g. while off the power grid).
    pub speed_multiplier: f32,
    pub max_force: f32,
    pub turn_speed: f32,
    path: Vec<Vec3>,
    waypoint_index: usize,
}

impl Agent {
    pub fn new(position: Vec3) -> Self {
        Self {
            id: AgentId::new(),
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            move_speed: BASE_MOVE_SPEED,
            speed_multiplier: 1.0,
            max_force: MAX_STEER_FORCE,
            turn_speed: TURN_SPEED,
            path: Vec::new(),
            waypoint_index: 0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Replace the active path wholesale and restart from its first
    /// waypoint. Paths are never mutated in place.
    pub fn set_path(&mut self, path: Vec<Vec3>) {
        self.path = path;
        self.waypoint_index = 0;
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.waypoint_index = 0;
    }

    fn effective_speed(&self) -> f32 {
        self.move_speed * self.speed_multiplier
    }

    /// Advance one simulation step.
    pub fn update(&mut self, dt: f32, neighbors: &[Neighbor]) {
        self.acceleration = Vec3::ZERO;

        if self.path.is_empty() {
            // Exponential decay toward rest while idle.
            self.acceleration += self.velocity * -IDLE_FRICTION;
        } else {
            self.follow_path();
        }

        self.apply_separation(neighbors);

        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.clamp_length_max(self.effective_speed());
        self.position += self.velocity * dt;

        self.turn_toward_velocity(dt);
    }

    fn follow_path(&mut self) {
        let target = self.path[self.waypoint_index];
        let mut to_target = target - self.position;
        to_target.y = 0.0;

        if to_target.length() < WAYPOINT_RADIUS {
            self.waypoint_index += 1;
            if self.waypoint_index >= self.path.len() {
                // Arrived.
                self.clear_path();
                self.velocity = Vec3::ZERO;
                return;
            }
        }

        let target = self.path[self.waypoint_index];
        let mut desired = target - self.position;
        desired.y = 0.0;
        let desired = desired.normalize_or_zero() * self.effective_speed();
        let steer = (desired - self.velocity).clamp_length_max(self.max_force);
        self.acceleration += steer * SEEK_WEIGHT;
    }

    fn apply_separation(&mut self, neighbors: &[Neighbor]) {
        let mut push_sum = Vec3::ZERO;
        let mut count = 0;

        for other in neighbors {
            if other.id == self.id {
                continue;
            }
            let dist = self.position.distance(other.position);
            if dist >= SEPARATION_RADIUS {
                continue;
            }
            if dist > f32::EPSILON {
                let mut push = self.position - other.position;
                push.y = 0.0;
                // Closer neighbors push harder.
                push_sum += push.normalize_or_zero() / dist;
            } else {
                // Exactly overlapping pair: the offset gives no
                // direction, so take one from the id order and treat
                // the neighbor as nearly touching. Both sides pick
                // opposite signs, so the pair still separates.
                let dir = if self.id.0 < other.id.0 {
                    Vec3::X
                } else {
                    Vec3::NEG_X
                };
                push_sum += dir / 0.05;
            }
            count += 1;
        }

        if count > 0 {
            let desired = (push_sum / count as f32).normalize_or_zero() * self.effective_speed();
            let steer = (desired - self.velocity).clamp_length_max(self.max_force);
            self.acceleration += steer * SEPARATION_WEIGHT;
        }
    }

    /// Smoothly rotate toward the velocity direction at a bounded
    /// angular rate. Facing never snaps.
    fn turn_toward_velocity(&mut self, dt: f32) {
        if self.velocity.length_squared() <= TURN_EPSILON_SQ {
            return;
        }
        let yaw = self.velocity.x.atan2(self.velocity.z);
        let target = Quat::from_rotation_y(yaw);
        let t = (self.turn_speed * dt).min(1.0);
        self.orientation = self.orientation.slerp(target, t);
    }
}
