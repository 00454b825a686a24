//! ECS components for raid entities.
//!
//! Components are plain data. Systems in `crate::systems` read and mutate
//! them; the raid session owns the world they live in.

use glam::DVec2;

/// An attacker walking toward the base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaidEnemy {
    pub hp: f64,
    /// Units per second.
    pub speed: f64,
}

impl RaidEnemy {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// A turret shot flying in a straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub damage: f64,
    /// Units per second.
    pub speed: f64,
    /// Unit direction of travel, fixed when fired.
    pub heading: DVec2,
    pub age_secs: f64,
    /// Hit something or expired; removed by cleanup.
    pub spent: bool,
}
