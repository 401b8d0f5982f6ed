//! 物理システムモジュール
//!
//! このモジュールは、サンドボックス内の物理シミュレーションを担当します。
//! パーティクルと障害物の定義、衝突検出と応答、重力と移動の積分を提供します。

use serde::Serialize;

pub mod collision;
pub mod dynamics;
pub mod obstacle;
pub mod particle;

pub use collision::{
    detect_obstacle_hit, particles_overlap, reflect_off_walls, resolve_particle_obstacle,
    resolve_particle_pair, ObstacleHit,
};
pub use dynamics::{apply_gravity, integrate};
pub use obstacle::{Edge, Obstacle};
pub use particle::{Particle, ParticleFactory, ParticleId};

/// ワールドの境界
///
/// 原点は左下で、x ∈ [0, width]、y ∈ [0, height]がシミュレーション領域です。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldBounds {
    /// 幅
    pub width: f64,
    /// 高さ
    pub height: f64,
}

impl WorldBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
