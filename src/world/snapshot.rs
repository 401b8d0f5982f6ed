//! 描画用スナップショット
//!
//! レンダラに渡す読み取り専用のシーンデータです。JSONにシリアライズしてJS側へ渡せます。

use serde::Serialize;

use crate::physics::{Obstacle, Particle, ParticleId, WorldBounds};
use crate::utils::Vec2;

/// シーン全体のスナップショット
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    /// ワールド境界
    pub bounds: WorldBounds,
    /// パーティクル
    pub particles: Vec<ParticleView>,
    /// 障害物
    pub obstacles: Vec<ObstacleView>,
    /// フレーム統計
    pub stats: FrameStats,
}

/// パーティクルの描画データ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub id: ParticleId,
    /// 中心位置
    pub position: Vec2,
    /// 直径
    pub size: f64,
    pub color: [f32; 3],
    /// ポインタが重なっているか
    pub hover: bool,
    /// 選択中か
    pub selected: bool,
}

impl ParticleView {
    pub fn new(particle: &Particle, selected: Option<ParticleId>) -> Self {
        Self {
            id: particle.id(),
            position: particle.position,
            size: particle.radius() * 2.0,
            color: particle.color,
            hover: particle.hover,
            selected: selected == Some(particle.id()),
        }
    }
}

/// 障害物の描画データ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    /// 頂点（反時計回り）
    pub vertices: Vec<Vec2>,
    pub color: [f32; 3],
    /// 法線マーカー（法線表示中のみ）
    pub normals: Vec<NormalMarker>,
}

impl ObstacleView {
    /// 障害物から描画データを作成
    ///
    /// # 引数
    ///
    /// * `obstacle` - 対象の障害物
    /// * `marker_length` - 法線マーカーの長さ。`None`ならマーカーを含めない
    pub fn new(obstacle: &Obstacle, marker_length: Option<f64>) -> Self {
        let normals = match marker_length {
            Some(length) => obstacle
                .edges()
                .iter()
                .map(|edge| NormalMarker {
                    from: edge.midpoint,
                    to: edge.midpoint + edge.normal * length,
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            vertices: obstacle.vertices().to_vec(),
            color: obstacle.color,
            normals,
        }
    }
}

/// 辺の中点から外向き法線方向へ伸びる線分
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalMarker {
    pub from: Vec2,
    pub to: Vec2,
}

/// フレーム統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// 処理したフレーム数
    pub frame: u64,
    /// 表示用フレームレート（`dt`が0なら`None`）
    pub fps: Option<u32>,
    /// 生存中のパーティクル数
    pub particle_count: usize,
}
