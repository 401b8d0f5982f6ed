//! パーティクルモジュール
//!
//! 円形の可動物体と、それを乱数で生成するファクトリを提供します。

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::physics::WorldBounds;
use crate::utils::{distance, IdGenerator, Vec2};

/// パーティクルID
pub type ParticleId = u32;

/// 円形パーティクル
///
/// `position`は円の中心です。質量と半径は生成時に決まり、以後変化しません。
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// ID（生存中は一意）
    id: ParticleId,
    /// 中心位置
    pub position: Vec2,
    /// 速度（1ティックあたりの移動量）
    pub velocity: Vec2,
    /// 質量（常に正）
    mass: f64,
    /// 半径
    radius: f64,
    /// ポインタが重なっているか（毎フレーム再計算）
    pub hover: bool,
    /// 描画色 (RGB, 0.0〜1.0)
    pub color: [f32; 3],
}

impl Particle {
    /// 新しいパーティクルを作成
    ///
    /// 直径は質量と等しく、半径は`mass / 2`になります。
    /// 正でない質量は1.0に置き換えます。
    pub fn new(id: ParticleId, position: Vec2, velocity: Vec2, mass: f64) -> Self {
        let mass = if mass > 0.0 && mass.is_finite() {
            mass
        } else {
            log::warn!("particle {} created with invalid mass {}, using 1.0", id, mass);
            1.0
        };

        Self {
            id,
            position,
            velocity,
            mass,
            radius: mass / 2.0,
            hover: false,
            color: [1.0, 1.0, 1.0],
        }
    }

    /// 描画色を設定
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// 点が円の内側にあるか
    pub fn contains_point(&self, point: Vec2) -> bool {
        distance(self.position, point) < self.radius
    }
}

/// パーティクル生成器
///
/// 連番IDを割り当て、速度・質量・色を乱数で決定します。
#[derive(Debug)]
pub struct ParticleFactory {
    /// ID生成器
    ids: IdGenerator,
    /// 乱数生成器
    rng: SmallRng,
    /// 初速の各成分の最大絶対値
    speed: f64,
    /// 基準サイズ
    size: f64,
}

impl ParticleFactory {
    /// 新しい生成器を作成
    ///
    /// # 引数
    ///
    /// * `speed` - 初速の各成分の最大絶対値
    /// * `size` - 基準サイズ（質量は`size`〜`2 * size`）
    /// * `seed` - 乱数シード（`None`ならエントロピーから初期化）
    pub fn new(speed: f64, size: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            ids: IdGenerator::new(),
            rng,
            speed,
            size,
        }
    }

    /// 境界内のランダムな位置にパーティクルを1つ生成
    pub fn spawn(&mut self, bounds: WorldBounds) -> Particle {
        let position = Vec2::new(
            self.rng.gen::<f64>() * bounds.width,
            self.rng.gen::<f64>() * bounds.height,
        );
        let velocity = Vec2::new(
            (2.0 * self.rng.gen::<f64>() - 1.0) * self.speed,
            (2.0 * self.rng.gen::<f64>() - 1.0) * self.speed,
        );
        let mass = self.size * (self.rng.gen::<f64>() + 1.0);

        self.build(position, velocity, mass, bounds)
    }

    /// 指定した状態のパーティクルに次のIDを割り当てて作成
    ///
    /// 色は位置から決まります。
    pub fn build(&mut self, position: Vec2, velocity: Vec2, mass: f64, bounds: WorldBounds) -> Particle {
        Particle::new(self.ids.next_id(), position, velocity, mass)
            .with_color(position_color(position, bounds))
    }

    /// ランダムな`(r, g, 1)`色
    pub fn random_tint(&mut self) -> [f32; 3] {
        [self.rng.gen::<f32>(), self.rng.gen::<f32>(), 1.0]
    }
}

/// 生成位置から色を決める（x/幅, y/幅, 1）
fn position_color(position: Vec2, bounds: WorldBounds) -> [f32; 3] {
    if bounds.width <= 0.0 {
        return [0.0, 0.0, 1.0];
    }
    [
        (position.x / bounds.width).clamp(0.0, 1.0) as f32,
        (position.y / bounds.width).clamp(0.0, 1.0) as f32,
        1.0,
    ]
}
