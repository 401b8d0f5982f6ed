//! 衝突検出モジュール
//!
//! このモジュールは、パーティクル同士、パーティクルと凸多角形、パーティクルと壁の
//! 衝突検出と応答を提供します。応答はすべてエネルギー損失係数`e`を受け取り、
//! `e = 1`なら速度の大きさを保存します。

use crate::physics::{Obstacle, Particle, WorldBounds};
use crate::utils::Vec2;

/// 単一辺ヒット時に加える押し出し量
const SINGLE_HIT_NUDGE: f64 = 1.0;

/// 複数辺ヒット（角）時の固定押し出し量
const CORNER_CORRECTION: f64 = 1.0;

/// 障害物との衝突情報
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleHit {
    /// 選ばれた辺のインデックス
    pub edge: usize,
    /// 選ばれた辺の外向き法線
    pub normal: Vec2,
    /// 法線方向への押し出し量
    pub correction: f64,
}

/// 2つのパーティクルが重なっているか
///
/// 中心間距離が半径の和以下なら重なりとみなします。
pub fn particles_overlap(a: &Particle, b: &Particle) -> bool {
    let reach = a.radius() + b.radius();
    (a.position - b.position).length_squared() <= reach * reach
}

/// パーティクル同士の衝突を解決
///
/// 重なっていれば、質量比でスケールした速度を交換し、
/// 中心を結ぶ直線に沿って貫通深度の半分ずつ押し離します。
///
/// # 引数
///
/// * `a` - 1つ目のパーティクル
/// * `b` - 2つ目のパーティクル
/// * `energy_loss` - エネルギー損失係数 (0, 1]
///
/// # 戻り値
///
/// * 衝突を解決した場合は`true`
pub fn resolve_particle_pair(a: &mut Particle, b: &mut Particle, energy_loss: f64) -> bool {
    if !particles_overlap(a, b) {
        return false;
    }

    let va = a.velocity;
    let vb = b.velocity;
    a.velocity = vb * (b.mass() / a.mass() * energy_loss);
    b.velocity = va * (a.mass() / b.mass() * energy_loss);

    let delta = a.position - b.position;
    let half_penetration = (a.radius() + b.radius() - delta.length()) / 2.0;
    let sign_x = if delta.x >= 0.0 { 1.0 } else { -1.0 };
    let sign_y = if delta.y >= 0.0 { 1.0 } else { -1.0 };

    let shift = if delta.x != 0.0 {
        let angle = (delta.y.abs() / delta.x.abs()).atan();
        Vec2::new(
            angle.cos() * half_penetration * sign_x,
            angle.sin() * half_penetration * sign_y,
        )
    } else {
        // x座標が同じなら縦方向のみ
        Vec2::new(0.0, half_penetration * sign_y)
    };

    a.position += shift;
    b.position -= shift;
    true
}

/// パーティクルと障害物の衝突を検出
///
/// 各辺について、辺の中点を通る法線方向の距離`d`と辺方向の距離`l`を求め、
/// `d ≤ r`かつ`l ≤ 辺の半分 + r`ならその辺にヒットしたとみなします。
///
/// # 戻り値
///
/// * ヒットなしなら`None`
/// * 1辺のみなら、その辺と押し出し量`r − d + 1`
/// * 複数辺なら、最初に見つかった隣接する2辺のうち速度との内積が小さい方の法線を持つ辺と押し出し量1
/// * 複数辺でも隣接する組がなければ`None`
pub fn detect_obstacle_hit(particle: &Particle, obstacle: &Obstacle) -> Option<ObstacleHit> {
    let radius = particle.radius();
    let center = particle.position;
    let edges = obstacle.edges();
    let n = edges.len();

    let mut hits: Vec<(usize, f64)> = Vec::with_capacity(n);
    for (index, edge) in edges.iter().enumerate() {
        let offset = center - edge.midpoint;
        let d = offset.dot(edge.normal).abs();
        let l = offset.dot(edge.tangent).abs();
        if d <= radius && l <= edge.half_length + radius {
            hits.push((index, d));
        }
    }

    let approach = |index: usize| edges[index].normal.dot(particle.velocity);

    match hits.as_slice() {
        [] => None,
        [(index, d)] => Some(ObstacleHit {
            edge: *index,
            normal: edges[*index].normal,
            correction: radius - d + SINGLE_HIT_NUDGE,
        }),
        _ => {
            let is_hit = |index: usize| hits.iter().any(|(hit, _)| *hit == index);

            // 隣接する2辺のうち最初の組
            let edge = (0..n)
                .map(|i| (i, (i + 1) % n))
                .find(|&(i, j)| is_hit(i) && is_hit(j))
                .map(|(i, j)| if approach(i) < approach(j) { i } else { j })?;

            Some(ObstacleHit {
                edge,
                normal: edges[edge].normal,
                correction: CORNER_CORRECTION,
            })
        }
    }
}

/// パーティクルと障害物の衝突を解決
///
/// 選ばれた法線で速度を反射し（`v' = (v − 2(n·v)n)·e`）、
/// 法線方向へ押し出し量だけ移動させます。
///
/// # 戻り値
///
/// * 衝突を解決した場合は`true`
pub fn resolve_particle_obstacle(
    particle: &mut Particle,
    obstacle: &Obstacle,
    energy_loss: f64,
) -> bool {
    let Some(hit) = detect_obstacle_hit(particle, obstacle) else {
        return false;
    };

    let normal = hit.normal;
    let n_dot_v = normal.dot(particle.velocity);
    particle.velocity = (particle.velocity - normal * (2.0 * n_dot_v)) * energy_loss;
    particle.position += normal * hit.correction;
    true
}

/// 壁との衝突を解決
///
/// 円がワールド境界からはみ出した軸の速度を反転（`e`倍）し、
/// 円の端がちょうど境界に接する位置へ戻します。
///
/// # 戻り値
///
/// * いずれかの軸で反射した場合は`true`
pub fn reflect_off_walls(particle: &mut Particle, bounds: WorldBounds, energy_loss: f64) -> bool {
    let radius = particle.radius();
    let mut reflected = false;

    if particle.position.x + radius > bounds.width {
        particle.velocity.x *= -energy_loss;
        particle.position.x = bounds.width - radius;
        reflected = true;
    } else if particle.position.x - radius < 0.0 {
        particle.velocity.x *= -energy_loss;
        particle.position.x = radius;
        reflected = true;
    }

    if particle.position.y + radius > bounds.height {
        particle.velocity.y *= -energy_loss;
        particle.position.y = bounds.height - radius;
        reflected = true;
    } else if particle.position.y - radius < 0.0 {
        particle.velocity.y *= -energy_loss;
        particle.position.y = radius;
        reflected = true;
    }

    reflected
}
