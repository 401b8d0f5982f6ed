//! 物理演算モジュール
//!
//! パーティクルの移動と重力による減衰を扱います。
//! 1ティックを1単位時間とみなし、フレーム時間`dt`では速度をスケールしません。

use crate::physics::Particle;

/// 速度で位置を1ステップ進める（オイラー法）
pub fn integrate(particle: &mut Particle) {
    particle.position += particle.velocity;
}

/// 重力を適用
///
/// 鉛直速度から`step`を引いた後、`damping`を掛けます。
///
/// # 引数
///
/// * `particle` - 対象のパーティクル
/// * `step` - 1ティックあたりの鉛直速度の減少量
/// * `damping` - 鉛直速度に掛ける減衰係数
pub fn apply_gravity(particle: &mut Particle, step: f64, damping: f64) {
    particle.velocity.y -= step;
    particle.velocity.y *= damping;
}
