//! 設定モジュール
//!
//! サンドボックスの定数をまとめた設定と、そのJSON読み込みを提供します。

use serde::{Deserialize, Serialize};

use crate::error::{Result, SandboxError};
use crate::input::key_codes;
use crate::utils::Vec2;

/// サンドボックス設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// 初速の各成分の最大絶対値
    pub speed: f64,

    /// パーティクルの基準サイズ（質量は`size`〜`2 * size`、直径 = 質量）
    pub particle_size: f64,

    /// エネルギー損失キー押下中の損失係数、および重力時の鉛直減衰係数
    pub inelasticity: f64,

    /// 重力による1ティックあたりの鉛直速度の減少量
    pub gravity_step: f64,

    /// ポインタ位置の確定を遅らせる時間（秒）
    pub debounce_interval: f64,

    /// ビューポート下部に予約するUIバーの高さ
    pub chrome_height: f64,

    /// 起動時のパーティクル数
    pub initial_particles: usize,

    /// ホストから報告されるまでのビューポートサイズ (幅, 高さ)
    pub default_viewport: (f64, f64),

    /// 法線マーカーの長さ
    pub normal_marker_length: f64,

    /// 乱数シード（`None`ならエントロピーから初期化）
    pub seed: Option<u64>,

    /// キー割り当て
    pub keys: KeyBindings,

    /// 障害物の一覧
    pub obstacles: Vec<ObstacleConfig>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            particle_size: 20.0,
            inelasticity: 0.95,
            gravity_step: 0.2,
            debounce_interval: 0.1,
            chrome_height: 50.0,
            initial_particles: 100,
            default_viewport: (800.0, 600.0),
            normal_marker_length: 20.0,
            seed: None,
            keys: KeyBindings::default(),
            obstacles: default_obstacles(),
        }
    }
}

impl SandboxConfig {
    /// JSON文字列から設定を読み込む
    ///
    /// 省略されたフィールドはデフォルト値になります。
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SandboxConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 数値の範囲を検証
    pub fn validate(&self) -> Result<()> {
        if !(self.particle_size > 0.0) {
            return Err(invalid("particle_size must be positive"));
        }
        if !(self.speed >= 0.0) {
            return Err(invalid("speed must not be negative"));
        }
        if !(self.inelasticity > 0.0 && self.inelasticity <= 1.0) {
            return Err(invalid("inelasticity must be in (0, 1]"));
        }
        if !self.gravity_step.is_finite() {
            return Err(invalid("gravity_step must be finite"));
        }
        if !(self.debounce_interval >= 0.0) {
            return Err(invalid("debounce_interval must not be negative"));
        }
        if !(self.chrome_height >= 0.0) {
            return Err(invalid("chrome_height must not be negative"));
        }
        let (width, height) = self.default_viewport;
        if !(width >= 0.0 && height >= 0.0) {
            return Err(invalid("default_viewport must not be negative"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> SandboxError {
    SandboxError::InvalidConfig(message.to_string())
}

/// キー割り当て
///
/// いずれも押している間だけ有効になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// 全パーティクルをポインタに追従させる
    pub grab_all: u32,
    /// 重力を有効にする
    pub gravity: u32,
    /// 衝突時のエネルギー損失を有効にする
    pub energy_loss: u32,
    /// 障害物の法線を表示する
    pub show_normals: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            grab_all: key_codes::KEY_LCTRL,
            gravity: key_codes::KEY_LSHIFT,
            energy_loss: key_codes::KEY_LALT,
            show_normals: key_codes::KEY_N,
        }
    }
}

/// 障害物の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// 頂点（ワールド座標）
    pub vertices: Vec<Vec2>,
    /// 描画色（省略時はランダム）
    #[serde(default)]
    pub color: Option<[f32; 3]>,
}

impl ObstacleConfig {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self {
            vertices,
            color: None,
        }
    }
}

/// 既定の障害物（三角形3つと五角形1つ）
fn default_obstacles() -> Vec<ObstacleConfig> {
    let shapes: [&[(f64, f64)]; 4] = [
        &[(200.0, 200.0), (250.0, 200.0), (200.0, 250.0)],
        &[(400.0, 400.0), (480.0, 420.0), (380.0, 450.0)],
        &[(560.0, 50.0), (680.0, 120.0), (550.0, 250.0)],
        &[
            (100.0, 100.0),
            (150.0, 50.0),
            (200.0, 100.0),
            (200.0, 130.0),
            (100.0, 130.0),
        ],
    ];

    shapes
        .iter()
        .map(|shape| ObstacleConfig::new(shape.iter().map(|&p| Vec2::from(p)).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SandboxConfig::default();
        assert_eq!(config.speed, 3.0);
        assert_eq!(config.particle_size, 20.0);
        assert_eq!(config.inelasticity, 0.95);
        assert_eq!(config.debounce_interval, 0.1);
        assert_eq!(config.chrome_height, 50.0);
        assert_eq!(config.initial_particles, 100);
        assert_eq!(config.keys.grab_all, 305);
        assert_eq!(config.keys.gravity, 304);
        assert_eq!(config.keys.energy_loss, 308);
        assert_eq!(config.keys.show_normals, 110);
        assert_eq!(config.obstacles.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SandboxConfig::from_json(
            r#"{
                "initial_particles": 5,
                "seed": 9,
                "keys": { "gravity": 71 },
                "obstacles": [
                    { "vertices": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 0, "y": 10}] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.initial_particles, 5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.keys.gravity, 71);
        assert_eq!(config.keys.grab_all, 305);
        assert_eq!(config.speed, 3.0);
        assert_eq!(config.obstacles.len(), 1);
        assert_eq!(config.obstacles[0].color, None);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let result = SandboxConfig::from_json(r#"{ "inelasticity": 1.5 }"#);
        assert!(matches!(result, Err(SandboxError::InvalidConfig(_))));

        let result = SandboxConfig::from_json(r#"{ "particle_size": 0 }"#);
        assert!(matches!(result, Err(SandboxError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let result = SandboxConfig::from_json("{ not json");
        assert!(matches!(result, Err(SandboxError::InvalidConfig(_))));
    }
}
