//! サンドボックスモジュール
//!
//! ワールドと入力コントローラをまとめ、ホストに対する操作面を提供します。
//! `tick`で入力スナップショットを取り出してワールドを更新し、結果を書き戻します。

use std::sync::{Arc, Mutex};

use crate::config::SandboxConfig;
use crate::error::{Result, SandboxError};
use crate::input::{InteractionController, KeyCode};
use crate::physics::{Obstacle, ParticleId};
use crate::utils::Vec2;
use crate::world::{SceneSnapshot, World};

/// パーティクルサンドボックス
#[derive(Debug)]
pub struct Sandbox {
    world: World,
    controller: InteractionController,
}

impl Sandbox {
    /// 設定からサンドボックスを作成
    ///
    /// `initial_particles`個のパーティクルを生成します。
    pub fn new(config: SandboxConfig) -> Result<Self> {
        config.validate()?;

        let mut world = World::new(&config);
        world.add_particles(config.initial_particles);
        let controller = InteractionController::new(&config);

        log::info!(
            "sandbox created with {} particles and {} obstacles",
            world.particle_count(),
            world.obstacles().len()
        );

        Ok(Self { world, controller })
    }

    /// 1フレーム進める
    ///
    /// # 引数
    ///
    /// * `delta_time` - 前回のフレームからの経過時間（秒）。
    ///   コントローラのフレーム時刻を進め、ポインタの確定とフレームレート表示にだけ使います
    pub fn tick(&mut self, delta_time: f64) {
        let input = self.controller.begin_frame(delta_time);
        let outcome = self.world.step(&input);
        self.controller.end_frame(outcome);
    }

    /// 描画用スナップショット
    pub fn snapshot(&self) -> SceneSnapshot {
        self.world.snapshot(
            self.controller.selected(),
            self.controller.show_normals(),
            self.controller.clock(),
        )
    }

    pub fn add_particles(&mut self, count: usize) {
        self.world.add_particles(count);
    }

    /// パーティクルを削除（0なら全て）
    ///
    /// 選択中のパーティクルが削除されたら選択を解除します。
    pub fn remove_particles(&mut self, count: usize) -> usize {
        let removed = self.world.remove_particles(count);
        let world = &self.world;
        self.controller.retain_selection(|id| world.contains(id));
        removed
    }

    /// 指定した状態のパーティクルを追加
    pub fn insert_particle(&mut self, position: Vec2, velocity: Vec2, mass: f64) -> ParticleId {
        self.world.insert_particle(position, velocity, mass)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.world.add_obstacle(obstacle);
    }

    /// ポインタ移動（ウィンドウ座標）
    pub fn on_pointer_move(&mut self, position: Vec2) {
        self.controller.on_pointer_move(position);
    }

    pub fn on_pointer_down(&mut self) {
        self.controller.on_pointer_down();
    }

    /// ポインタ解放
    ///
    /// 選択中だったパーティクルに最後のポインタ移動量を速度として設定します。
    pub fn on_pointer_up(&mut self) {
        if let Some((id, throw)) = self.controller.on_pointer_up() {
            if let Some(particle) = self.world.particle_mut(id) {
                particle.velocity = throw;
            }
        }
    }

    pub fn on_key_down(&mut self, key_code: KeyCode) {
        self.controller.on_key_down(key_code);
    }

    pub fn on_key_up(&mut self, key_code: KeyCode) {
        self.controller.on_key_up(key_code);
    }

    /// ホストの描画領域サイズを設定
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.world.set_viewport(width, height);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }
}

/// スレッド間で共有できるサンドボックス
///
/// すべての操作は内部のロックで直列化され、`tick`の途中の状態は外から見えません。
#[derive(Debug, Clone)]
pub struct SharedSandbox {
    inner: Arc<Mutex<Sandbox>>,
}

impl SharedSandbox {
    pub fn new(config: SandboxConfig) -> Result<Self> {
        Ok(Self::from_sandbox(Sandbox::new(config)?))
    }

    pub fn from_sandbox(sandbox: Sandbox) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sandbox)),
        }
    }

    /// ロックを取得して操作を実行
    pub fn with<R>(&self, operation: impl FnOnce(&mut Sandbox) -> R) -> Result<R> {
        let mut sandbox = self.inner.lock().map_err(|_| SandboxError::LockPoisoned)?;
        Ok(operation(&mut sandbox))
    }

    pub fn tick(&self, delta_time: f64) -> Result<()> {
        self.with(|sandbox| sandbox.tick(delta_time))
    }

    pub fn snapshot(&self) -> Result<SceneSnapshot> {
        self.with(|sandbox| sandbox.snapshot())
    }

    pub fn add_particles(&self, count: usize) -> Result<()> {
        self.with(|sandbox| sandbox.add_particles(count))
    }

    pub fn remove_particles(&self, count: usize) -> Result<usize> {
        self.with(|sandbox| sandbox.remove_particles(count))
    }

    pub fn on_pointer_move(&self, position: Vec2) -> Result<()> {
        self.with(|sandbox| sandbox.on_pointer_move(position))
    }

    pub fn on_pointer_down(&self) -> Result<()> {
        self.with(|sandbox| sandbox.on_pointer_down())
    }

    pub fn on_pointer_up(&self) -> Result<()> {
        self.with(|sandbox| sandbox.on_pointer_up())
    }

    pub fn on_key_down(&self, key_code: KeyCode) -> Result<()> {
        self.with(|sandbox| sandbox.on_key_down(key_code))
    }

    pub fn on_key_up(&self, key_code: KeyCode) -> Result<()> {
        self.with(|sandbox| sandbox.on_key_up(key_code))
    }

    pub fn set_viewport(&self, width: f64, height: f64) -> Result<()> {
        self.with(|sandbox| sandbox.set_viewport(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> SandboxConfig {
        SandboxConfig {
            initial_particles: 0,
            obstacles: Vec::new(),
            chrome_height: 0.0,
            default_viewport: (1000.0, 1000.0),
            debounce_interval: 0.25,
            seed: Some(11),
            ..SandboxConfig::default()
        }
    }

    #[test]
    fn test_new_spawns_initial_particles() {
        let sandbox = Sandbox::new(SandboxConfig {
            seed: Some(5),
            ..SandboxConfig::default()
        })
        .unwrap();
        assert_eq!(sandbox.world().particle_count(), 100);
        assert_eq!(sandbox.snapshot().stats.particle_count, 100);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Sandbox::new(SandboxConfig {
            inelasticity: 0.0,
            ..SandboxConfig::default()
        });
        assert!(matches!(result, Err(SandboxError::InvalidConfig(_))));
    }

    #[test]
    fn test_removing_selected_particle_clears_selection() {
        let mut sandbox = Sandbox::new(quiet_config()).unwrap();
        sandbox.insert_particle(Vec2::new(500.0, 500.0), Vec2::ZERO, 20.0);

        sandbox.on_pointer_move(Vec2::new(500.0, 500.0));
        sandbox.tick(0.25);
        sandbox.on_pointer_down();
        sandbox.tick(0.25);
        assert_eq!(sandbox.controller().selected(), Some(0));

        assert_eq!(sandbox.remove_particles(0), 1);
        assert_eq!(sandbox.controller().selected(), None);
    }

    #[test]
    fn test_click_on_empty_space_stays_pending() {
        let mut sandbox = Sandbox::new(quiet_config()).unwrap();
        let id = sandbox.insert_particle(Vec2::new(500.0, 500.0), Vec2::ZERO, 20.0);

        sandbox.on_pointer_move(Vec2::new(100.0, 100.0));
        sandbox.tick(0.25);
        sandbox.on_pointer_down();
        sandbox.tick(0.25);
        assert_eq!(sandbox.controller().selected(), None);

        // 押したまま移動すると掴める
        sandbox.on_pointer_move(Vec2::new(500.0, 500.0));
        sandbox.tick(0.25);
        assert_eq!(sandbox.controller().selected(), Some(id));
    }

    #[test]
    fn test_snapshot_stats_follow_controller_clock() {
        let mut sandbox = Sandbox::new(quiet_config()).unwrap();
        sandbox.tick(0.5);
        sandbox.tick(0.25);

        let stats = sandbox.snapshot().stats;
        assert_eq!(stats.frame, sandbox.controller().clock().frame_count());
        assert_eq!(stats.frame, 2);
        assert_eq!(stats.fps, Some(4));
    }

    #[test]
    fn test_shared_sandbox_serializes_access() {
        let shared = SharedSandbox::new(quiet_config()).unwrap();
        shared.add_particles(3).unwrap();
        shared.tick(0.1).unwrap();

        let snapshot = shared.snapshot().unwrap();
        assert_eq!(snapshot.particles.len(), 3);
        assert_eq!(shared.remove_particles(10).unwrap(), 3);
    }
}
