//! ワールドモジュール
//!
//! パーティクルと障害物のコレクションを所有し、1フレーム分の更新を固定順序で行います。
//!
//! 各パーティクルについて、インデックスの大きいパーティクルとの衝突、障害物との衝突、
//! ポインタ操作、移動、壁との衝突、重力の順に処理します。

use crate::config::SandboxConfig;
use crate::input::{apply_pointer, FrameInput, FrameOutcome};
use crate::physics::{
    apply_gravity, integrate, reflect_off_walls, resolve_particle_obstacle,
    resolve_particle_pair, Obstacle, Particle, ParticleFactory, ParticleId, WorldBounds,
};
use crate::utils::{FrameClock, Vec2};

pub mod snapshot;

pub use snapshot::{FrameStats, NormalMarker, ObstacleView, ParticleView, SceneSnapshot};

/// シミュレーションワールド
#[derive(Debug)]
pub struct World {
    /// パーティクル（生成順）
    particles: Vec<Particle>,
    /// 障害物
    obstacles: Vec<Obstacle>,
    /// パーティクル生成器
    factory: ParticleFactory,
    /// ホストから報告されたビューポート (幅, 高さ)
    viewport: (f64, f64),
    /// UIバーの高さ
    chrome_height: f64,
    /// 重力による鉛直速度の減少量
    gravity_step: f64,
    /// 重力時の鉛直減衰係数
    inelasticity: f64,
    /// 法線マーカーの長さ
    normal_marker_length: f64,
}

impl World {
    /// 設定からワールドを作成
    ///
    /// 不正な障害物は警告を出して読み飛ばします。パーティクルは含みません。
    pub fn new(config: &SandboxConfig) -> Self {
        let mut world = Self {
            particles: Vec::new(),
            obstacles: Vec::new(),
            factory: ParticleFactory::new(config.speed, config.particle_size, config.seed),
            viewport: config.default_viewport,
            chrome_height: config.chrome_height,
            gravity_step: config.gravity_step,
            inelasticity: config.inelasticity,
            normal_marker_length: config.normal_marker_length,
        };

        for (index, obstacle_config) in config.obstacles.iter().enumerate() {
            match Obstacle::new(obstacle_config.vertices.clone()) {
                Ok(obstacle) => {
                    let color = obstacle_config
                        .color
                        .unwrap_or_else(|| world.factory.random_tint());
                    world.obstacles.push(obstacle.with_color(color));
                }
                Err(error) => log::warn!("obstacle {} skipped: {}", index, error),
            }
        }

        world
    }

    /// 1フレーム分更新
    ///
    /// # 引数
    ///
    /// * `input` - このフレームの入力スナップショット
    ///
    /// # 戻り値
    ///
    /// * 更新後の選択状態
    pub fn step(&mut self, input: &FrameInput) -> FrameOutcome {
        let bounds = self.bounds();
        let energy_loss = input.energy_loss;
        let mut outcome = FrameOutcome::from_input(input);

        for i in 0..self.particles.len() {
            let (head, tail) = self.particles.split_at_mut(i + 1);
            let particle = &mut head[i];

            for other in tail.iter_mut() {
                resolve_particle_pair(particle, other, energy_loss);
            }

            for obstacle in &self.obstacles {
                resolve_particle_obstacle(particle, obstacle, energy_loss);
            }

            apply_pointer(particle, input, &mut outcome);

            integrate(particle);
            reflect_off_walls(particle, bounds, energy_loss);

            if input.gravity_on {
                apply_gravity(particle, self.gravity_step, self.inelasticity);
            }
        }

        outcome
    }

    /// ランダムなパーティクルを`count`個追加
    pub fn add_particles(&mut self, count: usize) {
        let bounds = self.bounds();
        for _ in 0..count {
            self.particles.push(self.factory.spawn(bounds));
        }
        log::debug!("added {} particles, {} alive", count, self.particles.len());
    }

    /// 指定した状態のパーティクルを1つ追加
    ///
    /// # 戻り値
    ///
    /// * 割り当てたID
    pub fn insert_particle(&mut self, position: Vec2, velocity: Vec2, mass: f64) -> ParticleId {
        let particle = self.factory.build(position, velocity, mass, self.bounds());
        let id = particle.id();
        self.particles.push(particle);
        id
    }

    /// 最後に追加したパーティクルから`count`個削除
    ///
    /// `count`が0または生存数以上なら全て削除します。
    ///
    /// # 戻り値
    ///
    /// * 削除した数
    pub fn remove_particles(&mut self, count: usize) -> usize {
        let alive = self.particles.len();
        let removed = if count == 0 || count >= alive {
            if count > alive {
                log::debug!("remove {} clamped to {}", count, alive);
            }
            alive
        } else {
            count
        };

        self.particles.truncate(alive - removed);
        log::debug!("removed {} particles, {} alive", removed, self.particles.len());
        removed
    }

    /// ビューポートサイズを設定
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if self.viewport != (width, height) {
            log::debug!("viewport changed to {}x{}", width, height);
        }
        self.viewport = (width.max(0.0), height.max(0.0));
    }

    /// ホストから報告されたビューポート (幅, 高さ)
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// 壁の境界（ビューポートからUIバーを除いた領域）
    pub fn bounds(&self) -> WorldBounds {
        let (width, height) = self.viewport;
        WorldBounds::new(width, (height - self.chrome_height).max(0.0))
    }

    /// 描画用スナップショットを作成
    ///
    /// # 引数
    ///
    /// * `selected` - 選択中のパーティクル
    /// * `show_normals` - 障害物の法線マーカーを含めるか
    /// * `clock` - フレーム数とFPSの元になるフレーム時刻
    pub fn snapshot(
        &self,
        selected: Option<ParticleId>,
        show_normals: bool,
        clock: &FrameClock,
    ) -> SceneSnapshot {
        let marker_length = show_normals.then_some(self.normal_marker_length);

        SceneSnapshot {
            bounds: self.bounds(),
            particles: self
                .particles
                .iter()
                .map(|particle| ParticleView::new(particle, selected))
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|obstacle| ObstacleView::new(obstacle, marker_length))
                .collect(),
            stats: FrameStats {
                frame: clock.frame_count(),
                fps: clock.fps(),
                particle_count: self.particles.len(),
            },
        }
    }

    /// 障害物を追加
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|particle| particle.id() == id)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|particle| particle.id() == id)
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.particle(id).is_some()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_config() -> SandboxConfig {
        SandboxConfig {
            chrome_height: 0.0,
            default_viewport: (1000.0, 1000.0),
            obstacles: Vec::new(),
            seed: Some(1),
            ..SandboxConfig::default()
        }
    }

    fn idle_input() -> FrameInput {
        FrameInput {
            mouse: Vec2::new(-100.0, -100.0),
            prev_mouse: Vec2::new(-100.0, -100.0),
            click_pending: false,
            selected: None,
            grab_all: false,
            gravity_on: false,
            energy_loss: 1.0,
        }
    }

    #[test]
    fn test_default_obstacles_are_built() {
        let world = World::new(&SandboxConfig::default());
        assert_eq!(world.obstacles().len(), 4);
        for obstacle in world.obstacles() {
            assert_eq!(obstacle.color[2], 1.0);
        }
    }

    #[test]
    fn test_invalid_obstacle_is_skipped() {
        let mut config = empty_config();
        config.obstacles = vec![crate::config::ObstacleConfig::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
        ])];
        let world = World::new(&config);
        assert!(world.obstacles().is_empty());
    }

    #[test]
    fn test_bounds_subtract_chrome_height() {
        let mut config = empty_config();
        config.chrome_height = 50.0;
        let mut world = World::new(&config);

        world.set_viewport(800.0, 600.0);
        assert_eq!(world.bounds(), WorldBounds::new(800.0, 550.0));

        world.set_viewport(800.0, 30.0);
        assert_eq!(world.bounds().height, 0.0);
    }

    #[test]
    fn test_step_swaps_overlapping_pair() {
        let mut world = World::new(&empty_config());
        let a = world.insert_particle(Vec2::new(100.0, 100.0), Vec2::new(1.0, 0.0), 20.0);
        let b = world.insert_particle(Vec2::new(105.0, 100.0), Vec2::new(-1.0, 0.0), 20.0);

        world.step(&idle_input());

        let a = world.particle(a).unwrap();
        let b = world.particle(b).unwrap();
        assert_eq!(a.velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(b.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(a.position.y, 100.0);
        assert_eq!(b.position.y, 100.0);
        assert!(b.position.x - a.position.x >= 20.0);
    }

    #[test]
    fn test_step_applies_gravity_after_walls() {
        let mut world = World::new(&empty_config());
        let id = world.insert_particle(Vec2::new(500.0, 500.0), Vec2::ZERO, 20.0);

        let mut input = idle_input();
        input.gravity_on = true;
        world.step(&input);

        let particle = world.particle(id).unwrap();
        assert_eq!(particle.position, Vec2::new(500.0, 500.0));
        assert_eq!(particle.velocity.y, -0.2 * 0.95);
    }

    #[test]
    fn test_step_selects_hovered_particle_on_click() {
        let mut world = World::new(&empty_config());
        let id = world.insert_particle(Vec2::new(300.0, 300.0), Vec2::ZERO, 20.0);

        let mut input = idle_input();
        input.mouse = Vec2::new(302.0, 301.0);
        input.prev_mouse = Vec2::new(300.0, 300.0);
        input.click_pending = true;
        let outcome = world.step(&input);

        assert_eq!(outcome.selected, Some(id));
        assert!(outcome.click_consumed);
        let particle = world.particle(id).unwrap();
        assert!(particle.hover);
        assert_eq!(particle.velocity, Vec2::new(2.0, 1.0));
        assert_eq!(particle.position, Vec2::new(302.0, 301.0));
    }

    #[test]
    fn test_remove_particles_clamps_and_never_reuses_ids() {
        let mut world = World::new(&empty_config());
        world.add_particles(5);
        assert_eq!(world.particle_count(), 5);

        assert_eq!(world.remove_particles(2), 2);
        assert_eq!(world.particle_count(), 3);

        world.add_particles(1);
        let ids: Vec<ParticleId> = world.particles().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 5]);

        assert_eq!(world.remove_particles(100), 4);
        assert_eq!(world.particle_count(), 0);

        world.add_particles(3);
        assert_eq!(world.remove_particles(0), 3);
        assert_eq!(world.particle_count(), 0);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut world = World::new(&SandboxConfig {
            seed: Some(3),
            ..SandboxConfig::default()
        });
        world.add_particles(10);
        world.step(&idle_input());

        let clock = FrameClock::new();
        assert_eq!(
            world.snapshot(Some(2), true, &clock),
            world.snapshot(Some(2), true, &clock)
        );
    }

    #[test]
    fn test_snapshot_contents() {
        let mut config = empty_config();
        config.obstacles = vec![crate::config::ObstacleConfig {
            vertices: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 10.0),
            ],
            color: Some([0.5, 0.5, 1.0]),
        }];
        let mut world = World::new(&config);
        let id = world.insert_particle(Vec2::new(400.0, 400.0), Vec2::ZERO, 30.0);
        world.step(&idle_input());
        let mut clock = FrameClock::new();
        clock.advance(0.1);

        let snapshot = world.snapshot(Some(id), false, &clock);
        assert_eq!(snapshot.particles.len(), 1);
        assert_eq!(snapshot.particles[0].size, 30.0);
        assert!(snapshot.particles[0].selected);
        assert_eq!(snapshot.obstacles[0].color, [0.5, 0.5, 1.0]);
        assert!(snapshot.obstacles[0].normals.is_empty());
        assert_eq!(snapshot.stats.frame, 1);
        assert_eq!(snapshot.stats.fps, Some(10));
        assert_eq!(snapshot.stats.particle_count, 1);

        let snapshot = world.snapshot(None, true, &clock);
        let markers = &snapshot.obstacles[0].normals;
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].from, Vec2::new(5.0, 0.0));
        assert_eq!(markers[0].to, Vec2::new(5.0, -20.0));
    }
}
