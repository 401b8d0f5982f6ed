//! 入力処理システムの実装
//!
//! このモジュールは、ポインタとキーボードの入力からパーティクルの
//! ホバー・選択・ドラッグ・投げの操作を管理します。
//!
//! イベントハンドラは`InteractionController`の状態だけを変更し、
//! 物理更新にはフレーム開始時に取り出した不変の`FrameInput`を渡します。
//! ポインタ位置は間引かれ、期限タイマーをフレーム時刻と比較して確定します。
//! 移動が続いていても、確定はデバウンス間隔ごとに少なくとも1回行われます。

use std::collections::HashSet;

use crate::config::{KeyBindings, SandboxConfig};
use crate::physics::{Particle, ParticleId};
use crate::utils::{Deadline, FrameClock, Vec2};

pub mod key_codes;

pub use key_codes::*;

/// キーコード用の型エイリアス
pub type KeyCode = u32;

/// 1フレーム分の入力スナップショット
///
/// フレーム中は変更されません。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// 確定済みのポインタ位置（ワールド座標）
    pub mouse: Vec2,
    /// 1つ前に確定したポインタ位置
    pub prev_mouse: Vec2,
    /// 未消費のクリックがあるか
    pub click_pending: bool,
    /// 選択中のパーティクル
    pub selected: Option<ParticleId>,
    /// 全パーティクルをポインタに追従させるか
    pub grab_all: bool,
    /// 重力が有効か
    pub gravity_on: bool,
    /// エネルギー損失係数 (0, 1]
    pub energy_loss: f64,
}

impl FrameInput {
    /// ポインタの移動量（ドラッグ中の速度、離したときの投げ速度）
    pub fn throw_vector(&self) -> Vec2 {
        self.mouse - self.prev_mouse
    }
}

/// ブラウザのクライアント座標（y下向き）をウィンドウ座標（y上向き）に変換
///
/// # 引数
///
/// * `x`, `y` - 描画領域の左上を原点とするクライアント座標
/// * `viewport_height` - 描画領域の高さ
pub fn from_client_position(x: f64, y: f64, viewport_height: f64) -> Vec2 {
    Vec2::new(x, viewport_height - y)
}

/// フレーム処理の結果、コントローラに書き戻す選択状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// 選択中のパーティクル
    pub selected: Option<ParticleId>,
    /// クリックを消費したか
    pub click_consumed: bool,
}

impl FrameOutcome {
    /// 入力スナップショットの選択状態から開始
    pub fn from_input(input: &FrameInput) -> Self {
        Self {
            selected: input.selected,
            click_consumed: false,
        }
    }
}

/// パーティクル1つにポインタ操作を適用
///
/// ホバーを再計算し、未消費のクリックがあり何も選択されていなければ選択します。
/// 選択中または全体グラブ中なら、速度をポインタの移動量で上書きします。
pub fn apply_pointer(particle: &mut Particle, input: &FrameInput, outcome: &mut FrameOutcome) {
    particle.hover = particle.contains_point(input.mouse);

    if particle.hover
        && input.click_pending
        && !outcome.click_consumed
        && outcome.selected.is_none()
    {
        log::debug!("particle {} grabbed", particle.id());
        outcome.selected = Some(particle.id());
        outcome.click_consumed = true;
    }

    if input.grab_all || outcome.selected == Some(particle.id()) {
        particle.velocity = input.throw_vector();
    }
}

/// ポインタとキーの状態を管理するコントローラ
#[derive(Debug, Clone)]
pub struct InteractionController {
    /// フレーム時刻
    clock: FrameClock,
    /// 確定済みのポインタ位置
    mouse: Vec2,
    /// 1つ前に確定したポインタ位置
    prev_mouse: Vec2,
    /// 一度でも位置を確定したか
    has_sample: bool,
    /// 確定待ちのポインタ位置
    pending_sample: Option<Vec2>,
    /// 確定待ち位置の期限
    commit: Deadline,
    /// ポインタ静止時に移動量をゼロに戻す期限
    settle: Deadline,
    /// 未消費のクリック
    clicked: bool,
    /// 選択中のパーティクル
    selected: Option<ParticleId>,
    /// 押されているキー
    keys_pressed: HashSet<KeyCode>,
    /// キー割り当て
    bindings: KeyBindings,
    debounce_interval: f64,
    chrome_height: f64,
    inelasticity: f64,
}

impl InteractionController {
    /// 設定からコントローラを作成
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            clock: FrameClock::new(),
            mouse: Vec2::ZERO,
            prev_mouse: Vec2::ZERO,
            has_sample: false,
            pending_sample: None,
            commit: Deadline::new(),
            settle: Deadline::new(),
            clicked: false,
            selected: None,
            keys_pressed: HashSet::new(),
            bindings: config.keys,
            debounce_interval: config.debounce_interval,
            chrome_height: config.chrome_height,
            inelasticity: config.inelasticity,
        }
    }

    /// ポインタ移動
    ///
    /// ウィンドウ座標を受け取り、UIバーの高さ分ずらしてワールド座標にします。
    /// 確定待ちの位置は後の移動で上書きされますが、期限は延長しません。
    /// そのため連続した移動でも、最初の移動からデバウンス間隔後には確定します。
    pub fn on_pointer_move(&mut self, window_position: Vec2) {
        let world_position = window_position - Vec2::new(0.0, self.chrome_height);
        self.pending_sample = Some(world_position);
        if !self.commit.is_armed() {
            self.commit.schedule(self.clock.elapsed(), self.debounce_interval);
        }
    }

    /// ポインタ押下
    ///
    /// クリックはパーティクルに消費されるまで保持されます。
    pub fn on_pointer_down(&mut self) {
        self.clicked = true;
    }

    /// ポインタ解放
    ///
    /// # 戻り値
    ///
    /// * 選択中だったパーティクルのIDと、最後に設定すべき投げ速度
    pub fn on_pointer_up(&mut self) -> Option<(ParticleId, Vec2)> {
        self.clicked = false;
        let throw = self.mouse - self.prev_mouse;
        self.selected.take().map(|id| {
            log::debug!("particle {} released with velocity ({}, {})", id, throw.x, throw.y);
            (id, throw)
        })
    }

    pub fn on_key_down(&mut self, key_code: KeyCode) {
        self.keys_pressed.insert(key_code);
    }

    pub fn on_key_up(&mut self, key_code: KeyCode) {
        self.keys_pressed.remove(&key_code);
    }

    /// フレームを開始し、入力スナップショットを返す
    ///
    /// 時刻を進め、期限に達したポインタ位置を確定します。
    /// 確定後に次の移動がないまま1間隔たてば、移動量をゼロに戻します。
    /// 最初の確定は移動量を持ちません。
    pub fn begin_frame(&mut self, delta_time: f64) -> FrameInput {
        self.clock.advance(delta_time);
        let now = self.clock.elapsed();

        if self.commit.fire(now) {
            if let Some(sample) = self.pending_sample.take() {
                self.prev_mouse = if self.has_sample { self.mouse } else { sample };
                self.mouse = sample;
                self.has_sample = true;
                self.settle.schedule(now, self.debounce_interval);
            }
        } else if !self.commit.is_armed() && self.settle.fire(now) {
            // 確定待ちの移動がある間は前回の移動量を保つ
            self.prev_mouse = self.mouse;
        }

        FrameInput {
            mouse: self.mouse,
            prev_mouse: self.prev_mouse,
            click_pending: self.clicked,
            selected: self.selected,
            grab_all: self.is_held(self.bindings.grab_all),
            gravity_on: self.is_held(self.bindings.gravity),
            energy_loss: self.energy_loss(),
        }
    }

    /// フレーム処理の結果を書き戻す
    pub fn end_frame(&mut self, outcome: FrameOutcome) {
        self.selected = outcome.selected;
        if outcome.click_consumed {
            self.clicked = false;
        }
    }

    /// 選択中のパーティクルが存在しなくなっていれば選択を解除
    pub fn retain_selection(&mut self, is_alive: impl Fn(ParticleId) -> bool) {
        if let Some(id) = self.selected {
            if !is_alive(id) {
                log::debug!("selected particle {} removed", id);
                self.selected = None;
            }
        }
    }

    /// 現在のエネルギー損失係数
    pub fn energy_loss(&self) -> f64 {
        if self.is_held(self.bindings.energy_loss) {
            self.inelasticity
        } else {
            1.0
        }
    }

    /// 法線表示キーが押されているか
    pub fn show_normals(&self) -> bool {
        self.is_held(self.bindings.show_normals)
    }

    pub fn selected(&self) -> Option<ParticleId> {
        self.selected
    }

    /// 確定済みのポインタ位置（ワールド座標）
    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    fn is_held(&self, key_code: KeyCode) -> bool {
        self.keys_pressed.contains(&key_code)
    }
}
