use wasm_bindgen::prelude::*;
use web_sys::console;

// モジュール宣言
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod sandbox;
pub mod utils;
pub mod world;

pub use config::{KeyBindings, ObstacleConfig, SandboxConfig};
pub use error::{Result, SandboxError};
pub use sandbox::{Sandbox, SharedSandbox};
pub use world::SceneSnapshot;

/// フレーム時間として扱う上限（秒）
const MAX_FRAME_TIME: f64 = 0.5;

/// 異常なフレーム時間の代わりに使う値（約60FPS）
const FALLBACK_FRAME_TIME: f64 = 0.016;

// 初期化用のエントリーポイント
#[wasm_bindgen(start)]
pub fn start() {
    // エラーをコンソールにパニックフックとして表示
    console_error_panic_hook::set_once();

    // ロガーの初期化
    utils::init_logging(log::Level::Info);
}

// JavaScriptからアクセス可能なサンドボックスインスタンス
#[wasm_bindgen]
pub struct SandboxInstance {
    sandbox: Sandbox,
    last_update_time: f64,
}

#[wasm_bindgen]
impl SandboxInstance {
    /// 新しいインスタンスを作成
    ///
    /// `config_json`が`None`ならデフォルト設定を使います。
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> std::result::Result<SandboxInstance, JsValue> {
        let config = match config_json {
            Some(json) => SandboxConfig::from_json(&json).map_err(to_js_error)?,
            None => SandboxConfig::default(),
        };
        let sandbox = Sandbox::new(config).map_err(to_js_error)?;

        Ok(Self {
            sandbox,
            last_update_time: js_sys::Date::now(),
        })
    }

    /// 1フレーム進める
    ///
    /// 前回の呼び出しからの経過時間を計測して使います。
    ///
    /// # 戻り値
    ///
    /// * 使用したフレーム時間（秒）
    pub fn update(&mut self) -> f64 {
        let current_time = js_sys::Date::now();
        let mut delta_time = (current_time - self.last_update_time) / 1000.0;
        self.last_update_time = current_time;

        // 異常値の場合はデフォルト値を使用
        if delta_time.is_nan() || delta_time <= 0.0 || delta_time > MAX_FRAME_TIME {
            delta_time = FALLBACK_FRAME_TIME;
        }

        self.sandbox.tick(delta_time);
        delta_time
    }

    /// 経過時間を指定して1フレーム進める
    pub fn tick(&mut self, delta_time: f64) {
        self.sandbox.tick(delta_time);
    }

    /// スナップショットをJSON文字列で取得
    pub fn snapshot_json(&self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.sandbox.snapshot())
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    pub fn add_particles(&mut self, count: u32) {
        self.sandbox.add_particles(count as usize);
    }

    pub fn remove_particles(&mut self, count: u32) -> u32 {
        self.sandbox.remove_particles(count as usize) as u32
    }

    /// ポインタ移動
    ///
    /// `x`, `y`はブラウザのクライアント座標（描画領域の左上が原点、y下向き）です。
    /// ビューポートの高さで上下を反転し、y上向きのウィンドウ座標として渡します。
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let (_, height) = self.sandbox.world().viewport();
        self.sandbox
            .on_pointer_move(input::from_client_position(x, y, height));
    }

    pub fn on_pointer_down(&mut self) {
        self.sandbox.on_pointer_down();
    }

    pub fn on_pointer_up(&mut self) {
        self.sandbox.on_pointer_up();
    }

    /// キー押下（ブラウザのキーコード）
    pub fn on_key_down(&mut self, key_code: u32) {
        self.sandbox
            .on_key_down(input::from_dom_key_code(key_code));
    }

    /// キー解放（ブラウザのキーコード）
    pub fn on_key_up(&mut self, key_code: u32) {
        self.sandbox.on_key_up(input::from_dom_key_code(key_code));
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.sandbox.set_viewport(width, height);
    }

    pub fn particle_count(&self) -> u32 {
        self.sandbox.world().particle_count() as u32
    }
}

fn to_js_error(error: SandboxError) -> JsValue {
    let message = error.to_string();
    console::error_1(&message.as_str().into());
    JsValue::from_str(&message)
}
