//! ロギングユーティリティモジュール
//!
//! `log`クレートのバックエンド初期化を担当します。
//! WebAssembly上ではブラウザのコンソールへ出力し、ネイティブではホスト側のロガーに任せます。

/// ロギング初期化
///
/// wasm32以外のターゲットでは何もしません（ホストが`log`の実装を登録する想定）。
pub fn init_logging(min_level: log::Level) {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_logger::init(wasm_logger::Config::new(min_level));
    }
    log::info!("logger initialized (min level: {:?})", min_level);
}
