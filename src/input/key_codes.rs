//! キーコードの定数定義
//!
//! サンドボックスのキー割り当てはSDL系のキーコードで表します。
//! ブラウザの`KeyboardEvent.keyCode`は`from_dom_key_code`で変換します。

/// 左Shift
pub const KEY_LSHIFT: u32 = 304;
/// 左Ctrl
pub const KEY_LCTRL: u32 = 305;
/// 左Alt
pub const KEY_LALT: u32 = 308;
/// キーボード: N
pub const KEY_N: u32 = 110;

/// ブラウザのキーコード
pub mod dom {
    /// Shift
    pub const SHIFT: u32 = 16;
    /// Ctrl
    pub const CTRL: u32 = 17;
    /// Alt
    pub const ALT: u32 = 18;
    /// A
    pub const A: u32 = 65;
    /// Z
    pub const Z: u32 = 90;
}

/// ブラウザのキーコードをサンドボックスのキーコードに変換
///
/// 修飾キーは左側のコードに、英字は小文字のコードに対応させます。
/// それ以外はそのまま返します。
pub fn from_dom_key_code(code: u32) -> u32 {
    match code {
        dom::SHIFT => KEY_LSHIFT,
        dom::CTRL => KEY_LCTRL,
        dom::ALT => KEY_LALT,
        dom::A..=dom::Z => code + 32,
        other => other,
    }
}
