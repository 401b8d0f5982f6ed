//! ユーティリティモジュール
//!
//! このモジュールには、サンドボックス全体で使用されるベクトル演算、時間管理、ID生成、ロギングが含まれています。

pub mod math;
pub mod time;
pub mod id_generator;
pub mod logger;

// サブモジュールの再エクスポート
pub use math::*;
pub use time::*;
pub use id_generator::*;
pub use logger::*;
