//! エラー型モジュール
//!
//! サンドボックスの構築時に発生しうるエラーを定義します。
//! フレーム更新中のエラーは存在しません（退化した幾何はその場で特別扱いします）。

use thiserror::Error;

/// サンドボックスのエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SandboxError {
    /// 頂点数が3未満の障害物
    #[error("obstacle needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// 長さゼロの辺を持つ障害物
    #[error("obstacle edge {index} has zero length")]
    DegenerateEdge { index: usize },

    /// 全頂点が一直線上にある障害物
    #[error("obstacle vertices are collinear")]
    ZeroArea,

    /// 凸でない障害物
    #[error("obstacle is not convex at vertex {index}")]
    NonConvex { index: usize },

    /// 設定値が不正
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// 共有ロックが汚染されている
    #[error("sandbox lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for SandboxError {
    fn from(error: serde_json::Error) -> Self {
        SandboxError::InvalidConfig(error.to_string())
    }
}

/// サンドボックス用の`Result`エイリアス
pub type Result<T> = std::result::Result<T, SandboxError>;
