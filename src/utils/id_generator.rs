//! ID生成ユーティリティモジュール
//!
//! パーティクルに一意のIDを割り当てるための生成器を提供します。

use std::sync::atomic::{AtomicU32, Ordering};

/// 連番ID生成器
///
/// 発行したIDは生成器が生きている限り再利用されません。
#[derive(Debug)]
pub struct IdGenerator {
    /// 次に生成するID値
    next_id: AtomicU32,
}

impl IdGenerator {
    /// 0から始まるID生成器を作成
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(0),
        }
    }

    /// 新しいIDを作成
    pub fn next_id(&self) -> u32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let generator = IdGenerator::new();
        assert_eq!(generator.next_id(), 0);
        assert_eq!(generator.next_id(), 1);
        assert_eq!(generator.next_id(), 2);
    }
}
