//! 時間ユーティリティモジュール
//!
//! フレーム時間の集計とデバウンス用の期限タイマーを提供します。
//! 時刻はすべてホストから渡される`dt`の累積値（秒）で、壁時計は参照しません。

/// シミュレーション内時間管理用の構造体
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// 開始からの経過時間（秒）
    elapsed: f64,
    /// 前回のフレームからの経過時間（秒）
    delta: f64,
    /// 累積フレーム数
    frame_count: u64,
}

impl FrameClock {
    /// 新しいFrameClockを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 1フレーム分時間を進める
    ///
    /// # 引数
    ///
    /// * `delta_time` - ホストが計測したフレーム時間（秒）。負値は0として扱う
    pub fn advance(&mut self, delta_time: f64) {
        let delta_time = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        self.delta = delta_time;
        self.elapsed += delta_time;
        self.frame_count += 1;
    }

    /// 開始からの経過時間（秒）
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// 前回のフレーム時間（秒）
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// フレーム数
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// 表示用のフレームレート
    ///
    /// `dt`が0のフレーム（初回など）は`None`
    pub fn fps(&self) -> Option<u32> {
        if self.delta > 0.0 {
            Some((1.0 / self.delta) as u32)
        } else {
            None
        }
    }
}

/// 期限付きタイマー
///
/// 予約すると`now + interval`が期限になり、再予約で前の期限は破棄されます。
/// 毎フレーム`is_due`で現在時刻と比較して使います。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deadline {
    at: Option<f64>,
}

impl Deadline {
    /// 未予約のタイマーを作成
    pub fn new() -> Self {
        Self { at: None }
    }

    /// 期限を予約（既存の予約は上書き）
    pub fn schedule(&mut self, now: f64, interval: f64) {
        self.at = Some(now + interval.max(0.0));
    }

    /// 予約中かどうか
    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// 期限に達したかどうか
    pub fn is_due(&self, now: f64) -> bool {
        matches!(self.at, Some(at) if now >= at)
    }

    /// 期限に達していれば予約を解除して`true`を返す
    pub fn fire(&mut self, now: f64) -> bool {
        if self.is_due(now) {
            self.at = None;
            true
        } else {
            false
        }
    }
}
