//! 再初期化ロジックモジュール
//!
//! フレームソースの再初期化を指数バックオフで制御します。

use std::time::{Duration, Instant};

/// 再初期化戦略
#[derive(Debug, Clone)]
pub struct RecoveryStrategy {
    /// 連続取得エラー閾値（この回数に達したら再初期化）
    pub consecutive_failure_threshold: u32,
    /// 初期バックオフ時間
    pub initial_backoff: Duration,
    /// 最大バックオフ時間
    pub max_backoff: Duration,
    /// 累積失敗時間の上限（これを超えたら致命的エラー）
    pub max_cumulative_failure: Duration,
}

impl Default for RecoveryStrategy {
    fn default() -> Self {
        Self {
            consecutive_failure_threshold: 30,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            max_cumulative_failure: Duration::from_secs(60),
        }
    }
}

/// 再初期化状態管理
#[derive(Debug)]
pub struct RecoveryState {
    strategy: RecoveryStrategy,
    consecutive_failures: u32,
    current_backoff: Duration,
    cumulative_failure_start: Option<Instant>,
    total_reinitializations: u64,
}

impl RecoveryState {
    /// 新しいRecoveryStateを作成
    ///
    /// # Arguments
    /// * `strategy` - 再初期化戦略
    pub fn new(strategy: RecoveryStrategy) -> Self {
        Self {
            current_backoff: strategy.initial_backoff,
            strategy,
            consecutive_failures: 0,
            cumulative_failure_start: None,
            total_reinitializations: 0,
        }
    }

    /// デフォルト戦略でRecoveryStateを作成
    pub fn with_default_strategy() -> Self {
        Self::new(RecoveryStrategy::default())
    }

    /// 取得エラーを記録
    ///
    /// # Returns
    /// 再初期化が必要な場合は true
    pub fn record_failure(&mut self) -> bool {
        self.consecutive_failures += 1;

        if self.consecutive_failures >= self.strategy.consecutive_failure_threshold {
            self.consecutive_failures = 0;
            true
        } else {
            false
        }
    }

    /// 成功を記録（連続エラーカウンターとバックオフをリセット）
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.current_backoff = self.strategy.initial_backoff;
        self.cumulative_failure_start = None;
    }

    /// 再初期化試行を記録
    pub fn record_reinitialization_attempt(&mut self) {
        self.total_reinitializations += 1;

        // 指数バックオフ: 次回のバックオフ時間を2倍にする
        self.current_backoff = (self.current_backoff * 2).min(self.strategy.max_backoff);

        // 累積失敗時間の計測開始
        if self.cumulative_failure_start.is_none() {
            self.cumulative_failure_start = Some(Instant::now());
        }
    }

    /// 現在のバックオフ時間を取得
    pub fn current_backoff(&self) -> Duration {
        self.current_backoff
    }

    /// 累積失敗時間を取得
    ///
    /// # Returns
    /// 累積失敗時間。失敗していない場合は None
    pub fn cumulative_failure_duration(&self) -> Option<Duration> {
        self.cumulative_failure_start.map(|start| start.elapsed())
    }

    /// 累積失敗時間が上限を超えたか判定
    ///
    /// # Returns
    /// 上限を超えた場合は true
    pub fn is_cumulative_failure_exceeded(&self) -> bool {
        if let Some(duration) = self.cumulative_failure_duration() {
            duration >= self.strategy.max_cumulative_failure
        } else {
            false
        }
    }

    /// 総再初期化回数を取得
    pub fn total_reinitializations(&self) -> u64 {
        self.total_reinitializations
    }

    /// 連続エラー回数を取得
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
