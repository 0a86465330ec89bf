//! 実行時状態の共有
//!
//! `Arc<AtomicBool>`を使用したロックフリー設計により、
//! 全スレッドから停止要求を低コストで観測できる。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// パイプライン全体の実行状態
///
/// Ctrl-Cハンドラや表示シンクの終了要求から停止を伝播するために使う。
#[derive(Debug, Clone)]
pub struct RuntimeState {
    running: Arc<AtomicBool>,
}

impl RuntimeState {
    /// 実行中状態で作成
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// まだ実行を続けるべきか
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// 停止を要求する（全スレッドに伝播）
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new()
    }
}
