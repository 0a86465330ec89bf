/// Null表示シンクアダプタ
///
/// テスト・計測用の表示モック実装。
/// ブロブ数をログに出力するのみで、描画・ファイル出力は行わない。

use crate::domain::{Blob, DisplayPort, DomainResult, Frame};

/// Null表示シンクアダプタ
pub struct NullDisplayAdapter {
    presented: u64,
}

impl NullDisplayAdapter {
    /// 新しいNullシンクを作成
    pub fn new() -> Self {
        Self { presented: 0 }
    }

    /// これまでに受け取ったフレーム数
    pub fn presented_frames(&self) -> u64 {
        self.presented
    }
}

impl Default for NullDisplayAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for NullDisplayAdapter {
    fn present(&mut self, _frame: &Frame, blobs: &[Blob]) -> DomainResult<()> {
        self.presented += 1;

        #[cfg(debug_assertions)]
        tracing::debug!("NullDisplay: frame {} with {} blobs", self.presented, blobs.len());

        #[cfg(not(debug_assertions))]
        let _ = blobs;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_presented_frames() {
        let mut sink = NullDisplayAdapter::new();
        let frame = Frame::new(vec![0u8; 4 * 4 * 3], 4, 4);

        sink.present(&frame, &[]).unwrap();
        sink.present(&frame, &[]).unwrap();

        assert_eq!(sink.presented_frames(), 2);
        assert!(!sink.should_quit());
    }
}
