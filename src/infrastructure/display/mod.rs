//! 表示シンクアダプタ群
//!
//! ソースと同様、実行時に設定でシンクを選択するenumディスパッチ。

pub mod annotate;
pub mod null;
pub mod png;

use crate::domain::{Blob, DisplayConfig, DisplayMode, DisplayPort, DomainResult, Frame};
use null::NullDisplayAdapter;
use png::PngDisplayAdapter;

/// 表示シンクの選択
pub enum DisplaySelector {
    /// 連番PNG出力
    Png(PngDisplayAdapter),
    /// 出力なし
    Null(NullDisplayAdapter),
}

impl DisplaySelector {
    /// 設定からシンクを構築
    pub fn from_config(config: &DisplayConfig) -> DomainResult<Self> {
        match config.mode {
            DisplayMode::Png => Ok(DisplaySelector::Png(PngDisplayAdapter::new(config)?)),
            DisplayMode::Null => Ok(DisplaySelector::Null(NullDisplayAdapter::new())),
        }
    }
}

impl DisplayPort for DisplaySelector {
    fn present(&mut self, frame: &Frame, blobs: &[Blob]) -> DomainResult<()> {
        match self {
            DisplaySelector::Png(adapter) => adapter.present(frame, blobs),
            DisplaySelector::Null(adapter) => adapter.present(frame, blobs),
        }
    }

    fn should_quit(&self) -> bool {
        match self {
            DisplaySelector::Png(adapter) => adapter.should_quit(),
            DisplaySelector::Null(adapter) => adapter.should_quit(),
        }
    }
}
