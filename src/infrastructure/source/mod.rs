//! フレームソースアダプタ群
//!
//! ビルド時のfeatureフラグではなく、実行時に設定でソースを選択する。
//! vtableのオーバーヘッドを避けるため、trait objectではなくenumでディスパッチ。

pub mod image_dir;
pub mod synthetic;

use crate::domain::{DomainResult, Frame, FrameSourcePort, SourceConfig, SourceInfo, SourceMode};
use image_dir::ImageDirSourceAdapter;
use synthetic::SyntheticSourceAdapter;

/// フレームソースの選択
pub enum SourceSelector {
    /// 合成フレーム生成
    Synthetic(SyntheticSourceAdapter),
    /// 画像ディレクトリ再生
    Images(ImageDirSourceAdapter),
}

impl SourceSelector {
    /// 設定からソースを構築
    pub fn from_config(config: &SourceConfig) -> DomainResult<Self> {
        match config.mode {
            SourceMode::Synthetic => Ok(SourceSelector::Synthetic(SyntheticSourceAdapter::new(
                config,
            ))),
            SourceMode::Images => Ok(SourceSelector::Images(ImageDirSourceAdapter::new(
                &config.images_dir,
            )?)),
        }
    }
}

impl FrameSourcePort for SourceSelector {
    fn next_frame(&mut self) -> DomainResult<Option<Frame>> {
        match self {
            SourceSelector::Synthetic(adapter) => adapter.next_frame(),
            SourceSelector::Images(adapter) => adapter.next_frame(),
        }
    }

    fn reinitialize(&mut self) -> DomainResult<()> {
        match self {
            SourceSelector::Synthetic(adapter) => adapter.reinitialize(),
            SourceSelector::Images(adapter) => adapter.reinitialize(),
        }
    }

    fn source_info(&self) -> SourceInfo {
        match self {
            SourceSelector::Synthetic(adapter) => adapter.source_info(),
            SourceSelector::Images(adapter) => adapter.source_info(),
        }
    }
}
