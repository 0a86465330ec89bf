/// 合成フレームソースアダプタ
///
/// テスト・デモ用の決定的なフレーム生成実装。
/// 黒背景の上をパレット3色の矩形が移動するフレーム列を生成する。
/// 同じ設定・同じフレーム番号からは常に同じフレームが得られる。

use crate::domain::{DomainResult, Frame, FrameSourcePort, Rect, SourceConfig, SourceInfo};

/// 生成する矩形のサイズ
const RECT_WIDTH: u32 = 48;
const RECT_HEIGHT: u32 = 36;

/// 各クラスのレンジ内に入るBGR値
///
/// 赤はマゼンタ寄り（H=176）にしてデフォルトの赤レンジ [136,180] に収める。
const RED_BGR: [u8; 3] = [30, 0, 255];
const GREEN_BGR: [u8; 3] = [0, 255, 0];
const BLUE_BGR: [u8; 3] = [255, 0, 0];

/// 合成フレームソースアダプタ
pub struct SyntheticSourceAdapter {
    width: u32,
    height: u32,
    frame_count: u32,
    next_index: u32,
}

impl SyntheticSourceAdapter {
    /// 設定から合成ソースを作成
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            frame_count: config.frame_count,
            next_index: 0,
        }
    }

    /// 指定番号のフレームを生成（決定的）
    fn render_frame(&self, index: u32) -> Frame {
        let mut data = vec![0u8; (self.width * self.height * Frame::CHANNELS) as usize];

        // 3色の矩形を縦に3段、横方向にフレーム番号分だけずらして配置
        let colors = [RED_BGR, GREEN_BGR, BLUE_BGR];
        for (row, bgr) in colors.iter().enumerate() {
            let rect = self.rect_at(index, row as u32);
            Self::fill_rect(&mut data, self.width, rect, *bgr);
        }

        Frame::new(data, self.width, self.height)
    }

    /// フレーム番号と段から矩形位置を決める
    fn rect_at(&self, index: u32, row: u32) -> Rect {
        let w = RECT_WIDTH.min(self.width);
        let h = RECT_HEIGHT.min(self.height / 4).max(1);

        let x_span = self.width.saturating_sub(w).max(1);
        let x = (index * 4) % x_span;

        // 段ごとの縦位置（重ならないよう高さを4分割）
        let y = (self.height / 4) * row + 2;
        let y = y.min(self.height.saturating_sub(h));

        Rect::new(x, y, w, h)
    }

    fn fill_rect(data: &mut [u8], width: u32, rect: Rect, bgr: [u8; 3]) {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                let idx = ((y * width + x) * Frame::CHANNELS) as usize;
                data[idx..idx + 3].copy_from_slice(&bgr);
            }
        }
    }
}

impl FrameSourcePort for SyntheticSourceAdapter {
    fn next_frame(&mut self) -> DomainResult<Option<Frame>> {
        if self.next_index >= self.frame_count {
            return Ok(None);
        }

        let frame = self.render_frame(self.next_index);
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn reinitialize(&mut self) -> DomainResult<()> {
        self.next_index = 0;
        Ok(())
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo {
            width: self.width,
            height: self.height,
            name: format!("synthetic ({} frames)", self.frame_count),
        }
    }
}
