/// 色ブロブ検出アダプタ
///
/// 1フレームを固定パレット3色のブロブ列に変換する。
/// 呼び出し間で状態を持たない純粋な変換で、同一フレームには常に
/// 同一のブロブ列を返す。

use crate::domain::{
    Blob, ColorClass, DetectConfig, DetectPort, DomainError, DomainResult, Frame, HsvRange,
};
use crate::infrastructure::processing::{dilate, extract_blobs, frame_to_hsv, in_range};
use crate::measure_span;

/// 色ブロブ検出アダプタ
pub struct ColorBlobDetectAdapter {
    /// クラスごとのHSVレンジ（検出順に保持）
    ranges: [(ColorClass, HsvRange); 3],
    /// 最小ブロブ面積（この値を超える領域のみ出力）
    min_blob_area: u32,
}

impl ColorBlobDetectAdapter {
    /// 固定パレットのデフォルト閾値でアダプタを作成
    pub fn new() -> Self {
        Self::with_config(&DetectConfig::default())
    }

    /// 設定からアダプタを作成
    ///
    /// レンジは設定値を使用するが、クラスの検出順は常に Red → Green → Blue。
    pub fn with_config(config: &DetectConfig) -> Self {
        let ranges = [
            (ColorClass::Red, config.range_for(ColorClass::Red)),
            (ColorClass::Green, config.range_for(ColorClass::Green)),
            (ColorClass::Blue, config.range_for(ColorClass::Blue)),
        ];

        Self {
            ranges,
            min_blob_area: config.min_blob_area,
        }
    }

    /// フレームの整形式チェック
    fn validate_frame(frame: &Frame) -> DomainResult<()> {
        if frame.width == 0 || frame.height == 0 {
            return Err(DomainError::InvalidFrame(format!(
                "frame dimensions must be positive, got {}x{}",
                frame.width, frame.height
            )));
        }
        if frame.data.len() != frame.expected_len() {
            return Err(DomainError::InvalidFrame(format!(
                "buffer length {} does not match {}x{}x{}",
                frame.data.len(),
                frame.width,
                frame.height,
                Frame::CHANNELS
            )));
        }
        Ok(())
    }
}

impl Default for ColorBlobDetectAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectPort for ColorBlobDetectAdapter {
    fn detect(&mut self, frame: &Frame) -> DomainResult<Vec<Blob>> {
        Self::validate_frame(frame)?;

        // HSV変換は1フレームにつき1回。3クラスすべてが同じ変換結果を閾値処理する。
        let hsv = measure_span!("bgr_to_hsv", { frame_to_hsv(frame) });

        let mut blobs = Vec::new();
        for (class, range) in &self.ranges {
            let mask = in_range(&hsv, range);
            let dilated = dilate(&mask);
            blobs.extend(extract_blobs(&dilated, *class, self.min_blob_area));
        }

        Ok(blobs)
    }
}
