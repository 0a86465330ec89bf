//! HSVレンジによる二値マスク生成と膨張処理
//!
//! マスクはフレームと同寸法の1チャンネル画像。レンジ内ピクセルは255、
//! それ以外は0（OpenCVのinRange互換の表現）。

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

use crate::domain::HsvRange;
use crate::infrastructure::processing::hsv::HsvImage;

/// マスク内のピクセル値（レンジ内）
pub const MASK_ON: u8 = 255;
/// マスク外のピクセル値
pub const MASK_OFF: u8 = 0;

/// 膨張カーネルの半径（5x5正方形カーネル、1回適用に相当）
const DILATE_RADIUS: u8 = 2;

/// HSV画像からレンジ内ピクセルのマスクを生成
///
/// 3成分すべてが [lower, upper]（両端含む）に入るピクセルのみ255になる。
pub fn in_range(hsv: &HsvImage, range: &HsvRange) -> GrayImage {
    let mut mask = GrayImage::new(hsv.width(), hsv.height());

    for (x, y, px) in hsv.enumerate_pixels() {
        let [h, s, v] = px.0;
        let value = if range.contains(h, s, v) {
            MASK_ON
        } else {
            MASK_OFF
        };
        mask.put_pixel(x, y, Luma([value]));
    }

    mask
}

/// マスクを膨張させる
///
/// 5x5の全要素trueの構造要素を1回適用する（L∞ノルム半径2の膨張と等価）。
/// 連結領域抽出の前に必ず適用し、ノイズで分断された領域を繋ぐ。
pub fn dilate(mask: &GrayImage) -> GrayImage {
    morphology::dilate(mask, Norm::LInf, DILATE_RADIUS)
}
