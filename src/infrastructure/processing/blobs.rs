//! 二値マスクからの連結領域（ブロブ）抽出
//!
//! 8近傍の連結成分ラベリングで領域を列挙し、実測面積が閾値を超える
//! 領域だけを外接矩形付きのブロブとして返す。
//!
//! 領域の列挙順はラスタスキャンで最初に現れたピクセルの順。
//! 同一入力に対して常に同一の順序・結果を返す。

use std::collections::HashMap;

use image::GrayImage;
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::domain::{Blob, ColorClass, Rect};
use crate::infrastructure::processing::mask::MASK_OFF;

/// 連結領域の集計値
struct RegionAcc {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    area: u32,
}

/// マスクから指定クラスのブロブを抽出
///
/// # Arguments
/// - `mask`: 膨張済みの二値マスク
/// - `class`: 出力ブロブに付与する色クラス
/// - `min_area`: 面積の下限。実測面積がこの値を「超える」領域のみ出力
///   （ちょうど等しい領域は出力しない）
///
/// # Returns
/// ラスタスキャン発見順のブロブ列。面積は領域のピクセル数、
/// 外接矩形は軸平行の最小矩形（幅 = max - min + 1）。
pub fn extract_blobs(mask: &GrayImage, class: ColorClass, min_area: u32) -> Vec<Blob> {
    let labeled = connected_components(mask, Connectivity::Eight, image::Luma([MASK_OFF]));

    // ラベル → 集計値。発見順を保持するためインデックス列を別に持つ。
    let mut order: Vec<u32> = Vec::new();
    let mut regions: HashMap<u32, RegionAcc> = HashMap::new();

    for (x, y, px) in labeled.enumerate_pixels() {
        let label = px.0[0];
        if label == 0 {
            // 背景
            continue;
        }

        match regions.get_mut(&label) {
            Some(acc) => {
                acc.min_x = acc.min_x.min(x);
                acc.min_y = acc.min_y.min(y);
                acc.max_x = acc.max_x.max(x);
                acc.max_y = acc.max_y.max(y);
                acc.area += 1;
            }
            None => {
                order.push(label);
                regions.insert(
                    label,
                    RegionAcc {
                        min_x: x,
                        min_y: y,
                        max_x: x,
                        max_y: y,
                        area: 1,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .filter_map(|label| {
            let acc = &regions[&label];
            if acc.area > min_area {
                let rect = Rect::new(
                    acc.min_x,
                    acc.min_y,
                    acc.max_x - acc.min_x + 1,
                    acc.max_y - acc.min_y + 1,
                );
                Some(Blob::new(rect, class, acc.area))
            } else {
                None
            }
        })
        .collect()
}
