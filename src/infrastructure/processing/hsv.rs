//! BGR → HSV 色空間変換
//!
//! OpenCV準拠の8bit HSV表現（H [0-180), S/V [0-255]）に変換する。
//! 固定パレットの閾値はこの表現を前提に定義されている。

use image::{ImageBuffer, Rgb};

use crate::domain::Frame;

/// HSV画像バッファ
///
/// チャンネルは H, S, V の順に格納する（Rgbコンテナの流用）。
pub type HsvImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// BGRピクセル1つをHSVに変換
///
/// # Returns
/// [H, S, V]。H = 色相角の1/2（四捨五入）、S/V = 255スケール。
#[inline]
pub fn bgr_to_hsv(b: u8, g: u8, r: u8) -> [u8; 3] {
    let rf = r as f32 / 255.0;
    let gf = g as f32 / 255.0;
    let bf = b as f32 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    // 色相（度数、-60〜300）
    let h_deg = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * ((gf - bf) / delta)
    } else if max == gf {
        60.0 * ((bf - rf) / delta) + 120.0
    } else {
        60.0 * ((rf - gf) / delta) + 240.0
    };

    // OpenCV準拠: H = 度数/2。負の半角は四捨五入後に180を加算し[0,180)へ収める。
    let mut h = (h_deg / 2.0).round() as i32;
    if h < 0 {
        h += 180;
    }

    let s = if max == 0.0 {
        0.0
    } else {
        (delta / max) * 255.0
    };
    let v = max * 255.0;

    [h as u8, s.round() as u8, v.round() as u8]
}

/// フレーム全体をHSV画像に変換
///
/// 変換は1フレームにつき1回だけ実行し、全色クラスが同じ結果を共有する。
/// 呼び出し側でフレームが整形式であることを保証すること。
pub fn frame_to_hsv(frame: &Frame) -> HsvImage {
    let mut hsv = HsvImage::new(frame.width, frame.height);

    for (i, px) in frame.data.chunks_exact(Frame::CHANNELS as usize).enumerate() {
        let x = i as u32 % frame.width;
        let y = i as u32 / frame.width;
        hsv.put_pixel(x, y, Rgb(bgr_to_hsv(px[0], px[1], px[2])));
    }

    hsv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_green() {
        // BGR (0, 255, 0) → 色相120度 → H=60
        assert_eq!(bgr_to_hsv(0, 255, 0), [60, 255, 255]);
    }

    #[test]
    fn test_pure_blue() {
        // BGR (255, 0, 0) → 色相240度 → H=120
        assert_eq!(bgr_to_hsv(255, 0, 0), [120, 255, 255]);
    }

    #[test]
    fn test_pure_red() {
        // BGR (0, 0, 255) → 色相0度 → H=0
        assert_eq!(bgr_to_hsv(0, 0, 255), [0, 255, 255]);
    }

    #[test]
    fn test_magenta_shifted_red_wraps_high() {
        // 赤がマゼンタ側に寄ると色相は360度側へ巻き戻る
        // BGR (30, 0, 255): 度数 = 60 * (0-30)/255 = -7.06 → 352.9度 → H=176
        let [h, s, v] = bgr_to_hsv(30, 0, 255);
        assert_eq!(h, 176);
        assert_eq!(s, 255);
        assert_eq!(v, 255);
    }

    #[test]
    fn test_achromatic() {
        // 無彩色は S=0、H=0
        assert_eq!(bgr_to_hsv(0, 0, 0), [0, 0, 0]);
        assert_eq!(bgr_to_hsv(255, 255, 255), [0, 0, 255]);
        assert_eq!(bgr_to_hsv(128, 128, 128), [0, 0, 128]);
    }

    #[test]
    fn test_hue_stays_below_180() {
        // どのピクセルでも H < 180（OpenCV 8bit表現）
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let [h, _, _] = bgr_to_hsv(b as u8, g as u8, r as u8);
                    assert!(h < 180, "hue {} out of range for bgr({},{},{})", h, b, g, r);
                }
            }
        }
    }

    #[test]
    fn test_frame_conversion_dimensions() {
        let frame = Frame::new(vec![0u8; 8 * 6 * 3], 8, 6);
        let hsv = frame_to_hsv(&frame);
        assert_eq!(hsv.width(), 8);
        assert_eq!(hsv.height(), 6);
    }

    #[test]
    fn test_frame_conversion_pixel_order() {
        // (1,0) に純緑を置いたフレーム
        let mut data = vec![0u8; 4 * 2 * 3];
        data[3] = 0; // B
        data[4] = 255; // G
        data[5] = 0; // R
        let frame = Frame::new(data, 4, 2);

        let hsv = frame_to_hsv(&frame);
        assert_eq!(hsv.get_pixel(1, 0).0, [60, 255, 255]);
        assert_eq!(hsv.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
