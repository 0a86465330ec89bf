//! 検出結果のアノテーション描画
//!
//! フレームのコピーに対してバウンディングボックスとクラスラベルを描画する。
//! 元フレームは変更しない。ボックスはブロブのクラス色、ラベルは
//! 矩形の左上に同色で描画される。
//!
//! ラベル文字は組み込みの5x7ピクセルグリフで描画する（TTFアセット不要）。

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as DrawRect;

use crate::domain::{Blob, Frame};

/// グリフの寸法（ピクセル、拡大率1のとき）
const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// 文字間スペース（拡大率1のとき）
const GLYPH_SPACING: u32 = 1;

/// BGRフレームをRGB画像にコピーし、ブロブを描き込む
///
/// # Arguments
/// - `frame`: 元フレーム（読み取りのみ）
/// - `blobs`: 描画するブロブ列
/// - `thickness`: ボックス線幅（ピクセル、内側に向かって太らせる）
/// - `label_scale`: ラベル文字の拡大率
pub fn render(frame: &Frame, blobs: &[Blob], thickness: u32, label_scale: u32) -> RgbImage {
    let mut canvas = frame_to_rgb(frame);

    for blob in blobs {
        let bgr = blob.class.draw_color_bgr();
        let color = Rgb([bgr[2], bgr[1], bgr[0]]);

        draw_box(&mut canvas, blob, thickness, color);
        draw_label(
            &mut canvas,
            blob.class.label(),
            blob.rect.x,
            blob.rect.y,
            label_scale,
            color,
        );
    }

    canvas
}

/// BGRバッファをRGB画像へ変換
fn frame_to_rgb(frame: &Frame) -> RgbImage {
    let mut img = RgbImage::new(frame.width, frame.height);
    for (i, px) in frame.data.chunks_exact(Frame::CHANNELS as usize).enumerate() {
        let x = i as u32 % frame.width;
        let y = i as u32 / frame.width;
        img.put_pixel(x, y, Rgb([px[2], px[1], px[0]]));
    }
    img
}

/// 線幅分だけ内側にずらしながら中空矩形を重ね描きする
fn draw_box(canvas: &mut RgbImage, blob: &Blob, thickness: u32, color: Rgb<u8>) {
    let r = blob.rect;
    for t in 0..thickness {
        if r.width <= 2 * t || r.height <= 2 * t {
            break;
        }
        let inner = DrawRect::at((r.x + t) as i32, (r.y + t) as i32)
            .of_size(r.width - 2 * t, r.height - 2 * t);
        draw_hollow_rect_mut(canvas, inner, color);
    }
}

/// ラベルを矩形の左上（上辺の外側）に描画
///
/// 画像上端に近い場合は矩形の内側上部にずらす。
fn draw_label(
    canvas: &mut RgbImage,
    label: &str,
    x: u32,
    y: u32,
    scale: u32,
    color: Rgb<u8>,
) {
    let text_height = GLYPH_HEIGHT * scale;
    let top = if y >= text_height + 2 {
        y - text_height - 2
    } else {
        y + 2
    };

    let mut pen_x = x;
    for c in label.chars() {
        if let Some(rows) = glyph(c) {
            draw_glyph(canvas, rows, pen_x, top, scale, color);
        }
        pen_x += (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    }
}

/// 1グリフを拡大率付きで描画（画像外のピクセルは無視）
fn draw_glyph(
    canvas: &mut RgbImage,
    rows: &[u8; 7],
    origin_x: u32,
    origin_y: u32,
    scale: u32,
    color: Rgb<u8>,
) {
    for (row_idx, row) in rows.iter().enumerate() {
        for col_idx in 0..GLYPH_WIDTH {
            // MSB側が左端
            if row & (1 << (GLYPH_WIDTH - 1 - col_idx)) == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = origin_x + col_idx * scale + dx;
                    let py = origin_y + row_idx as u32 * scale + dy;
                    if px < canvas.width() && py < canvas.height() {
                        canvas.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

/// 5x7グリフテーブル（ラベルで使用する文字のみ）
fn glyph(c: char) -> Option<&'static [u8; 7]> {
    match c {
        'R' => Some(&[0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'G' => Some(&[0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110]),
        'B' => Some(&[0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'd' => Some(&[0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10011, 0b01101]),
        'e' => Some(&[0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110]),
        'l' => Some(&[0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
        'n' => Some(&[0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
        'r' => Some(&[0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000]),
        'u' => Some(&[0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101]),
        _ => None,
    }
}
