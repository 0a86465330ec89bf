//! 色ブロブ検出の統合テスト
//!
//! 公開アダプタ経由で、固定パレット検出の観測可能な性質を検証する。

use chromatrack::domain::{Blob, ColorClass, DetectPort, DomainError, Frame, Rect};
use chromatrack::infrastructure::color_detect::ColorBlobDetectAdapter;

/// 各クラスのデフォルトレンジに入るBGR値
///
/// 赤レンジ [136,180] はマゼンタ寄りの赤なので、純赤(H=0)ではなく
/// H=176 になる (30, 0, 255) を使う。
const RED_BGR: [u8; 3] = [30, 0, 255];
const GREEN_BGR: [u8; 3] = [0, 255, 0];
const BLUE_BGR: [u8; 3] = [255, 0, 0];

/// 黒背景に矩形を描いたフレームを作る
fn frame_with_rects(width: u32, height: u32, rects: &[(Rect, [u8; 3])]) -> Frame {
    let mut data = vec![0u8; (width * height * 3) as usize];
    for &(rect, bgr) in rects {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                let idx = ((y * width + x) * 3) as usize;
                data[idx..idx + 3].copy_from_slice(&bgr);
            }
        }
    }
    Frame::new(data, width, height)
}

fn detect(frame: &Frame) -> Vec<Blob> {
    let mut adapter = ColorBlobDetectAdapter::new();
    adapter.detect(frame).expect("well-formed frame")
}

#[test]
fn out_of_range_frame_yields_empty_result() {
    // 黒・白・グレーはどのクラスのレンジにも入らない
    let black = frame_with_rects(160, 120, &[]);
    assert!(detect(&black).is_empty());

    let white = frame_with_rects(160, 120, &[(Rect::new(0, 0, 160, 120), [255, 255, 255])]);
    assert!(detect(&white).is_empty());

    let gray = frame_with_rects(160, 120, &[(Rect::new(10, 10, 80, 60), [128, 128, 128])]);
    assert!(detect(&gray).is_empty());
}

#[test]
fn single_red_rect_detected_within_dilation_tolerance() {
    // 30x20 = 600ピクセル（301以上）の赤矩形
    let drawn = Rect::new(50, 40, 30, 20);
    let frame = frame_with_rects(160, 120, &[(drawn, RED_BGR)]);

    let blobs = detect(&frame);
    assert_eq!(blobs.len(), 1);

    let blob = &blobs[0];
    assert_eq!(blob.class, ColorClass::Red);

    // 膨張（5x5カーネル1回）で各辺最大2ピクセル成長する
    let r = blob.rect;
    assert!(r.x >= drawn.x - 2 && r.x <= drawn.x);
    assert!(r.y >= drawn.y - 2 && r.y <= drawn.y);
    assert!(r.width >= drawn.width && r.width <= drawn.width + 4);
    assert!(r.height >= drawn.height && r.height <= drawn.height + 4);
}

#[test]
fn area_boundary_is_strict_at_300() {
    // 膨張後の面積がちょうど300になる領域: 13x16 → 膨張後 17x20 = 340 ... ではなく
    // 計算で合わせる: 膨張後 (w+4)x(h+4) = 300 となる整数解 16x15 → 描画矩形 12x11
    // 12x11 → 膨張後 16x15 = 240 ≦ 300 → 出力なし
    let small = frame_with_rects(160, 120, &[(Rect::new(50, 40, 12, 11), GREEN_BGR)]);
    assert!(detect(&small).is_empty());

    // 16x15 → 膨張後 20x19 = 380 > 300 → 出力あり
    let large = frame_with_rects(160, 120, &[(Rect::new(50, 40, 16, 15), GREEN_BGR)]);
    let blobs = detect(&large);
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].class, ColorClass::Green);

    // 境界ちょうど: 膨張後 300ピクセルの領域は出力されない
    // 21x8 → 膨張後 25x12 = 300
    let exact = frame_with_rects(160, 120, &[(Rect::new(50, 40, 21, 8), GREEN_BGR)]);
    assert!(detect(&exact).is_empty());

    // 1列足すと 301 を超える: 22x8 → 膨張後 26x12 = 312 > 300
    let over = frame_with_rects(160, 120, &[(Rect::new(50, 40, 22, 8), GREEN_BGR)]);
    assert_eq!(detect(&over).len(), 1);
}

#[test]
fn three_classes_ordered_red_green_blue() {
    // 空間上は青→緑→赤の順（左→右）に並べる
    let frame = frame_with_rects(
        320,
        100,
        &[
            (Rect::new(10, 30, 40, 30), BLUE_BGR),
            (Rect::new(130, 30, 40, 30), GREEN_BGR),
            (Rect::new(250, 30, 40, 30), RED_BGR),
        ],
    );

    let blobs = detect(&frame);
    assert_eq!(blobs.len(), 3);
    assert_eq!(blobs[0].class, ColorClass::Red);
    assert_eq!(blobs[1].class, ColorClass::Green);
    assert_eq!(blobs[2].class, ColorClass::Blue);

    // 各ブロブは対応する矩形の位置にある
    assert!(blobs[0].rect.x >= 248);
    assert!(blobs[1].rect.x >= 128 && blobs[1].rect.x < 200);
    assert!(blobs[2].rect.x <= 10);
}

#[test]
fn two_red_regions_yield_two_red_blobs() {
    // 膨張で繋がらないよう十分離す（間隔 > 4ピクセル）
    let frame = frame_with_rects(
        200,
        120,
        &[
            (Rect::new(10, 10, 30, 25), RED_BGR),
            (Rect::new(120, 60, 30, 25), RED_BGR),
        ],
    );

    let blobs = detect(&frame);
    assert_eq!(blobs.len(), 2);
    assert!(blobs.iter().all(|b| b.class == ColorClass::Red));

    // ラスタスキャン順: 上の領域が先
    assert!(blobs[0].rect.y < blobs[1].rect.y);
}

#[test]
fn adjacent_red_regions_merge_after_dilation() {
    // 間隔4ピクセル以下の2領域は膨張で1つに繋がる
    let frame = frame_with_rects(
        200,
        120,
        &[
            (Rect::new(10, 10, 30, 25), RED_BGR),
            (Rect::new(43, 10, 30, 25), RED_BGR),
        ],
    );

    let blobs = detect(&frame);
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].class, ColorClass::Red);
}

#[test]
fn detect_is_deterministic() {
    let frame = frame_with_rects(
        320,
        240,
        &[
            (Rect::new(12, 34, 50, 40), RED_BGR),
            (Rect::new(100, 100, 60, 50), GREEN_BGR),
            (Rect::new(200, 30, 45, 45), BLUE_BGR),
            (Rect::new(240, 150, 50, 50), RED_BGR),
        ],
    );

    let mut adapter = ColorBlobDetectAdapter::new();
    let first = adapter.detect(&frame).unwrap();
    let second = adapter.detect(&frame).unwrap();
    let third = adapter.detect(&frame).unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(first.len(), 4);
}

#[test]
fn malformed_frames_rejected() {
    let mut adapter = ColorBlobDetectAdapter::new();

    // 寸法ゼロ
    let zero = Frame::new(vec![], 0, 0);
    assert!(matches!(
        adapter.detect(&zero),
        Err(DomainError::InvalidFrame(_))
    ));

    // バッファ長の不整合
    let truncated = Frame::new(vec![0u8; 100], 64, 64);
    assert!(matches!(
        adapter.detect(&truncated),
        Err(DomainError::InvalidFrame(_))
    ));
}

#[test]
fn frame_is_not_mutated_by_detection() {
    let frame = frame_with_rects(160, 120, &[(Rect::new(50, 40, 30, 20), BLUE_BGR)]);
    let before = frame.data.clone();

    let mut adapter = ColorBlobDetectAdapter::new();
    let _ = adapter.detect(&frame).unwrap();

    assert_eq!(frame.data, before);
}
