//! 検出Hot Pathのベンチマーク
//!
//! 実行方法: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chromatrack::domain::{DetectPort, Frame, Rect};
use chromatrack::infrastructure::color_detect::ColorBlobDetectAdapter;
use chromatrack::infrastructure::processing::{bgr_to_hsv, frame_to_hsv};

/// パレット3色の矩形を含む640x480フレーム
fn sample_frame() -> Frame {
    let width = 640u32;
    let height = 480u32;
    let mut data = vec![0u8; (width * height * 3) as usize];

    let rects: [(Rect, [u8; 3]); 3] = [
        (Rect::new(40, 40, 120, 90), [30, 0, 255]),
        (Rect::new(260, 180, 120, 90), [0, 255, 0]),
        (Rect::new(480, 320, 120, 90), [255, 0, 0]),
    ];

    for (rect, bgr) in rects {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                let idx = ((y * width + x) * 3) as usize;
                data[idx..idx + 3].copy_from_slice(&bgr);
            }
        }
    }

    Frame::new(data, width, height)
}

fn bench_detect(c: &mut Criterion) {
    let frame = sample_frame();
    let mut adapter = ColorBlobDetectAdapter::new();

    c.bench_function("detect_640x480_3_blobs", |b| {
        b.iter(|| {
            let blobs = adapter.detect(black_box(&frame)).unwrap();
            black_box(blobs)
        })
    });
}

fn bench_hsv_conversion(c: &mut Criterion) {
    let frame = sample_frame();

    c.bench_function("frame_to_hsv_640x480", |b| {
        b.iter(|| black_box(frame_to_hsv(black_box(&frame))))
    });

    c.bench_function("bgr_to_hsv_pixel", |b| {
        b.iter(|| black_box(bgr_to_hsv(black_box(30), black_box(0), black_box(255))))
    });
}

criterion_group!(benches, bench_detect, bench_hsv_conversion);
criterion_main!(benches);
