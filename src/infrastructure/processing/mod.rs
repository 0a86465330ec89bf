//! 検出処理の純関数群
//!
//! 色空間変換・マスク生成・膨張・ブロブ抽出を独立にテスト可能な
//! 単位として提供する。状態は持たず、同一入力には常に同一出力を返す。

pub mod blobs;
pub mod hsv;
pub mod mask;

pub use blobs::extract_blobs;
pub use hsv::{bgr_to_hsv, frame_to_hsv, HsvImage};
pub use mask::{dilate, in_range};
