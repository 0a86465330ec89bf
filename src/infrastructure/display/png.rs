/// PNG表示シンクアダプタ
///
/// アノテーション済みフレームを連番PNGファイルとして出力する。
/// ウィンドウ表示の代わりとなるファイルベースの表示シンク。

use std::path::PathBuf;

use crate::domain::{Blob, DisplayConfig, DisplayPort, DomainError, DomainResult, Frame};
use crate::infrastructure::display::annotate;

/// PNG表示シンクアダプタ
pub struct PngDisplayAdapter {
    output_dir: PathBuf,
    box_thickness: u32,
    label_scale: u32,
    frame_index: u64,
}

impl PngDisplayAdapter {
    /// 出力ディレクトリを作成してシンクを初期化
    pub fn new(config: &DisplayConfig) -> DomainResult<Self> {
        let output_dir = PathBuf::from(&config.output_dir);
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            DomainError::Initialization(format!(
                "Failed to create output dir {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            output_dir,
            box_thickness: config.box_thickness,
            label_scale: config.label_scale,
            frame_index: 0,
        })
    }

    /// 次に書き出すファイルパス
    fn next_path(&self) -> PathBuf {
        self.output_dir.join(format!("frame_{:06}.png", self.frame_index))
    }
}

impl DisplayPort for PngDisplayAdapter {
    fn present(&mut self, frame: &Frame, blobs: &[Blob]) -> DomainResult<()> {
        let annotated = annotate::render(frame, blobs, self.box_thickness, self.label_scale);

        let path = self.next_path();
        annotated.save(&path).map_err(|e| {
            DomainError::Display(format!("Failed to write {}: {}", path.display(), e))
        })?;

        self.frame_index += 1;

        #[cfg(debug_assertions)]
        tracing::debug!(
            "Presented frame {} ({} blobs) -> {}",
            self.frame_index,
            blobs.len(),
            path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColorClass, Rect};

    fn config_for(dir: &std::path::Path) -> DisplayConfig {
        DisplayConfig {
            output_dir: dir.to_string_lossy().into_owned(),
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn test_writes_numbered_pngs() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = PngDisplayAdapter::new(&config_for(tmp.path())).unwrap();

        let frame = Frame::new(vec![0u8; 32 * 32 * 3], 32, 32);
        let blob = Blob::new(Rect::new(4, 4, 10, 10), ColorClass::Blue, 100);

        sink.present(&frame, &[blob]).unwrap();
        sink.present(&frame, &[]).unwrap();

        assert!(tmp.path().join("frame_000000.png").exists());
        assert!(tmp.path().join("frame_000001.png").exists());
    }

    #[test]
    fn test_written_png_is_annotated() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = PngDisplayAdapter::new(&config_for(tmp.path())).unwrap();

        let frame = Frame::new(vec![0u8; 64 * 64 * 3], 64, 64);
        let blob = Blob::new(Rect::new(20, 20, 16, 16), ColorClass::Red, 256);
        sink.present(&frame, &[blob]).unwrap();

        let img = image::open(tmp.path().join("frame_000000.png"))
            .unwrap()
            .to_rgb8();
        assert_eq!(img.get_pixel(20, 20).0, [255, 0, 0]);
    }

    #[test]
    fn test_never_quits_by_itself() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = PngDisplayAdapter::new(&config_for(tmp.path())).unwrap();
        assert!(!sink.should_quit());
    }
}
