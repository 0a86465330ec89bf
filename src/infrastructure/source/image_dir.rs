/// 画像ディレクトリフレームソースアダプタ
///
/// ディレクトリ内の画像ファイルをファイル名のソート順に読み込み、
/// BGRフレームとして1枚ずつ供給する。録画済みフレーム列の再生用。

use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult, Frame, FrameSourcePort, SourceInfo};

/// 対応する画像拡張子（小文字比較）
const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// 画像ディレクトリフレームソースアダプタ
pub struct ImageDirSourceAdapter {
    dir: PathBuf,
    files: Vec<PathBuf>,
    next_index: usize,
}

impl ImageDirSourceAdapter {
    /// ディレクトリを走査してソースを作成
    ///
    /// # Returns
    /// - `Err(DomainError::Initialization)`: ディレクトリが読めない場合
    pub fn new<P: AsRef<Path>>(dir: P) -> DomainResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        let files = Self::scan(&dir)?;

        tracing::info!(
            "Image source: {} files under {}",
            files.len(),
            dir.display()
        );

        Ok(Self {
            dir,
            files,
            next_index: 0,
        })
    }

    /// 対応拡張子のファイルをソート順で列挙
    fn scan(dir: &Path) -> DomainResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            DomainError::Initialization(format!("Failed to read {}: {}", dir.display(), e))
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();

        // ファイル名順で決定的に読み込む
        files.sort();
        Ok(files)
    }

    /// 画像ファイルを読み込んでBGRフレームに変換
    fn load_frame(path: &Path) -> DomainResult<Frame> {
        let img = image::open(path)
            .map_err(|e| DomainError::Source(format!("Failed to decode {}: {}", path.display(), e)))?
            .to_rgb8();

        let (width, height) = img.dimensions();

        // RGB → BGR変換
        let mut data = Vec::with_capacity((width * height * Frame::CHANNELS) as usize);
        for px in img.as_raw().chunks_exact(3) {
            data.push(px[2]); // B
            data.push(px[1]); // G
            data.push(px[0]); // R
        }

        Ok(Frame::new(data, width, height))
    }
}

impl FrameSourcePort for ImageDirSourceAdapter {
    fn next_frame(&mut self) -> DomainResult<Option<Frame>> {
        let Some(path) = self.files.get(self.next_index) else {
            return Ok(None);
        };

        let frame = Self::load_frame(path)?;
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn reinitialize(&mut self) -> DomainResult<()> {
        // ディレクトリを再走査して先頭から読み直す
        self.files = Self::scan(&self.dir)?;
        self.next_index = 0;
        Ok(())
    }

    fn source_info(&self) -> SourceInfo {
        SourceInfo {
            width: 0,
            height: 0,
            name: format!("images ({})", self.dir.display()),
        }
    }
}
