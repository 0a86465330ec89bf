/// エラー型定義
///
/// Domain層の統一エラー型。thiserrorを使用して型安全なエラー処理を提供します。
///
/// # 設計方針
/// - unwrap()の使用を禁止し、明示的なエラーハンドリングを強制
/// - Result型でエラー伝播を明示化
/// - 不正な入力フレームは検出結果を黙って歪めず、InvalidFrameで明示的に拒否

use thiserror::Error;

/// Domain層の統一エラー型
#[derive(Error, Debug)]
pub enum DomainError {
    /// フレームソース関連のエラー
    #[error("Source error: {0}")]
    Source(String),

    /// 処理（画像処理）関連のエラー
    #[error("Process error: {0}")]
    Process(String),

    /// 表示（アノテーション出力）関連のエラー
    #[error("Display error: {0}")]
    Display(String),

    /// 設定関連のエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 不正なフレーム（チャンネル数・寸法・バッファ長の不整合）
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// 初期化エラー
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// その他のエラー
    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Domain層の統一Result型
pub type DomainResult<T> = Result<T, DomainError>;
