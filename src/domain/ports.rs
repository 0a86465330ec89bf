/// Port定義（Clean Architectureのインターフェース）
///
/// Domain層が外部実装に依存するための抽象trait。
/// Infrastructure層がこれらを実装し、Application層がDIで注入する。

use crate::domain::{Blob, DomainResult, Frame};

/// フレームソースポート: フレームの取得を抽象化
pub trait FrameSourcePort: Send + Sync {
    /// 次のフレームを取得する
    ///
    /// # Returns
    /// - `Ok(Some(Frame))`: フレームの取得成功
    /// - `Ok(None)`: ソースが枯渇（これ以上フレームは届かない）
    /// - `Err(DomainError)`: 取得失敗（再初期化で回復する可能性あり）
    fn next_frame(&mut self) -> DomainResult<Option<Frame>>;

    /// ソースを再初期化
    ///
    /// 取得エラーが続いた場合にリカバリロジックから呼び出される。
    fn reinitialize(&mut self) -> DomainResult<()>;

    /// ソースの情報を取得
    fn source_info(&self) -> SourceInfo;
}

/// フレームソース情報
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// フレーム幅（不定の場合は0）
    pub width: u32,
    /// フレーム高さ（不定の場合は0）
    pub height: u32,
    pub name: String,
}

/// 検出ポート: 1フレーム → ブロブ列の変換を抽象化
///
/// 実装は呼び出し間で履歴を保持しない純粋な変換であること。
/// 整形式フレームに対してはエラーを返さず、（空の可能性がある）
/// ブロブ列を必ず返す。
pub trait DetectPort: Send + Sync {
    /// フレームを処理して検出ブロブ列を返す
    ///
    /// # Arguments
    /// - `frame`: 処理対象のフレーム（BGR、3チャンネル）
    ///
    /// # Returns
    /// - `Ok(Vec<Blob>)`: 検出結果（Red → Green → Blue の順、クラス内は発見順）
    /// - `Err(DomainError::InvalidFrame)`: 不正なフレーム
    fn detect(&mut self, frame: &Frame) -> DomainResult<Vec<Blob>>;
}

/// 表示ポート: アノテーション済みフレームの出力を抽象化
pub trait DisplayPort: Send + Sync {
    /// フレームとブロブ列を受け取り、アノテーションを描画して提示する
    ///
    /// 描画はフレームのコピーに対して行われ、元フレームは変更されない。
    fn present(&mut self, frame: &Frame, blobs: &[Blob]) -> DomainResult<()>;

    /// 終了要求が観測されたか（フレームごとにポーリングされる）
    fn should_quit(&self) -> bool {
        false
    }
}
