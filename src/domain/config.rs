//! 設定管理
//!
//! TOML設定ファイルの読み込みとDomain型への変換。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{ColorClass, DomainError, DomainResult, HsvRange};

/// フレームソースの種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// 合成フレーム生成（決定的、デモ・テスト用）
    #[default]
    Synthetic,
    /// ディレクトリ内の画像ファイルをソート順に読み込み
    Images,
}

/// 表示シンクの種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// アノテーション済みフレームを連番PNGとして書き出し
    #[default]
    Png,
    /// 出力なし（ログのみ）
    Null,
}

/// アプリケーション設定のルート構造
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// フレームソース設定
    #[serde(default)]
    pub source: SourceConfig,
    /// 検出設定
    #[serde(default)]
    pub detect: DetectConfig,
    /// 表示設定
    #[serde(default)]
    pub display: DisplayConfig,
    /// パイプライン設定
    #[serde(default)]
    pub pipeline: PipelineTomlConfig,
}

/// フレームソース設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceConfig {
    /// ソースの種類
    ///
    /// 選択肢: "synthetic", "images"
    /// デフォルト: "synthetic"
    #[serde(default)]
    pub mode: SourceMode,

    /// 画像ディレクトリ（mode = "images" の場合のみ有効）
    ///
    /// 対応拡張子: png, jpg, jpeg, bmp。ファイル名のソート順で読み込む。
    #[serde(default = "SourceConfig::default_images_dir")]
    pub images_dir: String,

    /// 生成フレーム数（mode = "synthetic" の場合のみ有効）
    ///
    /// デフォルト: 60
    #[serde(default = "SourceConfig::default_frame_count")]
    pub frame_count: u32,

    /// 生成フレーム幅（mode = "synthetic" の場合のみ有効）
    #[serde(default = "SourceConfig::default_width")]
    pub width: u32,

    /// 生成フレーム高さ（mode = "synthetic" の場合のみ有効）
    #[serde(default = "SourceConfig::default_height")]
    pub height: u32,

    /// 連続取得エラー許容回数
    ///
    /// この回数を超えたら再初期化を実行
    /// デフォルト: 30回
    #[serde(default = "SourceConfig::default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// 再初期化時の初期待機時間（ミリ秒）
    ///
    /// デフォルト: 100ms
    #[serde(default = "SourceConfig::default_reinit_initial_delay_ms")]
    pub reinit_initial_delay_ms: u64,

    /// 再初期化時の最大待機時間（ミリ秒、指数バックオフの上限）
    ///
    /// デフォルト: 5000ms
    #[serde(default = "SourceConfig::default_reinit_max_delay_ms")]
    pub reinit_max_delay_ms: u64,
}

impl SourceConfig {
    /// デフォルトの生成フレーム数
    pub const DEFAULT_FRAME_COUNT: u32 = 60;
    /// デフォルトの生成フレームサイズ
    pub const DEFAULT_WIDTH: u32 = 640;
    pub const DEFAULT_HEIGHT: u32 = 480;
    /// デフォルトの連続エラー閾値
    pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 30;
    /// デフォルトの再初期化初期遅延（ミリ秒）
    pub const DEFAULT_REINIT_INITIAL_DELAY_MS: u64 = 100;
    /// デフォルトの再初期化最大遅延（ミリ秒）
    pub const DEFAULT_REINIT_MAX_DELAY_MS: u64 = 5000;

    fn default_images_dir() -> String {
        "frames".to_string()
    }
    fn default_frame_count() -> u32 {
        Self::DEFAULT_FRAME_COUNT
    }
    fn default_width() -> u32 {
        Self::DEFAULT_WIDTH
    }
    fn default_height() -> u32 {
        Self::DEFAULT_HEIGHT
    }
    fn default_max_consecutive_failures() -> u32 {
        Self::DEFAULT_MAX_CONSECUTIVE_FAILURES
    }
    fn default_reinit_initial_delay_ms() -> u64 {
        Self::DEFAULT_REINIT_INITIAL_DELAY_MS
    }
    fn default_reinit_max_delay_ms() -> u64 {
        Self::DEFAULT_REINIT_MAX_DELAY_MS
    }

    pub fn reinit_initial_delay(&self) -> Duration {
        Duration::from_millis(self.reinit_initial_delay_ms)
    }

    pub fn reinit_max_delay(&self) -> Duration {
        Duration::from_millis(self.reinit_max_delay_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            images_dir: Self::default_images_dir(),
            frame_count: Self::DEFAULT_FRAME_COUNT,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            max_consecutive_failures: Self::DEFAULT_MAX_CONSECUTIVE_FAILURES,
            reinit_initial_delay_ms: Self::DEFAULT_REINIT_INITIAL_DELAY_MS,
            reinit_max_delay_ms: Self::DEFAULT_REINIT_MAX_DELAY_MS,
        }
    }
}

/// 検出設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DetectConfig {
    /// 最小ブロブ面積（ピクセル数）
    ///
    /// 膨張後の連結領域の実測面積がこの値を「超える」場合のみブロブを出力する
    /// （ちょうど等しい場合は出力しない）。
    /// デフォルト: 300
    #[serde(default = "DetectConfig::default_min_blob_area")]
    pub min_blob_area: u32,

    /// 赤クラスのHSVレンジ
    #[serde(default = "DetectConfig::default_red_range")]
    pub red: HsvRangeConfig,

    /// 緑クラスのHSVレンジ
    #[serde(default = "DetectConfig::default_green_range")]
    pub green: HsvRangeConfig,

    /// 青クラスのHSVレンジ
    #[serde(default = "DetectConfig::default_blue_range")]
    pub blue: HsvRangeConfig,
}

impl DetectConfig {
    /// デフォルトの最小ブロブ面積（ピクセル）
    pub const DEFAULT_MIN_BLOB_AREA: u32 = 300;

    fn default_min_blob_area() -> u32 {
        Self::DEFAULT_MIN_BLOB_AREA
    }
    fn default_red_range() -> HsvRangeConfig {
        ColorClass::Red.default_range().into()
    }
    fn default_green_range() -> HsvRangeConfig {
        ColorClass::Green.default_range().into()
    }
    fn default_blue_range() -> HsvRangeConfig {
        ColorClass::Blue.default_range().into()
    }

    /// クラスに対応するレンジ設定を取得
    pub fn range_for(&self, class: ColorClass) -> HsvRange {
        match class {
            ColorClass::Red => self.red.clone().into(),
            ColorClass::Green => self.green.clone().into(),
            ColorClass::Blue => self.blue.clone().into(),
        }
    }
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            min_blob_area: Self::DEFAULT_MIN_BLOB_AREA,
            red: Self::default_red_range(),
            green: Self::default_green_range(),
            blue: Self::default_blue_range(),
        }
    }
}

/// HSVレンジ設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HsvRangeConfig {
    /// H（色相）の最小値
    ///
    /// OpenCV準拠: H [0-180]
    pub h_min: u8,

    /// H（色相）の最大値
    ///
    /// OpenCV準拠: H [0-180]
    pub h_max: u8,

    /// S（彩度）の最小値
    ///
    /// OpenCV準拠: S [0-255]
    pub s_min: u8,

    /// S（彩度）の最大値
    ///
    /// OpenCV準拠: S [0-255]
    pub s_max: u8,

    /// V（明度）の最小値
    ///
    /// OpenCV準拠: V [0-255]
    pub v_min: u8,

    /// V（明度）の最大値
    ///
    /// OpenCV準拠: V [0-255]
    pub v_max: u8,
}

impl From<HsvRangeConfig> for HsvRange {
    fn from(config: HsvRangeConfig) -> Self {
        HsvRange::new(
            config.h_min,
            config.h_max,
            config.s_min,
            config.s_max,
            config.v_min,
            config.v_max,
        )
    }
}

impl From<HsvRange> for HsvRangeConfig {
    fn from(range: HsvRange) -> Self {
        Self {
            h_min: range.h_min,
            h_max: range.h_max,
            s_min: range.s_min,
            s_max: range.s_max,
            v_min: range.v_min,
            v_max: range.v_max,
        }
    }
}

/// 表示設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DisplayConfig {
    /// 表示シンクの種類
    ///
    /// 選択肢: "png", "null"
    /// デフォルト: "png"
    #[serde(default)]
    pub mode: DisplayMode,

    /// PNG出力先ディレクトリ（mode = "png" の場合のみ有効）
    #[serde(default = "DisplayConfig::default_output_dir")]
    pub output_dir: String,

    /// バウンディングボックスの線幅（ピクセル）
    ///
    /// デフォルト: 2
    #[serde(default = "DisplayConfig::default_box_thickness")]
    pub box_thickness: u32,

    /// ラベル文字の拡大率（1 = 5x7ピクセルグリフ）
    ///
    /// デフォルト: 2
    #[serde(default = "DisplayConfig::default_label_scale")]
    pub label_scale: u32,
}

impl DisplayConfig {
    /// デフォルトの線幅（ピクセル）
    pub const DEFAULT_BOX_THICKNESS: u32 = 2;
    /// デフォルトのラベル拡大率
    pub const DEFAULT_LABEL_SCALE: u32 = 2;

    fn default_output_dir() -> String {
        "annotated".to_string()
    }
    fn default_box_thickness() -> u32 {
        Self::DEFAULT_BOX_THICKNESS
    }
    fn default_label_scale() -> u32 {
        Self::DEFAULT_LABEL_SCALE
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            output_dir: Self::default_output_dir(),
            box_thickness: Self::DEFAULT_BOX_THICKNESS,
            label_scale: Self::DEFAULT_LABEL_SCALE,
        }
    }
}

/// パイプライン設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PipelineTomlConfig {
    /// 統計情報の出力間隔（秒）
    #[serde(default = "PipelineTomlConfig::default_stats_interval_sec")]
    pub stats_interval_sec: u64,

    /// 古いフレームを破棄して常に最新のみ処理するか
    ///
    /// true の場合、下流が詰まっているあいだに届いたフレームは捨てられる
    /// （リアルタイムソース向け）。false の場合は全フレームを順に処理する。
    /// デフォルト: false
    #[serde(default)]
    pub drop_stale_frames: bool,
}

impl PipelineTomlConfig {
    pub const DEFAULT_STATS_INTERVAL_SEC: u64 = 10;

    fn default_stats_interval_sec() -> u64 {
        Self::DEFAULT_STATS_INTERVAL_SEC
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_sec)
    }
}

impl Default for PipelineTomlConfig {
    fn default() -> Self {
        Self {
            stats_interval_sec: Self::DEFAULT_STATS_INTERVAL_SEC,
            drop_stale_frames: false,
        }
    }
}

impl AppConfig {
    /// TOMLファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Configuration(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DomainError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// デフォルト設定をTOMLファイルに書き出す
    pub fn write_default<P: AsRef<Path>>(path: P) -> DomainResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| DomainError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DomainError::Configuration(format!("Failed to write config file: {}", e)))
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> DomainResult<()> {
        // 合成ソース寸法の検証
        if self.source.width == 0 || self.source.height == 0 {
            return Err(DomainError::Configuration(
                "Synthetic frame width and height must be greater than 0".to_string(),
            ));
        }

        // HSVレンジの検証（3クラスすべて）
        for (name, hsv) in [
            ("red", &self.detect.red),
            ("green", &self.detect.green),
            ("blue", &self.detect.blue),
        ] {
            if hsv.h_min > 180 || hsv.h_max > 180 || hsv.h_min > hsv.h_max {
                return Err(DomainError::Configuration(format!(
                    "Invalid HSV H range for {} (must be 0-180, min <= max)",
                    name
                )));
            }
            if hsv.s_min > hsv.s_max || hsv.v_min > hsv.v_max {
                return Err(DomainError::Configuration(format!(
                    "Invalid HSV S/V range for {} (min must be <= max)",
                    name
                )));
            }
        }

        // 表示設定の検証
        if self.display.box_thickness == 0 {
            return Err(DomainError::Configuration(
                "Box thickness must be greater than 0".to_string(),
            ));
        }
        if self.display.label_scale == 0 {
            return Err(DomainError::Configuration(
                "Label scale must be greater than 0".to_string(),
            ));
        }

        // 再初期化遅延の検証
        if self.source.reinit_initial_delay_ms == 0 {
            return Err(DomainError::Configuration(
                "Reinit initial delay must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.source.mode, SourceMode::Synthetic);
        assert_eq!(config.source.width, 640);
        assert_eq!(config.source.height, 480);
        assert_eq!(config.detect.min_blob_area, 300);
        assert_eq!(config.display.mode, DisplayMode::Png);
        assert_eq!(config.display.box_thickness, 2);
        assert_eq!(config.pipeline.stats_interval_sec, 10);
        assert!(!config.pipeline.drop_stale_frames);
    }

    #[test]
    fn test_default_ranges_match_palette() {
        // 設定のデフォルトは固定パレットの閾値とビット互換
        let config = DetectConfig::default();
        for class in ColorClass::ALL {
            assert_eq!(config.range_for(class), class.default_range());
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        // 不正な合成フレーム寸法
        config.source.width = 0;
        assert!(config.validate().is_err());

        config.source.width = 640;

        // 不正なHSV範囲
        config.detect.green.h_min = 200;
        assert!(config.validate().is_err());

        config.detect.green.h_min = 40;

        // 不正な線幅
        config.display.box_thickness = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hsv_range_conversion() {
        let hsv_config = HsvRangeConfig {
            h_min: 10,
            h_max: 20,
            s_min: 30,
            s_max: 40,
            v_min: 50,
            v_max: 60,
        };
        let hsv: HsvRange = hsv_config.into();
        assert_eq!(hsv.h_min, 10);
        assert_eq!(hsv.h_max, 20);

        let back: HsvRangeConfig = hsv.into();
        assert_eq!(back.v_max, 60);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        // セクションの一部だけ指定しても残りはデフォルトで補完される
        let toml = r#"
            [source]
            mode = "images"
            images_dir = "testdata"

            [detect]
            min_blob_area = 500

            [display]

            [pipeline]
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.source.mode, SourceMode::Images);
        assert_eq!(config.source.images_dir, "testdata");
        assert_eq!(config.source.frame_count, 60);
        assert_eq!(config.detect.min_blob_area, 500);
        assert_eq!(config.detect.red.h_min, 136);
        assert_eq!(config.display.mode, DisplayMode::Png);
    }

    #[test]
    fn test_full_toml_parses() {
        let toml = r#"
            [source]
            mode = "synthetic"
            images_dir = "frames"
            frame_count = 10
            width = 320
            height = 240
            max_consecutive_failures = 5
            reinit_initial_delay_ms = 50
            reinit_max_delay_ms = 1000

            [detect]
            min_blob_area = 300

            [detect.red]
            h_min = 136
            h_max = 180
            s_min = 87
            s_max = 255
            v_min = 111
            v_max = 255

            [detect.green]
            h_min = 40
            h_max = 100
            s_min = 100
            s_max = 255
            v_min = 50
            v_max = 255

            [detect.blue]
            h_min = 100
            h_max = 140
            s_min = 150
            s_max = 255
            v_min = 0
            v_max = 255

            [display]
            mode = "null"
            output_dir = "annotated"
            box_thickness = 2
            label_scale = 2

            [pipeline]
            stats_interval_sec = 10
            drop_stale_frames = true
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.source.width, 320);
        assert_eq!(config.display.mode, DisplayMode::Null);
        assert!(config.pipeline.drop_stale_frames);
    }

    #[test]
    fn test_config_loads() {
        // config.tomlが正常に読み込めることを確認
        let config = AppConfig::from_file("config.toml").expect("config.tomlが読み込めません");

        config
            .validate()
            .expect("設定値のバリデーションに失敗しました");
    }

    #[test]
    fn test_config_example_loads() {
        // config.toml.exampleが正常に読み込めることを確認
        let config = AppConfig::from_file("config.toml.example")
            .expect("config.toml.exampleが読み込めません");

        config
            .validate()
            .expect("設定値のバリデーションに失敗しました");
    }
}
