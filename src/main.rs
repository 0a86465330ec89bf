use anyhow::Context;
use chromatrack::application::pipeline::{PipelineConfig, PipelineRunner};
use chromatrack::application::recovery::{RecoveryState, RecoveryStrategy};
use chromatrack::application::runtime_state::RuntimeState;
use chromatrack::domain::config::AppConfig;
use chromatrack::domain::ports::FrameSourcePort;
use chromatrack::infrastructure::color_detect::ColorBlobDetectAdapter;
use chromatrack::infrastructure::display::DisplaySelector;
use chromatrack::infrastructure::source::SourceSelector;
use chromatrack::logging::init_logging;
use std::path::PathBuf;
use std::time::Duration;

fn main() {
    // ログシステムの初期化（非同期ファイル出力）
    let log_dir = PathBuf::from("logs");
    let _guard = init_logging("info", false, Some(log_dir));
    // 注意: _guardはmain終了まで保持する必要がある（Dropでログスレッドが終了）

    tracing::info!("chromatrack starting...");

    // 初期化処理を実行
    match run() {
        Ok(_) => {
            tracing::info!("chromatrack terminated gracefully.");
        }
        Err(e) => {
            tracing::error!("Fatal error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// アプリケーションのメイン処理
fn run() -> anyhow::Result<()> {
    // 設定ファイルの読み込み（存在しない場合はデフォルト設定を使用）
    let config = match AppConfig::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("Loaded configuration from config.toml");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config.toml: {:?}, using defaults", e);
            AppConfig::default()
        }
    };

    // 設定の検証
    config.validate().context("invalid configuration")?;

    tracing::info!("Configuration validated successfully");
    tracing::info!(
        "Detect: min_blob_area={}, red=[{},{}] green=[{},{}] blue=[{},{}] (hue)",
        config.detect.min_blob_area,
        config.detect.red.h_min,
        config.detect.red.h_max,
        config.detect.green.h_min,
        config.detect.green.h_max,
        config.detect.blue.h_min,
        config.detect.blue.h_max,
    );

    // フレームソースの初期化
    let source = SourceSelector::from_config(&config.source)
        .context("failed to initialize frame source")?;
    let info = source.source_info();
    tracing::info!("Source initialized: {} ({}x{})", info.name, info.width, info.height);

    // 検出アダプタの初期化
    let detector = ColorBlobDetectAdapter::with_config(&config.detect);

    // 表示シンクの初期化
    let display = DisplaySelector::from_config(&config.display)
        .context("failed to initialize display sink")?;

    // 再初期化戦略の設定
    let recovery_strategy = RecoveryStrategy {
        consecutive_failure_threshold: config.source.max_consecutive_failures,
        initial_backoff: config.source.reinit_initial_delay(),
        max_backoff: config.source.reinit_max_delay(),
        max_cumulative_failure: Duration::from_secs(60),
    };
    let recovery = RecoveryState::new(recovery_strategy);

    // パイプライン設定
    let pipeline_config = PipelineConfig {
        stats_interval: config.pipeline.stats_interval(),
        drop_stale_frames: config.pipeline.drop_stale_frames,
    };

    // Ctrl-Cで停止要求を伝播
    let state = RuntimeState::new();
    {
        let state = state.clone();
        ctrlc::set_handler(move || {
            tracing::info!("Stop requested (Ctrl-C)");
            state.request_stop();
        })
        .context("failed to install Ctrl-C handler")?;
    }

    tracing::info!("Starting pipeline: Source -> Detect -> Display");

    // パイプラインの起動（ブロッキング）
    let runner = PipelineRunner::new(
        source,
        detector,
        display,
        pipeline_config,
        recovery,
        state,
    );

    runner.run()?;

    Ok(())
}
