//! パイプライン制御モジュール
//!
//! Source / Detect / Display の3スレッド構成でパイプラインを制御します。
//! ソースが枯渇（`Ok(None)`）するか停止要求が入るまで動き続け、
//! どの段が止まってもチャンネル切断で全体が綺麗に終了する。

use crate::application::recovery::RecoveryState;
use crate::application::runtime_state::RuntimeState;
use crate::application::stats::{StatKind, StatsCollector};
use crate::domain::{
    ports::{DetectPort, DisplayPort, FrameSourcePort},
    types::{Blob, Frame},
    DomainResult,
};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// パイプライン設定
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 統計出力間隔
    pub stats_interval: Duration,
    /// 古いフレームを破棄して常に最新のみ処理するか
    pub drop_stale_frames: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stats_interval: Duration::from_secs(10),
            drop_stale_frames: false,
        }
    }
}

/// フレームとタイムスタンプのペア
#[derive(Debug, Clone)]
pub struct TimestampedFrame {
    pub frame: Frame,
    pub captured_at: Instant,
}

/// 検出結果とタイムスタンプのペア
///
/// アノテーション描画は下流（表示段）の責務なので、元フレームを
/// そのまま持ち回す。
#[derive(Debug, Clone)]
pub struct TimestampedDetection {
    pub frame: Frame,
    pub blobs: Vec<Blob>,
    pub captured_at: Instant,
    pub processed_at: Instant,
}

/// パイプライン実行コンテキスト
pub struct PipelineRunner<S, D, P>
where
    S: FrameSourcePort,
    D: DetectPort,
    P: DisplayPort,
{
    source: Arc<Mutex<S>>,
    detector: Arc<Mutex<D>>,
    display: Arc<Mutex<P>>,
    config: PipelineConfig,
    recovery: RecoveryState,
    stats: StatsCollector,
    state: RuntimeState,
}

impl<S, D, P> PipelineRunner<S, D, P>
where
    S: FrameSourcePort + 'static,
    D: DetectPort + 'static,
    P: DisplayPort + 'static,
{
    /// 新しいPipelineRunnerを作成
    pub fn new(
        source: S,
        detector: D,
        display: P,
        config: PipelineConfig,
        recovery: RecoveryState,
        state: RuntimeState,
    ) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            detector: Arc::new(Mutex::new(detector)),
            display: Arc::new(Mutex::new(display)),
            stats: StatsCollector::new(config.stats_interval),
            config,
            recovery,
            state,
        }
    }

    /// パイプラインを起動（ブロッキング）
    ///
    /// # Returns
    /// ソース枯渇・停止要求・致命的エラーのいずれかで戻る
    pub fn run(mut self) -> DomainResult<()> {
        let (frame_tx, frame_rx) = bounded::<TimestampedFrame>(1);
        let (det_tx, det_rx) = bounded::<TimestampedDetection>(1);

        let drop_stale = self.config.drop_stale_frames;

        // Source Thread
        let source_handle = {
            let source = Arc::clone(&self.source);
            let state = self.state.clone();
            let recovery = self.recovery;
            std::thread::spawn(move || {
                Self::source_thread(source, frame_tx, state, recovery, drop_stale);
            })
        };

        // Detect Thread
        let detect_handle = {
            let detector = Arc::clone(&self.detector);
            std::thread::spawn(move || {
                Self::detect_thread(detector, frame_rx, det_tx, drop_stale);
            })
        };

        // Display段（メインスレッドで実行）
        Self::display_loop(
            Arc::clone(&self.display),
            det_rx,
            &self.state,
            &mut self.stats,
        );

        // 上流スレッドの終了を待つ
        self.state.request_stop();
        let _ = source_handle.join();
        let _ = detect_handle.join();

        tracing::info!(
            "Pipeline finished: {} blobs total",
            self.stats.total_blobs()
        );

        Ok(())
    }

    /// Sourceスレッドのメインループ
    fn source_thread(
        source: Arc<Mutex<S>>,
        tx: Sender<TimestampedFrame>,
        state: RuntimeState,
        mut recovery: RecoveryState,
        drop_stale: bool,
    ) {
        while state.is_running() {
            let captured_at = Instant::now();

            let result = {
                let mut guard = source.lock().unwrap();
                guard.next_frame()
            };

            match result {
                Ok(Some(frame)) => {
                    recovery.record_success();

                    let timestamped = TimestampedFrame { frame, captured_at };
                    if drop_stale {
                        Self::send_latest_only(&tx, timestamped);
                    } else if tx.send(timestamped).is_err() {
                        // 下流が終了済み
                        break;
                    }
                }
                Ok(None) => {
                    #[cfg(debug_assertions)]
                    tracing::info!("Frame source exhausted");
                    break;
                }
                Err(e) => {
                    #[cfg(debug_assertions)]
                    tracing::warn!("Source error: {:?}", e);
                    #[cfg(not(debug_assertions))]
                    let _ = e;

                    if recovery.is_cumulative_failure_exceeded() {
                        #[cfg(debug_assertions)]
                        tracing::error!("Cumulative source failure exceeded, giving up");
                        break;
                    }

                    if recovery.record_failure() {
                        recovery.record_reinitialization_attempt();
                        std::thread::sleep(recovery.current_backoff());

                        let reinit = {
                            let mut guard = source.lock().unwrap();
                            guard.reinitialize()
                        };
                        if let Err(_e) = reinit {
                            #[cfg(debug_assertions)]
                            tracing::warn!("Source reinitialization failed: {:?}", _e);
                        }
                    } else {
                        std::thread::sleep(Duration::from_millis(10));
                    }
                }
            }
        }
    }

    /// Detectスレッドのメインループ
    fn detect_thread(
        detector: Arc<Mutex<D>>,
        rx: Receiver<TimestampedFrame>,
        tx: Sender<TimestampedDetection>,
        drop_stale: bool,
    ) {
        while let Ok(timestamped) = rx.recv() {
            let result = {
                let mut guard = detector.lock().unwrap();
                guard.detect(&timestamped.frame)
            };

            match result {
                Ok(blobs) => {
                    let detection = TimestampedDetection {
                        frame: timestamped.frame,
                        blobs,
                        captured_at: timestamped.captured_at,
                        processed_at: Instant::now(),
                    };
                    if drop_stale {
                        Self::send_latest_only(&tx, detection);
                    } else if tx.send(detection).is_err() {
                        break;
                    }
                }
                Err(_e) => {
                    // 不正フレームはスキップして次を待つ
                    #[cfg(debug_assertions)]
                    tracing::error!("Detect error: {:?}", _e);
                }
            }
        }
    }

    /// Display段（メインスレッド）
    fn display_loop(
        display: Arc<Mutex<P>>,
        rx: Receiver<TimestampedDetection>,
        state: &RuntimeState,
        stats: &mut StatsCollector,
    ) {
        while state.is_running() {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(detection) => {
                    let present_start = Instant::now();

                    let (present_result, quit) = {
                        let mut guard = display.lock().unwrap();
                        let result = guard.present(&detection.frame, &detection.blobs);
                        (result, guard.should_quit())
                    };

                    if let Err(_e) = present_result {
                        #[cfg(debug_assertions)]
                        tracing::error!("Display error: {:?}", _e);
                    }

                    // 統計記録
                    let now = Instant::now();
                    stats.record_frame();
                    stats.record_blobs(detection.blobs.len());
                    stats.record_duration(
                        StatKind::Detect,
                        detection.processed_at.duration_since(detection.captured_at),
                    );
                    stats.record_duration(StatKind::Display, now.duration_since(present_start));
                    stats.record_duration(
                        StatKind::EndToEnd,
                        now.duration_since(detection.captured_at),
                    );

                    // 定期的に統計出力
                    if stats.should_report() {
                        stats.report_and_reset();
                    }

                    // 表示側の終了要求（キー入力相当）をポーリング
                    if quit {
                        state.request_stop();
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    // 停止要求の確認のため定期的に起きる
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    break;
                }
            }
        }
    }

    /// 最新のみ上書きポリシーで送信
    ///
    /// キューが満杯の場合は今回の値を捨てる（受信側は常に最新に近い値を処理する）。
    fn send_latest_only<T>(tx: &Sender<T>, value: T) {
        match tx.try_send(value) {
            Ok(_) => {}
            Err(TrySendError::Full(_)) => {
                // キューが満杯 - 今回の値は破棄
            }
            Err(TrySendError::Disconnected(_)) => {
                // Channel closed
            }
        }
    }
}
