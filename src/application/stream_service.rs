// Stream service - cancellable ingestion, render and metrics loops
use crate::application::render_service::RenderService;
use crate::application::sample_source::SampleSource;
use crate::application::state::DashboardState;
use crate::infrastructure::memory::MemoryProbe;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A running stream session: the ingestion, render and metrics loops plus the
/// token that tears them down. Stopping (or dropping) the session cancels the
/// token; every loop observes it before touching state again.
pub struct StreamSession {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl StreamSession {
    pub fn stop(&self) {
        self.cancel.cancel();
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct StreamService {
    state: Arc<DashboardState>,
    source: Arc<dyn SampleSource>,
    renderer: Arc<RenderService>,
    memory: Option<MemoryProbe>,
    frame_interval: Duration,
    session: Mutex<Option<StreamSession>>,
}

impl StreamService {
    pub fn new(
        state: Arc<DashboardState>,
        source: Arc<dyn SampleSource>,
        renderer: Arc<RenderService>,
        frame_rate_hz: u32,
    ) -> Self {
        Self {
            state,
            source,
            renderer,
            // Probed once; absent capability stays absent for the session
            memory: MemoryProbe::probe(),
            frame_interval: Duration::from_secs(1) / frame_rate_hz.max(1),
            session: Mutex::new(None),
        }
    }

    /// Starts the session loops. Returns false if one is already running.
    /// Restarting continues from the buffer's last timestamp.
    pub fn start(&self) -> bool {
        let mut session = self.session.lock();
        if session.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let tasks = vec![
            self.spawn_ingestion_loop(cancel.clone()),
            self.spawn_render_loop(cancel.clone()),
            self.spawn_metrics_loop(cancel.clone()),
        ];
        *session = Some(StreamSession { cancel, tasks });
        tracing::info!("stream session started");
        true
    }

    /// Cancels all session loops deterministically. Returns false if no
    /// session was running.
    pub fn stop(&self) -> bool {
        match self.session.lock().take() {
            Some(session) => {
                session.stop();
                tracing::info!("stream session stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.session.lock().is_some()
    }

    fn spawn_ingestion_loop(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let state = self.state.clone();
        let source = self.source.clone();
        tokio::spawn(async move {
            loop {
                // Re-read the preset each tick so a switch takes effect on
                // the next tick without dropping in-flight samples.
                let interval = state.preset().ingest_interval();
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("ingestion loop cancelled");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        let last = state
                            .last_timestamp()
                            .unwrap_or_else(|| Utc::now().timestamp_millis());
                        match source.next(last, None).await {
                            Ok(sample) => state.append_live(sample),
                            Err(err) => tracing::warn!("sample generation failed: {err}"),
                        }
                    }
                }
            }
        })
    }

    fn spawn_render_loop(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let renderer = self.renderer.clone();
        let frame_interval = self.frame_interval;
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(frame_interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("render loop cancelled");
                        break;
                    }
                    _ = tick.tick() => {
                        if let Err(err) = renderer.render_frame() {
                            tracing::warn!("frame render failed: {err}");
                        }
                    }
                }
            }
        })
    }

    fn spawn_metrics_loop(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let state = self.state.clone();
        let memory = self.memory.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_millis(1000));
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("metrics loop cancelled");
                        break;
                    }
                    _ = tick.tick() => {
                        let reading = match &memory {
                            Some(probe) => probe.read(),
                            None => crate::domain::metrics::MemoryReading::Unavailable,
                        };
                        state.record_memory(reading);
                    }
                }
            }
        })
    }
}
