//! UIセッション
//!
//! 状態を所有し、イベントキューから1件ずつ取り出して処理する。
//! 推論はブロッキングスレッドで実行し、完了を1件のイベントとして戻す。

use crate::bindings::{AppState, BindingContext, Effect, Event, ReactiveBindings};
use crate::catalog::StyleCatalog;
use crate::config::Config;
use crate::error::{PipelineError, PipelineStage, Result, StyleTransferError};
use crate::pipeline::PipelineOrchestrator;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

pub struct Session {
    bindings: ReactiveBindings,
    ctx: BindingContext,
    orchestrator: Arc<PipelineOrchestrator>,
    state: AppState,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    snapshots: watch::Sender<AppState>,
}

/// UI側からイベントを送り、状態を観測するためのハンドル
#[derive(Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<Event>,
    snapshots: watch::Receiver<AppState>,
}

impl Session {
    pub fn new(catalog: StyleCatalog, orchestrator: PipelineOrchestrator) -> (Self, SessionHandle) {
        let ctx = BindingContext {
            catalog,
            resolver: orchestrator.resolver().clone(),
        };
        let bindings = ReactiveBindings;
        let mut state = AppState::initial(&ctx.catalog);
        bindings.prime(&ctx, &mut state);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(state.clone());

        let handle = SessionHandle {
            events: events_tx.clone(),
            snapshots: snapshot_rx,
        };
        let session = Self {
            bindings,
            ctx,
            orchestrator: Arc::new(orchestrator),
            state,
            events_tx,
            events_rx,
            snapshots,
        };
        (session, handle)
    }

    pub fn from_config(config: &Config) -> (Self, SessionHandle) {
        let catalog = StyleCatalog::builtin(config.layout().style_images);
        Self::new(catalog, PipelineOrchestrator::from_config(config))
    }

    /// Shutdown を受け取るまでイベントを処理する
    pub async fn run(mut self) -> AppState {
        while let Some(event) = self.events_rx.recv().await {
            if matches!(event, Event::Shutdown) {
                break;
            }
            let effects = self.bindings.dispatch(&self.ctx, &mut self.state, event);
            self.snapshots.send_replace(self.state.clone());

            for effect in effects {
                self.spawn_effect(effect);
            }
        }
        log::debug!("session stopped");
        self.state
    }

    fn spawn_effect(&self, effect: Effect) {
        match effect {
            Effect::StartPipeline {
                generation,
                style_id,
                source,
            } => {
                let orchestrator = Arc::clone(&self.orchestrator);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let joined =
                        tokio::task::spawn_blocking(move || orchestrator.run(&style_id, &source)).await;
                    let outcome = joined.unwrap_or_else(|e| {
                        Err(PipelineError::new(
                            PipelineStage::Inference,
                            StyleTransferError::Engine(format!("inference task aborted: {}", e)),
                        ))
                    });
                    // セッション終了後なら捨てる
                    let _ = events.send(Event::SubmitCompleted { generation, outcome });
                });
            }
        }
    }
}

impl SessionHandle {
    pub fn send(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| StyleTransferError::SessionClosed)
    }

    pub fn snapshot(&self) -> AppState {
        AppState::clone(&self.snapshots.borrow())
    }

    /// 最新の状態を取得し、既読にする（次の `changed` はこれ以降の更新を待つ）
    pub fn latest(&mut self) -> AppState {
        AppState::clone(&self.snapshots.borrow_and_update())
    }

    /// 条件を満たす状態になるまで待つ
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Result<AppState>
    where
        F: FnMut(&AppState) -> bool,
    {
        let state = self
            .snapshots
            .wait_for(|s| predicate(s))
            .await
            .map_err(|_| StyleTransferError::SessionClosed)?;
        Ok(AppState::clone(&state))
    }

    /// 次の状態更新を待つ
    pub async fn changed(&mut self) -> Result<AppState> {
        self.snapshots
            .changed()
            .await
            .map_err(|_| StyleTransferError::SessionClosed)?;
        Ok(AppState::clone(&self.snapshots.borrow_and_update()))
    }
}
