//! UIイベント → 表示更新のルール表
//!
//! 各ルールは (トリガー, 読む値, 書く表示欄, 変換) の組。
//! イベントはまず選択状態を更新し（transition）、次に該当トリガーの
//! ルールを表の順に実行する。推論の起動は Effect として呼び出し側に返す。

use crate::catalog::StyleCatalog;
use crate::error::PipelineError;
use crate::preview::{load_preview, Preview};
use crate::resolver::ImageSourceResolver;
use std::path::PathBuf;
use style_transfer_common::{
    content_label, ContentSource, Error as CatalogError, PipelineResult, StyleOption, UploadHandle,
};

/// UIから届くイベント
#[derive(Debug)]
pub enum Event {
    /// コンテンツ画像のドロップダウン値（"custom" を含む）
    SourceSelected(String),
    StyleSelected(String),
    FileUploaded(UploadHandle),
    SubmitPressed,
    /// バックグラウンド実行の完了通知
    SubmitCompleted {
        generation: u64,
        outcome: Result<PipelineResult, PipelineError>,
    },
    CancelSubmit,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    SourceChanged,
    StyleChanged,
    FileUploaded,
    SubmitPressed,
    SubmitCompleted,
    SubmitCancelled,
}

impl Event {
    pub fn trigger(&self) -> Option<Trigger> {
        match self {
            Event::SourceSelected(_) => Some(Trigger::SourceChanged),
            Event::StyleSelected(_) => Some(Trigger::StyleChanged),
            Event::FileUploaded(_) => Some(Trigger::FileUploaded),
            Event::SubmitPressed => Some(Trigger::SubmitPressed),
            Event::SubmitCompleted { .. } => Some(Trigger::SubmitCompleted),
            Event::CancelSubmit => Some(Trigger::SubmitCancelled),
            Event::Shutdown => None,
        }
    }
}

/// ルールが読む値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SelectedSource,
    SelectedStyle,
    UploadHandle,
    Phase,
    /// キャンセル後もまだ動いている実行
    Running,
    Outcome,
}

/// ルールが書く表示欄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    UploadVisibility,
    InputPreview,
    StylePreview,
    OutputImage,
    Download,
    Notification,
    Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastResult {
    Success(PipelineResult),
    Error { message: String },
}

/// 選択状態（単一のインスタンスをセッションが所有する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub selected_style: StyleOption,
    pub selected_source: ContentSource,
    pub last_result: Option<LastResult>,
    pub phase: Phase,
}

/// 表示欄の内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub upload_visible: bool,
    pub input_preview: Option<Preview>,
    pub style_preview: Option<Preview>,
    pub output_image: Option<PathBuf>,
    pub download: Option<PathBuf>,
    pub notification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub ui: UiState,
    pub view: ViewState,
    /// 実行ごとに増える番号（古い完了通知を捨てるため）
    pub generation: u64,
    /// エンジンで実行中の世代。キャンセルしても完了通知が届くまで残る
    pub running: Option<u64>,
}

impl AppState {
    /// 先頭スタイル・先頭カタログ画像で初期化
    pub fn initial(catalog: &StyleCatalog) -> Self {
        let selected_style = catalog
            .default_style()
            .cloned()
            .unwrap_or_else(|| StyleOption::new("", ""));
        let first_content = style_transfer_common::builtin_contents()
            .into_iter()
            .next()
            .map(|c| c.file_name)
            .unwrap_or_default();

        Self {
            ui: UiState {
                selected_style,
                selected_source: ContentSource::from_choice(first_content),
                last_result: None,
                phase: Phase::Idle,
            },
            view: ViewState::default(),
            generation: 0,
            running: None,
        }
    }
}

/// 推論の起動依頼
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartPipeline {
        generation: u64,
        style_id: String,
        source: ContentSource,
    },
}

/// ルールが参照する外部コンポーネント
#[derive(Debug, Clone)]
pub struct BindingContext {
    pub catalog: StyleCatalog,
    pub resolver: ImageSourceResolver,
}

type Transform = fn(&BindingContext, &Event, &mut AppState) -> Option<Effect>;

pub struct Rule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub reads: &'static [Field],
    pub writes: &'static [Surface],
    transform: Transform,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish()
    }
}

const RULES: &[Rule] = &[
    Rule {
        name: "upload-visibility",
        trigger: Trigger::SourceChanged,
        reads: &[Field::SelectedSource],
        writes: &[Surface::UploadVisibility],
        transform: upload_visibility,
    },
    Rule {
        name: "input-preview-from-source",
        trigger: Trigger::SourceChanged,
        reads: &[Field::SelectedSource],
        writes: &[Surface::InputPreview, Surface::Notification],
        transform: input_preview_from_source,
    },
    Rule {
        name: "style-preview",
        trigger: Trigger::StyleChanged,
        reads: &[Field::SelectedStyle],
        writes: &[Surface::StylePreview, Surface::Notification],
        transform: style_preview,
    },
    Rule {
        name: "input-preview-from-upload",
        trigger: Trigger::FileUploaded,
        reads: &[Field::UploadHandle],
        writes: &[Surface::InputPreview, Surface::Notification],
        transform: input_preview_from_upload,
    },
    Rule {
        name: "submit",
        trigger: Trigger::SubmitPressed,
        reads: &[
            Field::SelectedStyle,
            Field::SelectedSource,
            Field::Phase,
            Field::Running,
        ],
        writes: &[Surface::Phase, Surface::Notification],
        transform: submit,
    },
    Rule {
        name: "submit-result",
        trigger: Trigger::SubmitCompleted,
        reads: &[Field::Outcome, Field::Phase, Field::Running],
        writes: &[
            Surface::OutputImage,
            Surface::Download,
            Surface::Notification,
            Surface::Phase,
        ],
        transform: submit_result,
    },
    Rule {
        name: "submit-cancel",
        trigger: Trigger::SubmitCancelled,
        reads: &[Field::Phase],
        writes: &[Surface::Phase, Surface::Notification],
        transform: submit_cancel,
    },
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ReactiveBindings;

impl ReactiveBindings {
    pub fn rules(&self) -> &'static [Rule] {
        RULES
    }

    pub fn rules_for(&self, trigger: Trigger) -> impl Iterator<Item = &'static Rule> {
        RULES.iter().filter(move |r| r.trigger == trigger)
    }

    /// 指定の表示欄を書き換えるルール
    pub fn writers_of(&self, surface: Surface) -> impl Iterator<Item = &'static Rule> {
        RULES.iter().filter(move |r| r.writes.contains(&surface))
    }

    /// 初期選択に対してプレビュー系ルールを一度実行する
    pub fn prime(&self, ctx: &BindingContext, state: &mut AppState) {
        state.view.notification = None;
        let style = Event::StyleSelected(state.ui.selected_style.id.clone());
        let source = Event::SourceSelected(state.ui.selected_source.choice().to_string());
        for event in [style, source] {
            if let Some(trigger) = event.trigger() {
                self.run_rules(ctx, trigger, &event, state);
            }
        }
    }

    /// イベントを1件処理する。呼び出し側は1件ずつ直列に呼ぶこと。
    pub fn dispatch(&self, ctx: &BindingContext, state: &mut AppState, event: Event) -> Vec<Effect> {
        let Some(trigger) = event.trigger() else {
            return Vec::new();
        };
        if !transition(ctx, state, &event) {
            return Vec::new();
        }
        self.run_rules(ctx, trigger, &event, state)
    }

    fn run_rules(
        &self,
        ctx: &BindingContext,
        trigger: Trigger,
        event: &Event,
        state: &mut AppState,
    ) -> Vec<Effect> {
        self.rules_for(trigger)
            .filter_map(|rule| {
                log::debug!("rule {} <- {:?}", rule.name, trigger);
                (rule.transform)(ctx, event, &mut *state)
            })
            .collect()
    }
}

/// 選択状態の更新。false ならルールを実行しない（変化なし・無効な値）。
/// 選択が変わったら前の通知は消す。
fn transition(ctx: &BindingContext, state: &mut AppState, event: &Event) -> bool {
    match event {
        Event::SourceSelected(choice) => {
            if state.ui.selected_source.choice() == choice {
                return false;
            }
            if content_label(choice).is_none() {
                state.view.notification = Some(CatalogError::UnknownContent(choice.clone()).to_string());
                return false;
            }
            state.ui.selected_source = ContentSource::from_choice(choice);
            state.view.notification = None;
            true
        }
        Event::StyleSelected(style_id) => {
            if state.ui.selected_style.id == *style_id {
                return false;
            }
            match ctx.catalog.get(style_id) {
                Some(style) => {
                    state.ui.selected_style = style.clone();
                    state.view.notification = None;
                    true
                }
                None => {
                    state.view.notification = Some(CatalogError::UnknownStyle(style_id.clone()).to_string());
                    false
                }
            }
        }
        Event::FileUploaded(handle) => {
            // アップロード欄は custom 選択時のみ表示される
            if !state.ui.selected_source.is_custom() {
                log::debug!("upload ignored, source is {}", state.ui.selected_source.choice());
                return false;
            }
            state.ui.selected_source = ContentSource::Custom(Some(handle.clone()));
            state.view.notification = None;
            true
        }
        _ => true,
    }
}

fn upload_visibility(_: &BindingContext, _: &Event, state: &mut AppState) -> Option<Effect> {
    state.view.upload_visible = state.ui.selected_source.is_custom();
    None
}

fn input_preview_from_source(ctx: &BindingContext, _: &Event, state: &mut AppState) -> Option<Effect> {
    state.view.input_preview = match &state.ui.selected_source {
        ContentSource::Catalog(name) => {
            match ctx.resolver.catalog_path(name).and_then(|p| load_preview(&p)) {
                Ok(preview) => Some(preview),
                Err(e) => {
                    state.view.notification = Some(e.to_string());
                    None
                }
            }
        }
        ContentSource::Custom(_) => None,
    };
    None
}

fn style_preview(ctx: &BindingContext, _: &Event, state: &mut AppState) -> Option<Effect> {
    let style_id = state.ui.selected_style.id.clone();
    state.view.style_preview = match ctx
        .catalog
        .preview_path_for(&style_id)
        .and_then(|p| load_preview(&p))
    {
        Ok(preview) => Some(preview),
        Err(e) => {
            state.view.notification = Some(e.to_string());
            None
        }
    };
    None
}

fn input_preview_from_upload(_: &BindingContext, event: &Event, state: &mut AppState) -> Option<Effect> {
    let Event::FileUploaded(handle) = event else {
        return None;
    };
    state.view.input_preview = match load_preview(&handle.path) {
        Ok(preview) => Some(preview),
        Err(e) => {
            state.view.notification = Some(e.to_string());
            None
        }
    };
    None
}

fn submit(_: &BindingContext, _: &Event, state: &mut AppState) -> Option<Effect> {
    // 実行中の再送信は拒否（キューイングしない）。キャンセル済みでもエンジンが
    // 動いている間は同じ扱い
    if state.ui.phase == Phase::Processing || state.running.is_some() {
        state.view.notification = Some(crate::error::StyleTransferError::Busy.to_string());
        return None;
    }

    state.generation += 1;
    state.running = Some(state.generation);
    state.ui.phase = Phase::Processing;
    state.view.notification = None;

    Some(Effect::StartPipeline {
        generation: state.generation,
        style_id: state.ui.selected_style.id.clone(),
        source: state.ui.selected_source.clone(),
    })
}

fn submit_result(_: &BindingContext, event: &Event, state: &mut AppState) -> Option<Effect> {
    let Event::SubmitCompleted { generation, outcome } = event else {
        return None;
    };
    if state.running == Some(*generation) {
        state.running = None;
    }
    if state.ui.phase != Phase::Processing || *generation != state.generation {
        log::debug!("stale completion discarded (generation {})", generation);
        return None;
    }

    state.ui.phase = Phase::Idle;
    match outcome {
        Ok(result) => {
            state.view.output_image = Some(result.output_image_path.clone());
            state.view.download = Some(result.output_image_path.clone());
            state.view.notification = None;
            state.ui.last_result = Some(LastResult::Success(result.clone()));
        }
        Err(e) => {
            // 前回の出力はそのまま残す
            let message = e.user_message();
            state.view.notification = Some(message.clone());
            state.ui.last_result = Some(LastResult::Error { message });
        }
    }
    None
}

fn submit_cancel(_: &BindingContext, _: &Event, state: &mut AppState) -> Option<Effect> {
    if state.ui.phase != Phase::Processing {
        return None;
    }
    // 実行中のタスクは止めず、完了通知を無効化する。running は完了まで残る
    state.generation += 1;
    state.ui.phase = Phase::Idle;
    state.view.notification = Some("style transfer cancelled".into());
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_trigger_has_a_rule() {
        let bindings = ReactiveBindings;
        for trigger in [
            Trigger::SourceChanged,
            Trigger::StyleChanged,
            Trigger::FileUploaded,
            Trigger::SubmitPressed,
            Trigger::SubmitCompleted,
            Trigger::SubmitCancelled,
        ] {
            assert!(bindings.rules_for(trigger).next().is_some(), "{:?}", trigger);
        }
    }

    #[test]
    fn test_source_change_rules_in_table_order() {
        let names: Vec<&str> = ReactiveBindings
            .rules_for(Trigger::SourceChanged)
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["upload-visibility", "input-preview-from-source"]);
    }

    #[test]
    fn test_input_preview_writers() {
        let names: Vec<&str> = ReactiveBindings
            .writers_of(Surface::InputPreview)
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["input-preview-from-source", "input-preview-from-upload"]);
    }

    #[test]
    fn test_shutdown_has_no_trigger() {
        assert!(Event::Shutdown.trigger().is_none());
    }
}
