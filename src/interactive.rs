//! 対話式スタイル変換
//!
//! ターミナル上のメニューからイベントを送り、セッションの状態を表示する。

use crate::bindings::{AppState, Event, LastResult, Phase};
use crate::config::Config;
use crate::error::{Result, StyleTransferError};
use crate::session::{Session, SessionHandle};
use dialoguer::{Input, Select};
use style_transfer_common::{builtin_contents, builtin_styles, UploadHandle};

/// メニュー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    SelectStyle,
    SelectContent,
    Upload,
    Submit,
    Cancel,
    Status,
    Quit,
}

impl MenuAction {
    fn label(&self) -> &'static str {
        match self {
            MenuAction::SelectStyle => "🎨 スタイルを選択",
            MenuAction::SelectContent => "🖼  コンテンツ画像を選択",
            MenuAction::Upload => "📁 画像をアップロード",
            MenuAction::Submit => "✨ スタイル変換を実行",
            MenuAction::Cancel => "⏹ 実行中の変換をキャンセル",
            MenuAction::Status => "🔄 状態を表示",
            MenuAction::Quit => "終了",
        }
    }
}

/// 表示中の状態に応じたメニュー
///
/// アップロードは custom 選択時のみ。実行中は送信の代わりにキャンセルを出す。
fn menu_for(state: &AppState) -> Vec<MenuAction> {
    let mut actions = vec![MenuAction::SelectStyle, MenuAction::SelectContent];
    if state.view.upload_visible {
        actions.push(MenuAction::Upload);
    }
    if state.ui.phase == Phase::Processing {
        actions.push(MenuAction::Cancel);
        actions.push(MenuAction::Status);
    } else {
        actions.push(MenuAction::Submit);
    }
    actions.push(MenuAction::Quit);
    actions
}

fn menu_prompt(state: &AppState) -> &'static str {
    match state.ui.phase {
        Phase::Processing => "操作を選択（スタイル変換中...）",
        Phase::Idle => "操作を選択",
    }
}

pub async fn run_interactive(config: &Config) -> Result<()> {
    let (session, mut handle) = Session::from_config(config);
    let session_task = tokio::spawn(session.run());

    println!("🎨 style-transfer - 対話モード\n");
    print_state(&handle.snapshot());

    loop {
        let state = handle.snapshot();
        let actions = menu_for(&state);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let prompt = menu_prompt(&state);

        let selected = blocking(|| {
            Select::new()
                .with_prompt(prompt)
                .items(&labels)
                .default(0)
                .interact()
        })?;

        let event = match actions[selected] {
            MenuAction::SelectStyle => prompt_style(&state)?.map(Event::StyleSelected),
            MenuAction::SelectContent => prompt_content(&state)?.map(Event::SourceSelected),
            MenuAction::Upload => prompt_upload()?.map(Event::FileUploaded),
            MenuAction::Submit => {
                submit(&mut handle).await?;
                continue;
            }
            MenuAction::Cancel => Some(Event::CancelSubmit),
            MenuAction::Status => {
                print_state(&handle.snapshot());
                continue;
            }
            MenuAction::Quit => break,
        };

        if let Some(event) = event {
            handle.latest();
            handle.send(event)?;
            let updated = handle.changed().await?;
            print_state(&updated);
        }
    }

    handle.send(Event::Shutdown)?;
    session_task
        .await
        .map_err(|e| StyleTransferError::Engine(format!("session task failed: {}", e)))?;
    Ok(())
}

/// 送信だけして戻る。完了はバックグラウンドで待って表示する
async fn submit(handle: &mut SessionHandle) -> Result<()> {
    handle.latest();
    handle.send(Event::SubmitPressed)?;
    let accepted = handle.changed().await?;
    print_state(&accepted);
    if accepted.ui.phase == Phase::Processing {
        tokio::spawn(report_completion(handle.clone(), accepted.generation));
    }
    Ok(())
}

async fn report_completion(mut handle: SessionHandle, generation: u64) {
    let done = handle
        .wait_for(|s| s.generation != generation || s.ui.phase == Phase::Idle)
        .await;
    // キャンセルされた実行は表示しない
    if let Ok(state) = done {
        if state.generation == generation {
            println!("\n✔ スタイル変換が終了しました");
            print_state(&state);
        }
    }
}

fn prompt_style(state: &AppState) -> Result<Option<String>> {
    let styles = builtin_styles();
    let labels: Vec<&str> = styles.iter().map(|s| s.display_label.as_str()).collect();
    let current = styles
        .iter()
        .position(|s| s.id == state.ui.selected_style.id)
        .unwrap_or(0);

    let index = blocking(|| {
        Select::new()
            .with_prompt("スタイル")
            .items(&labels)
            .default(current)
            .interact()
    })?;
    Ok(styles.get(index).map(|s| s.id.clone()))
}

fn prompt_content(state: &AppState) -> Result<Option<String>> {
    let contents = builtin_contents();
    let labels: Vec<&str> = contents.iter().map(|c| c.label).collect();
    let current = contents
        .iter()
        .position(|c| c.file_name == state.ui.selected_source.choice())
        .unwrap_or(0);

    let index = blocking(|| {
        Select::new()
            .with_prompt("コンテンツ画像")
            .items(&labels)
            .default(current)
            .interact()
    })?;
    Ok(contents.get(index).map(|c| c.file_name.to_string()))
}

fn prompt_upload() -> Result<Option<UploadHandle>> {
    let path: String = blocking(|| {
        Input::new()
            .with_prompt("画像ファイルのパス（空で中止）")
            .allow_empty(true)
            .interact_text()
    })?;
    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadHandle::new(path)))
}

/// dialoguer はブロッキングなのでランタイムに知らせて実行
fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> dialoguer::Result<T>,
{
    tokio::task::block_in_place(f).map_err(|e| match e {
        dialoguer::Error::IO(e) => StyleTransferError::Io(e),
    })
}

fn print_state(state: &AppState) {
    println!("---");
    println!("  スタイル: {} ({})", state.ui.selected_style.display_label, state.ui.selected_style.id);
    println!("  コンテンツ: {}", state.ui.selected_source.choice());
    if state.ui.phase == Phase::Processing {
        println!("  状態: スタイル変換中...");
    }
    if let Some(preview) = &state.view.style_preview {
        println!("  スタイル参照: {} ({}x{})", preview.path.display(), preview.width, preview.height);
    }
    if let Some(preview) = &state.view.input_preview {
        println!("  入力画像: {} ({}x{})", preview.path.display(), preview.width, preview.height);
    } else if state.view.upload_visible {
        println!("  入力画像: 未アップロード");
    }
    if let Some(output) = &state.view.output_image {
        println!("  結果: {}", output.display());
    }
    if let Some(LastResult::Success(result)) = &state.ui.last_result {
        println!("  生成時刻: {}", result.timestamp);
    }
    if let Some(message) = &state.view.notification {
        println!("  ⚠ {}", message);
    }
    println!("---\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StyleCatalog;
    use style_transfer_common::ContentSource;

    #[test]
    fn test_menu_hides_upload_for_catalog_source() {
        let state = AppState::initial(&StyleCatalog::builtin("/nonexistent"));
        assert!(!menu_for(&state).contains(&MenuAction::Upload));
    }

    #[test]
    fn test_menu_shows_upload_when_visible() {
        let mut state = AppState::initial(&StyleCatalog::builtin("/nonexistent"));
        state.ui.selected_source = ContentSource::Custom(None);
        state.view.upload_visible = true;

        let menu = menu_for(&state);
        assert_eq!(menu[2], MenuAction::Upload);
        assert_eq!(menu.last(), Some(&MenuAction::Quit));
    }

    #[test]
    fn test_menu_offers_cancel_while_processing() {
        let mut state = AppState::initial(&StyleCatalog::builtin("/nonexistent"));
        state.ui.phase = Phase::Processing;

        let menu = menu_for(&state);
        assert!(menu.contains(&MenuAction::Cancel));
        assert!(menu.contains(&MenuAction::SelectStyle));
        assert!(!menu.contains(&MenuAction::Submit));
        assert_eq!(menu_prompt(&state), "操作を選択（スタイル変換中...）");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_maps_terminal_error_to_io() {
        let err = blocking::<(), _>(|| {
            Err(dialoguer::Error::IO(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "not a terminal",
            )))
        })
        .unwrap_err();
        assert!(matches!(err, StyleTransferError::Io(e) if e.kind() == std::io::ErrorKind::NotConnected));
    }
}
