use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use style_transfer::{cli, config, interactive, pipeline, retention};
use style_transfer_common::{builtin_contents, builtin_styles, ContentSource, UploadHandle};
use cli::{Cli, Commands};
use config::Config;
use pipeline::PipelineOrchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load().context("設定の読み込みに失敗")?;
    if let Some(dir) = &cli.base_dir {
        config.base_dir = dir.clone();
    }
    if let Some(engine) = cli.engine {
        config.engine = engine;
    }

    match cli.command {
        Commands::Styles => {
            println!("スタイル:");
            for style in builtin_styles() {
                println!("  {:<16} {}", style.id, style.display_label);
            }
            println!("\nコンテンツ画像:");
            for content in builtin_contents() {
                println!("  {:<16} {}", content.file_name, content.label);
            }
        }

        Commands::Run { style, content, upload, json } => {
            apply_retention(&config)?;

            let source = match (upload, content) {
                (Some(path), _) => ContentSource::Custom(Some(UploadHandle::new(path))),
                (None, Some(choice)) => ContentSource::from_choice(&choice),
                (None, None) => ContentSource::from_choice(
                    builtin_contents().first().map(|c| c.file_name).unwrap_or_default(),
                ),
            };

            if !json {
                println!("🎨 style-transfer - スタイル変換\n");
            }

            let orchestrator = PipelineOrchestrator::from_config(&config);
            let spinner = (!json).then(|| {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.set_message(format!("{} を適用中...", style));
                spinner.enable_steady_tick(Duration::from_millis(100));
                spinner
            });

            let outcome = tokio::task::spawn_blocking(move || orchestrator.run(&style, &source))
                .await
                .context("推論タスクが異常終了")?;

            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            let result = outcome.map_err(|e| anyhow!(e.user_message()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("✔ 結果を保存: {}", result.output_image_path.display());
                println!("\n✅ 完了");
            }
        }

        Commands::Interactive => {
            apply_retention(&config)?;
            interactive::run_interactive(&config).await?;
        }

        Commands::Config { set_base_dir, set_engine_command, set_retention_hours, show } => {
            // 表示・保存は設定ファイルの値（CLI の --base-dir/--engine は反映しない）
            let mut stored = Config::load_from(&Config::config_path()?)?;
            let changed = stored.apply_settings(set_base_dir, set_engine_command.as_deref(), set_retention_hours);

            if changed {
                stored.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("{}", stored.summary()?);
            }
        }

        Commands::Clean { older_than_hours, outputs, dry_run } => {
            let hours = older_than_hours
                .or(config.upload_retention_hours)
                .ok_or_else(|| anyhow!("保持時間が未設定です。--older-than-hours を指定してください"))?;
            let max_age = retention::max_age_from_hours(hours);
            let layout = config.layout();

            let mut reports = vec![("アップロード", retention::prune_uploads(&layout.uploads, max_age, dry_run)?)];
            if outputs {
                reports.push(("出力", retention::prune_outputs(&layout.outputs, max_age, dry_run)?));
            }

            for (label, report) in reports {
                let verb = if dry_run { "削除予定" } else { "削除" };
                println!("{}: {} {}件 / 保持 {}件", label, verb, report.removed.len(), report.kept);
                for path in &report.removed {
                    println!("  - {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// 保持時間が設定されていれば起動時に古いアップロードを削除
fn apply_retention(config: &Config) -> Result<()> {
    if let Some(hours) = config.upload_retention_hours {
        let max_age = retention::max_age_from_hours(hours);
        let report = retention::prune_uploads(&config.layout().uploads, max_age, false)
            .context("アップロードの整理に失敗")?;
        if !report.removed.is_empty() {
            log::info!("pruned {} expired uploads", report.removed.len());
        }
    }
    Ok(())
}
