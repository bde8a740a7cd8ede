use crate::config::EngineKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "style-transfer")]
#[command(about = "画像スタイル変換ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// ベースディレクトリ（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// 推論エンジン (command/identity)
    #[arg(long, global = true)]
    pub engine: Option<EngineKind>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スタイルとコンテンツ画像の一覧
    Styles,

    /// 1枚をスタイル変換
    Run {
        /// スタイルID
        #[arg(short, long, default_value = "candy")]
        style: String,

        /// カタログ画像のファイル名（"custom" でアップロード扱い）
        #[arg(short, long, conflicts_with = "upload")]
        content: Option<String>,

        /// アップロードする画像ファイル
        #[arg(short, long)]
        upload: Option<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話モード
    Interactive,

    /// 設定を表示/編集
    Config {
        /// ベースディレクトリを設定
        #[arg(long)]
        set_base_dir: Option<PathBuf>,

        /// 推論コマンドを設定（空白区切り、{model} {input} {output} を置換）
        #[arg(long)]
        set_engine_command: Option<String>,

        /// アップロードの保持時間（時間）
        #[arg(long)]
        set_retention_hours: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 古いアップロード・出力を削除
    Clean {
        /// この時間より古いファイルを削除（省略時は設定値）
        #[arg(long)]
        older_than_hours: Option<u64>,

        /// 生成済み出力も対象にする
        #[arg(long)]
        outputs: bool,

        /// 削除せずに一覧のみ表示
        #[arg(long)]
        dry_run: bool,
    },
}
