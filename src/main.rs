use anyhow::Context;
use blueprint_estimate::{cli, config, editor, export, history, view, workflow};
use blueprint_estimate_common::UserDetails;
use clap::Parser;
use dialoguer::Confirm;
use cli::{Cli, Commands};
use config::Config;
use history::SummaryArchive;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Show { payload } => {
            println!("📐 bp-estimate - 見積もり明細\n");

            let (session, stats) = workflow::open_session(&payload, &config)
                .with_context(|| format!("解析結果を読み込めません: {}", payload.display()))?;
            if !stats.excluded.is_empty() {
                println!("- 除外: {}", stats.excluded.join(", "));
            }
            workflow::require_items(&session, &payload)?;

            print!("{}", view::render_cards(session.items()));
            println!();
            print!("{}", view::render_bill(session.items(), &config.currency_symbol));
        }

        Commands::Estimate { payload, output, title } => {
            println!("📐 bp-estimate - 見積もり作成\n");

            println!("[1/2] 解析結果を読み込み中...");
            let (mut session, stats) = workflow::open_session(&payload, &config)
                .with_context(|| format!("解析結果を読み込めません: {}", payload.display()))?;
            workflow::require_items(&session, &payload)?;
            for event in session.drain_events() {
                println!("{}", view::event_message(&event));
            }
            if !stats.excluded.is_empty() {
                println!("- 除外: {}", stats.excluded.join(", "));
            }
            println!();

            println!("[2/2] 明細の確認・修正");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            editor::run_interactive_estimate(&mut session, &config, &output_dir, &title)?;

            println!("\n✅ 終了 ({})", session.state());
        }

        Commands::Summarize { payload, name, email, phone, address, edits, format, output, title } => {
            println!("📐 bp-estimate - 見積もり保存\n");

            println!("[1/3] 解析結果を読み込み中...");
            let (mut session, _) = workflow::open_session(&payload, &config)
                .with_context(|| format!("解析結果を読み込めません: {}", payload.display()))?;
            workflow::require_items(&session, &payload)?;
            session.drain_events();
            println!("✔ {}件の明細\n", session.items().len());

            println!("[2/3] 明細を修正中...");
            workflow::apply_edits(&mut session, &edits)?;
            println!("✔ {}件の修正\n", edits.len());

            println!("[3/3] 保存中...");
            let user = UserDetails { name, email, phone, address };
            let archive = SummaryArchive::new(config.archive_dir()?);
            let (summary, saved) = workflow::summarize_and_archive(&mut session, &user, &archive)?;
            for line in view::render_summary_lines(summary.items(), &config.currency_symbol) {
                println!("  {}", line);
            }
            println!("✔ 保存: {}", saved.display());

            if let Some(format) = format {
                let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
                workflow::export_session(&mut session, format, &output_dir, &title, &config.currency_symbol)?;
            }

            println!("\n✅ 保存完了 ID: {}", summary.id());
        }

        Commands::Export { summary, format, output, title } => {
            println!("📄 bp-estimate - エクスポート\n");

            let summary = workflow::resolve_summary(&summary, &config)
                .with_context(|| format!("保存済み見積もりを読み込めません: {}", summary))?;
            let format = format.unwrap_or(config.default_format);
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));

            export::export_summary(&summary, format, &output_dir, &title, &config.currency_symbol)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::History { search, delete, yes } => {
            let archive = SummaryArchive::new(config.archive_dir()?);

            if let Some(id) = delete {
                let target = archive.find(&id)?;
                println!("  {}", view::render_summary_row(&target.summary, &config.currency_symbol));
                let confirmed = yes
                    || Confirm::new()
                        .with_prompt("この見積もりを削除しますか?")
                        .default(false)
                        .interact()?;
                if !confirmed {
                    println!("  → 削除をキャンセルしました");
                    return Ok(());
                }

                let removed = archive.delete(&id)?;
                println!("✔ 削除しました: {}", removed.path.display());
                return Ok(());
            }

            let entries = match search.as_deref() {
                Some(query) => archive.search(query),
                None => archive.list(),
            };

            if entries.is_empty() {
                println!("保存済みの見積もりはありません: {}", archive.dir().display());
            } else {
                println!("保存済み見積もり ({}件):", entries.len());
                for entry in &entries {
                    println!("  {}", view::render_summary_row(&entry.summary, &config.currency_symbol));
                }
            }
        }

        Commands::Config { set_unit_price, set_image_base_url, set_archive_dir, show } => {
            let mut config = config;

            if let Some(price) = set_unit_price {
                config.set_unit_price(price)?;
                println!("✔ 既定単価を設定しました: {}", price);
            }

            if let Some(url) = set_image_base_url {
                config.set_image_base_url(url)?;
                println!("✔ 画像ベースURLを設定しました");
            }

            if let Some(dir) = set_archive_dir {
                config.set_archive_dir(dir)?;
                println!("✔ 保存先を設定しました");
            }

            if show {
                println!("設定:");
                println!("  既定単価: {}", config.unit_price);
                println!("  画像ベースURL: {}", config.image_base_url);
                println!("  通貨記号: {}", config.currency_symbol);
                println!("  保存先: {}", config.archive_dir()?.display());
                println!("  既定出力形式: {}", config.default_format.label());
            }
        }
    }

    Ok(())
}
