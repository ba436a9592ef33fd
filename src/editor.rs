//! 対話式見積もり編集
//!
//! カード表示・明細の修正・保存（連絡先入力）・出力をメニューから操作する。
//! 明細の修正は確認で確定するまでセッションに反映しない。

use crate::config::Config;
use crate::error::{EstimateError, Result};
use crate::history::SummaryArchive;
use crate::view;
use crate::workflow;
use blueprint_estimate_common::{
    is_valid_unit_price, Error, EstimationSession, ExportFormat, LineItem, SessionState,
    UserDetails, MAX_ITEM_COUNT, MAX_UNIT_PRICE,
};
use dialoguer::{Confirm, Input, Select};
use rust_decimal::Decimal;
use std::path::Path;

/// メニュー項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ShowCards,
    ShowBill,
    ViewImage,
    EditItem,
    Save,
    Export,
    Quit,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::ShowCards => "明細カードを表示",
            MenuAction::ShowBill => "請求表を表示",
            MenuAction::ViewImage => "画像を確認",
            MenuAction::EditItem => "明細を修正",
            MenuAction::Save => "見積もりを保存",
            MenuAction::Export => "出力",
            MenuAction::Quit => "終了",
        }
    }
}

/// 現在の状態で選べる操作
pub fn available_actions(state: SessionState) -> Vec<MenuAction> {
    match state {
        SessionState::Empty => vec![MenuAction::Quit],
        SessionState::Loaded | SessionState::Editing => vec![
            MenuAction::ShowCards,
            MenuAction::ShowBill,
            MenuAction::ViewImage,
            MenuAction::EditItem,
            MenuAction::Save,
            MenuAction::Quit,
        ],
        SessionState::Summarized | SessionState::Exported => vec![
            MenuAction::ShowCards,
            MenuAction::ShowBill,
            MenuAction::ViewImage,
            MenuAction::EditItem,
            MenuAction::Save,
            MenuAction::Export,
            MenuAction::Quit,
        ],
    }
}

/// 単価入力の検証（0以上、上限以下）
pub fn validate_price(price: &Decimal) -> std::result::Result<(), String> {
    if is_valid_unit_price(*price) {
        Ok(())
    } else {
        Err(format!("単価は0以上{}以下で入力してください", MAX_UNIT_PRICE))
    }
}

/// 数量入力の検証（上限以下）
pub fn validate_count(count: &u64) -> std::result::Result<(), String> {
    if *count <= MAX_ITEM_COUNT {
        Ok(())
    } else {
        Err(format!("数量は{}以下で入力してください", MAX_ITEM_COUNT))
    }
}

/// 選択肢用の明細ラベル
pub fn item_label(item: &LineItem, currency_symbol: &str) -> String {
    if item.is_aggregate() {
        format!("{} ({})", item.name, item.count)
    } else {
        format!(
            "{} ({} × {})",
            item.name,
            item.count,
            blueprint_estimate_common::bill::format_money(item.price, currency_symbol)
        )
    }
}

/// 対話式で見積もりを編集・保存・出力する
pub fn run_interactive_estimate(
    session: &mut EstimationSession,
    config: &Config,
    output_dir: &Path,
    title: &str,
) -> Result<()> {
    let archive = SummaryArchive::new(config.archive_dir()?);
    let mut user = UserDetails::default();

    print!("{}", view::render_cards(session.items()));
    println!();

    loop {
        let actions = available_actions(session.state());
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let selection = Select::new()
            .with_prompt(format!("操作を選択 [{}]", session.state()))
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[selection] {
            MenuAction::ShowCards => {
                print!("{}", view::render_cards(session.items()));
            }
            MenuAction::ShowBill => {
                print!("{}", view::render_bill(session.items(), &config.currency_symbol));
            }
            MenuAction::ViewImage => view_image(session, config)?,
            MenuAction::EditItem => edit_item(session, config)?,
            MenuAction::Save => {
                if let Some(saved) = save_estimation(session, config, &archive, &mut user)? {
                    println!("✔ 見積もりを保存しました: {}", saved.display());
                }
            }
            MenuAction::Export => export_current(session, config, output_dir, title)?,
            MenuAction::Quit => {
                if session.state() == SessionState::Editing
                    && !Confirm::new()
                        .with_prompt("未保存の修正があります。終了しますか?")
                        .default(false)
                        .interact()?
                {
                    continue;
                }
                break;
            }
        }

        for event in session.drain_events() {
            println!("{}", view::event_message(&event));
        }
        println!();
    }

    Ok(())
}

fn view_image(session: &EstimationSession, config: &Config) -> Result<()> {
    let items: Vec<&LineItem> = session
        .items()
        .iter()
        .filter(|item| item.image_reference.is_some())
        .collect();
    if items.is_empty() {
        println!("画像のある明細がありません");
        return Ok(());
    }

    let labels: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    let selection = Select::new()
        .with_prompt("明細を選択")
        .items(&labels)
        .default(0)
        .interact()?;

    let item = items[selection];
    match view::resolve_image_url(&config.image_base_url, item.image_reference.as_deref()) {
        Some(url) => println!("  {}: {}", item.name, url),
        None => println!("  {}: 画像がありません", item.name),
    }
    Ok(())
}

/// 明細を1件修正する。確認で「いいえ」なら破棄
fn edit_item(session: &mut EstimationSession, config: &Config) -> Result<()> {
    let labels: Vec<String> = session
        .items()
        .iter()
        .map(|item| item_label(item, &config.currency_symbol))
        .collect();
    let selection = Select::new()
        .with_prompt("修正する明細")
        .items(&labels)
        .default(0)
        .interact()?;

    let item = session.items()[selection].clone();
    println!("  {}", item.name);

    let count: u64 = Input::new()
        .with_prompt("数量")
        .default(item.count)
        .validate_with(|input: &u64| validate_count(input))
        .interact_text()?;

    let price = if item.is_aggregate() {
        println!("  (合計行の単価は 0 固定)");
        Decimal::ZERO
    } else {
        Input::<Decimal>::new()
            .with_prompt("単価")
            .default(item.price)
            .validate_with(|input: &Decimal| validate_price(input))
            .interact_text()?
    };

    let confirmed = Confirm::new()
        .with_prompt(format!("{}: 数量 {} / 単価 {} で確定しますか?", item.name, count, price))
        .default(true)
        .interact()?;

    if confirmed {
        session.edit_by_id(item.id, count, price);
        if let Some(updated) = session.store().get_by_id(item.id) {
            println!("  → {}", item_label(updated, &config.currency_symbol));
        }
    } else {
        println!("  → 破棄しました");
    }
    Ok(())
}

/// 連絡先を入力して保存確定する。キャンセル時は None
fn save_estimation(
    session: &mut EstimationSession,
    config: &Config,
    archive: &SummaryArchive,
    user: &mut UserDetails,
) -> Result<Option<std::path::PathBuf>> {
    println!("保存内容:");
    for line in view::render_summary_lines(session.items(), &config.currency_symbol) {
        println!("  {}", line);
    }
    println!(
        "  Overall Total: {}",
        blueprint_estimate_common::bill::format_money(session.total(), &config.currency_symbol)
    );
    println!();

    loop {
        *user = prompt_contact(user)?;

        match workflow::summarize_and_archive(session, user, archive) {
            Ok((_, path)) => return Ok(Some(path)),
            Err(EstimateError::Common(Error::AmountOverflow)) => {
                println!("✗ 合計金額が大きすぎます。数量・単価を見直してください");
                return Ok(None);
            }
            Err(EstimateError::Common(err)) if err.is_recoverable() => {
                println!("✗ {}", err);
                let retry = Confirm::new()
                    .with_prompt("入力し直しますか?")
                    .default(true)
                    .interact()?;
                if !retry {
                    println!("  → 保存をキャンセルしました");
                    return Ok(None);
                }
            }
            Err(err) => return Err(err),
        }
    }
}

fn prompt_contact(current: &UserDetails) -> Result<UserDetails> {
    let name: String = Input::new()
        .with_prompt("氏名 *")
        .with_initial_text(current.name.clone())
        .allow_empty(true)
        .interact_text()?;
    let email: String = Input::new()
        .with_prompt("メール *")
        .with_initial_text(current.email.clone())
        .allow_empty(true)
        .interact_text()?;
    let phone: String = Input::new()
        .with_prompt("電話")
        .with_initial_text(current.phone.clone())
        .allow_empty(true)
        .interact_text()?;
    let address: String = Input::new()
        .with_prompt("住所")
        .with_initial_text(current.address.clone())
        .allow_empty(true)
        .interact_text()?;

    Ok(UserDetails {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        phone: phone.trim().to_string(),
        address: address.trim().to_string(),
    })
}

fn export_current(
    session: &mut EstimationSession,
    config: &Config,
    output_dir: &Path,
    title: &str,
) -> Result<()> {
    let labels: Vec<&str> = ExportFormat::ALL.iter().map(|f| f.label()).collect();
    let default = ExportFormat::ALL
        .iter()
        .position(|f| *f == config.default_format)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("出力形式")
        .items(&labels)
        .default(default)
        .interact()?;
    let format = ExportFormat::ALL[selection];

    report_export(workflow::export_session(
        session,
        format,
        output_dir,
        title,
        &config.currency_symbol,
    ))
}

/// 出力の失敗はメニューに戻れるよう表示だけにする
fn report_export(result: Result<std::path::PathBuf>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err @ (EstimateError::Io(_)
        | EstimateError::PdfGeneration(_)
        | EstimateError::DocxGeneration(_)
        | EstimateError::ExcelGeneration(_)
        | EstimateError::Common(Error::InvalidTransition(_)))) => {
            tracing::warn!(%err, "export failed");
            println!("✗ 出力に失敗しました: {}", err);
            Ok(())
        }
        Err(err) => Err(err),
    }
}
