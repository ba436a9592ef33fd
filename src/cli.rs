use blueprint_estimate_common::{is_valid_unit_price, ExportFormat, MAX_ITEM_COUNT, MAX_UNIT_PRICE};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bp-estimate")]
#[command(about = "図面シンボル解析結果から見積書を作成するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 解析結果を見積もり明細として表示
    Show {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        payload: PathBuf,
    },

    /// 対話的に明細を修正して見積もりを保存・出力
    Estimate {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        payload: PathBuf,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "Estimation")]
        title: String,
    },

    /// 明細修正と保存を一括実行（非対話）
    Summarize {
        /// 解析結果JSONファイル
        #[arg(required = true)]
        payload: PathBuf,

        /// 氏名（必須）
        #[arg(long)]
        name: String,

        /// メールアドレス（必須）
        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        address: String,

        /// 明細の修正 NAME=COUNT[:PRICE]（複数指定可）
        #[arg(long = "set", value_name = "NAME=COUNT[:PRICE]")]
        edits: Vec<ItemEdit>,

        /// 保存後に出力する形式 (pdf/docx/xlsx)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "Estimation")]
        title: String,
    },

    /// 保存済み見積もりを出力
    Export {
        /// 保存済み見積もりJSON、またはIDの先頭部分
        #[arg(required = true)]
        summary: String,

        /// 出力形式 (pdf/docx/xlsx)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドキュメントタイトル
        #[arg(short, long, default_value = "Estimation")]
        title: String,
    },

    /// 保存済み見積もりの一覧
    History {
        /// 氏名・メールで絞り込み
        #[arg(short, long)]
        search: Option<String>,

        /// 指定IDの見積もりを削除
        #[arg(long)]
        delete: Option<String>,

        /// 削除の確認を省略
        #[arg(short, long, requires = "delete")]
        yes: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 既定単価を設定
        #[arg(long)]
        set_unit_price: Option<Decimal>,

        /// 画像参照のベースURLを設定
        #[arg(long)]
        set_image_base_url: Option<String>,

        /// 保存先ディレクトリを設定
        #[arg(long)]
        set_archive_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// `--set` で指定する明細の修正
#[derive(Clone, Debug, PartialEq)]
pub struct ItemEdit {
    pub name: String,
    pub count: u64,
    /// 省略時は現在の単価のまま
    pub price: Option<Decimal>,
}

impl std::str::FromStr for ItemEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("Invalid edit: {}. Use NAME=COUNT[:PRICE]", s))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("Invalid edit: {}. NAME is empty", s));
        }

        let (count, price) = match rest.split_once(':') {
            Some((count, price)) => (count, Some(price)),
            None => (rest, None),
        };
        let count: u64 = count
            .trim()
            .parse()
            .map_err(|_| format!("Invalid count in {}: must be a non-negative integer", s))?;
        if count > MAX_ITEM_COUNT {
            return Err(format!("Invalid count in {}: must be at most {}", s, MAX_ITEM_COUNT));
        }
        let price = match price {
            Some(p) => {
                let price: Decimal = p
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid price in {}", s))?;
                if !is_valid_unit_price(price) {
                    return Err(format!(
                        "Invalid price in {}: must be between 0 and {}",
                        s, MAX_UNIT_PRICE
                    ));
                }
                Some(price)
            }
            None => None,
        };

        Ok(ItemEdit {
            name: name.to_string(),
            count,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_edit_count_only() {
        let edit: ItemEdit = "window=7".parse().unwrap();
        assert_eq!(edit.name, "window");
        assert_eq!(edit.count, 7);
        assert_eq!(edit.price, None);
    }

    #[test]
    fn test_item_edit_with_price() {
        let edit: ItemEdit = "Total Symbols=12:0".parse().unwrap();
        assert_eq!(edit.name, "Total Symbols");
        assert_eq!(edit.count, 12);
        assert_eq!(edit.price, Some(Decimal::ZERO));

        let edit: ItemEdit = "wall=3:12.50".parse().unwrap();
        assert_eq!(edit.price, Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_item_edit_invalid() {
        assert!("window".parse::<ItemEdit>().is_err());
        assert!("=3".parse::<ItemEdit>().is_err());
        assert!("window=-1".parse::<ItemEdit>().is_err());
        assert!("window=2:abc".parse::<ItemEdit>().is_err());
        assert!("window=2:-5".parse::<ItemEdit>().is_err());
    }

    #[test]
    fn test_item_edit_out_of_range() {
        assert!("window=10000000000:10000000000000000000".parse::<ItemEdit>().is_err());
        assert!("window=1000000000001".parse::<ItemEdit>().is_err());
        assert!("window=1:1000000000000.01".parse::<ItemEdit>().is_err());
        assert!("window=1000000000000:1000000000000".parse::<ItemEdit>().is_ok());
    }

    #[test]
    fn test_cli_parses_summarize() {
        let cli = Cli::try_parse_from([
            "bp-estimate",
            "summarize",
            "payload.json",
            "--name",
            "A",
            "--email",
            "a@b.com",
            "--set",
            "window=6",
            "--format",
            "xlsx",
        ])
        .unwrap();
        match cli.command {
            Commands::Summarize { edits, format, .. } => {
                assert_eq!(edits.len(), 1);
                assert_eq!(format, Some(ExportFormat::Xlsx));
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_cli_parses_history_delete() {
        let cli = Cli::try_parse_from(["bp-estimate", "history", "--delete", "1a2b3c4d", "--yes"]).unwrap();
        match cli.command {
            Commands::History { delete, yes, .. } => {
                assert_eq!(delete.as_deref(), Some("1a2b3c4d"));
                assert!(yes);
            }
            _ => panic!("unexpected command"),
        }

        let cli = Cli::try_parse_from(["bp-estimate", "history", "--delete", "1a2b3c4d"]).unwrap();
        assert!(matches!(cli.command, Commands::History { yes: false, .. }));

        assert!(Cli::try_parse_from(["bp-estimate", "history", "--yes"]).is_err());
    }
}
