// ==========================================
// 新品铺货费计算器 - 命令行入口
// ==========================================
// 用法: listing-fee <request.json> [规则配置] [门店主数据]
// 输出: stdout 打印 JSON 结果，随后打印计算过程
// ==========================================

use anyhow::{bail, Context, Result};
use listing_fee::api::{FeeApi, StoreSelection};
use listing_fee::config::DataPaths;
use listing_fee::domain::FeeRequest;
use listing_fee::logging;
use serde::Deserialize;
use std::path::PathBuf;

/// 请求文件格式
#[derive(Debug, Deserialize)]
struct CliInput {
    request: FeeRequest,
    #[serde(default)]
    selection: StoreSelection,
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.len() > 3 {
        bail!("用法: listing-fee <request.json> [规则配置] [门店主数据]");
    }

    tracing::info!("{} v{}", listing_fee::APP_NAME, listing_fee::VERSION);

    let mut paths = DataPaths::resolve();
    if let Some(config) = args.get(1) {
        paths.config = PathBuf::from(config);
    }
    if let Some(store_master) = args.get(2) {
        paths.store_master = PathBuf::from(store_master);
    }

    let text = std::fs::read_to_string(&args[0])
        .with_context(|| format!("读取请求文件失败: {}", args[0]))?;
    let input: CliInput =
        serde_json::from_str(&text).with_context(|| format!("请求文件格式错误: {}", args[0]))?;

    let api = FeeApi::open(&paths)
        .with_context(|| format!("初始化失败 (数据目录: {})", paths.data_dir.display()))?;
    let quote = api
        .calculate(&input.request, &input.selection)
        .context("铺货费计算失败")?;

    println!("{}", serde_json::to_string_pretty(&quote)?);
    println!();
    println!("{}", quote.result.trace_text());
    if quote.excluded_stores() > 0 {
        println!("已自动剔除 {} 家无资质门店", quote.excluded_stores());
    }

    Ok(())
}
