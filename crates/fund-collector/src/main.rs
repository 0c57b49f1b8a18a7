//! Standalone fund collector CLI.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fund_collector::{modules, CollectorConfig, Result};
use fund_core::{init_logging, LogConfig, LogFormat};
use fund_data::{EastmoneyFundSource, SupabaseStore};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "fund-collector")]
#[command(about = "Public fund list & holdings batch collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, default_value = "compact")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// 펀드 목록 동기화 (조회 → 유형 필터 → 테이블 교체)
    SyncFunds,

    /// 보유종목 수집 (HOLDINGS_START_INDEX / HOLDINGS_BATCH_SIZE 구간)
    CollectHoldings,

    /// 설정, 데이터 소스, 저장소 연결 점검
    CheckConnection,

    /// 데이터 소스의 펀드 유형 분포 출력
    FundTypes,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 로깅 초기화
    let level = &cli.log_level;
    let log_config = LogConfig::new(format!(
        "fund_collector={0},fund_data={0},fund_core={0}",
        level
    ))
    .with_format(cli.log_format);
    if let Err(e) = init_logging(log_config) {
        eprintln!("로깅 초기화 실패: {}", e);
    }

    match run(cli.command).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "실행 실패");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<bool> {
    tracing::info!("Fund Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(base_url = %config.store.base_url, "설정 로드 완료");

    let source = EastmoneyFundSource::with_options(config.source.clone())?;
    let store = SupabaseStore::new(&config.store)?;
    let cancel = spawn_interrupt_listener();

    let succeeded = match command {
        Commands::SyncFunds => {
            let report =
                modules::sync_fund_list(&source, &store, &config.fund_list, &cancel).await;
            report.stats.log_summary("펀드 목록 동기화");
            if report.is_success() {
                tracing::info!(
                    count = report.in_scope,
                    "펀드 목록 저장 완료. 다음 단계: fund-collector collect-holdings"
                );
            } else {
                tracing::error!(outcome = ?report.outcome, "펀드 목록 동기화 실패");
            }
            report.is_success()
        }
        Commands::CollectHoldings => {
            let summary =
                modules::collect_holdings(&source, &store, &config.holdings, &cancel).await?;
            summary.log_summary();
            true
        }
        Commands::CheckConnection => {
            let report = modules::check_connection(&source, &store, &config).await;
            report.log_report();
            report.is_ok()
        }
        Commands::FundTypes => {
            let distribution = modules::report_fund_types(&source).await?;
            distribution.log_report();
            true
        }
    };

    tracing::info!("Fund Collector 종료");
    Ok(succeeded)
}

/// Ctrl+C 수신 시 취소 토큰을 취소합니다.
///
/// 진행 중인 호출은 끝까지 기다리므로, 두 번째 Ctrl+C는 즉시 종료합니다.
fn spawn_interrupt_listener() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("종료 신호 수신, 현재 작업 후 중단합니다 (강제 종료: Ctrl+C 한 번 더)");
        token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("강제 종료");
            std::process::exit(130);
        }
    });

    cancel
}
