//! 배치 작업 모듈.

pub mod connection_check;
pub mod fund_list_sync;
pub mod holdings_collect;
pub mod type_report;

pub use connection_check::{check_connection, CheckStatus, ConnectionReport};
pub use fund_list_sync::{sync_fund_list, FundListSyncReport, ListSyncOutcome};
pub use holdings_collect::{collect_holdings, HoldingsSummary};
pub use type_report::{fund_type_distribution, report_fund_types, TypeCount, TypeDistribution};
