//! 펀드 수집을 위한 도메인 모델.

mod fund;
mod holding;

pub use fund::*;
pub use holding::*;
