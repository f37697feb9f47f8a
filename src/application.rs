// アプリケーション層モジュール
pub mod summary_handler;

// 再エクスポート
pub use summary_handler::{ProjectSummaryHandler, SummaryHandlerError, PREPARE_FAILURE_MESSAGE};
