// アプリケーション層モジュール
pub mod sample_handler;
pub mod validation_handler;

// 再エクスポート
pub use sample_handler::{SAMPLE_LABEL, SampleHandler};
pub use validation_handler::{ValidationHandler, ValidationHandlerError};
