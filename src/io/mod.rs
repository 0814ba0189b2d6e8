mod export;
mod import;

pub use export::*;
pub use import::*;

/// Column order of the persisted table layout.
pub const CSV_HEADER: [&str; 6] = ["date", "city", "category", "description", "amount_base", "note"];

/// Header written by the original spreadsheet tool, same column order.
pub const LEGACY_CSV_HEADER: [&str; 6] = ["日期", "城市", "类别", "项目内容", "金额(RMB)", "备注"];
