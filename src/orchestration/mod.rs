pub mod reporter;

pub use reporter::{ActiveReport, HistoryReport, Reporter};
