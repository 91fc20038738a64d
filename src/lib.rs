pub mod config;
pub mod curve;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::{Config, LongPnlVariant, ReportMode, ShortPnlVariant};
pub use curve::{CurveError, CurveQuote, CurveQuoter, StaticCurveQuoter};
pub use datasource::{DataSource, DataSourceError, HttpDataSource, MockDataSource};
pub use domain::{
    CloseReason, ClosedOrderRecord, Decimal, Direction, HistoryMetrics, OrderTypeMapping, Position,
    PositionMetrics,
};
pub use engine::{EngineConfig, UnitConverter, ValuationError};
pub use error::ReportError;
pub use orchestration::{ActiveReport, HistoryReport, Reporter};
