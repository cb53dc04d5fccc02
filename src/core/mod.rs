pub mod record;
pub mod scale;
pub mod types;

pub use record::{ChartDataDocument, ChartRecord, DataPoint, PlotKind, SourceRef};
pub use scale::LinearScale;
pub use types::Viewport;
