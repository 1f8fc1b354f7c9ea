//! Analysis pipelines
//!
//! - **Daily**: market facts -> generation backend -> validated `AnalysisRecord`
//! - **Weekly**: trailing log window -> `WindowStats` -> narrative `WeeklyRecord`
//!
//! Both pipelines are stateless between runs. Transport failures from the
//! backend propagate; unstructured output degrades to a fallback record.

mod daily;
mod weekly;

pub use daily::DailyAnalyst;
pub use weekly::WeeklyReporter;
