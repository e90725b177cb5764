mod category;
mod report;

pub use category::Category;
pub use report::{CreateReport, Report, ReportStatus};
