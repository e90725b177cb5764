pub mod access;
mod report_service;

pub use access::VisibleScope;
pub use report_service::ReportService;
