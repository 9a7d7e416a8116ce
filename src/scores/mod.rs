pub mod espn;
pub mod league;
pub mod predict;
pub mod provider;
pub mod report;
pub mod summary;

pub use espn::EspnScoreboard;
pub use league::select_leagues;
pub use report::ReportBuilder;
