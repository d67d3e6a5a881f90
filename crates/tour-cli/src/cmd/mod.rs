pub mod maintenance;
pub mod serve;
