pub mod maintenance;
pub mod publish;
pub mod remove;
pub mod show;
