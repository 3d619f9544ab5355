pub mod allocation;
pub mod asset;
pub mod cash_flow;
pub mod goal;
pub mod returns;
pub mod settings;
pub mod transaction;
