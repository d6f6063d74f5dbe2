pub mod analyst;
pub mod cli;
pub mod gateway;
