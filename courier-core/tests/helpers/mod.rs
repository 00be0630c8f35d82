
pub mod models;
pub mod network;
