pub mod alerts;
pub mod connection;
pub mod hospitals;
pub mod notification_logs;
pub mod prospects;
