pub mod appender;
pub mod auth;
pub mod client;
pub mod options;
pub mod reader;
pub mod url;
