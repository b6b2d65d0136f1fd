pub mod config;
pub mod ingest;
pub mod init;
pub mod mcp;
pub mod tool;
