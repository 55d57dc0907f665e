mod config;
mod error;
mod logger;
