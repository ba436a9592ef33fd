pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod history;
pub mod view;
pub mod workflow;
