//! Command handlers

pub mod category;
pub mod config;
pub mod link;
pub mod reset;
pub mod search;
pub mod settings;
pub mod status;
pub mod tag;
pub mod transfer;
