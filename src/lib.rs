pub mod config;
pub mod contracts;
pub mod error;
pub mod fetch;
pub mod output;
pub mod selection;
pub mod series;
