pub mod config;
pub mod logging;

pub mod annotate;
pub mod batch;
pub mod fetcher;
pub mod rows;
pub mod store;
pub mod url_model;
