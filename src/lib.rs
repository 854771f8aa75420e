pub mod app;
pub mod cli;
pub mod engine;
pub mod generation;
pub mod input;
pub mod logging;
pub mod paths;
pub mod reading;
pub mod storage;
pub mod ui;
