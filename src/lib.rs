pub mod app;
pub mod error;
pub mod event;
pub mod rma;
pub mod ui;
