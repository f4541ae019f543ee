#[macro_use]
pub mod logger;
pub mod app;
pub mod canvas;
pub mod components;
pub mod input;
pub mod io;
pub mod ops;
pub mod session;
pub mod settings;
