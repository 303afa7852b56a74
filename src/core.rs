pub mod account;
pub mod lifecycle;
pub mod mapper;
pub mod payload;
pub mod price;
pub mod sample;
pub mod signal;
pub mod sun_window;
