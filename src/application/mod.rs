pub mod features;
pub mod ports;
pub mod services;
