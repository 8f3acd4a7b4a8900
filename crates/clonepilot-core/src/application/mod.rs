/// Session driver - runs one conversation over a state registry
pub mod session_driver;
