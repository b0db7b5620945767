// Office state and derived status rules
pub mod state;

// Transition and alert events
pub mod event;

// Office service (single owner of the state) and sensor simulation
pub mod service;

// HTTP and WebSocket APIs
pub mod api;

// TOML + env configuration
pub mod config;
