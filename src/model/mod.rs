pub mod behavior;
pub mod brain;
pub mod config;
pub mod entity;
pub mod error;
pub mod sim;
pub mod vec2;
pub mod world;
