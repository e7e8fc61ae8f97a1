//! Main module for metagram library functionality

pub mod api;
pub mod bootstrap;
pub mod compiling;
pub mod config;
pub mod errors;
pub mod formats;
pub mod lexing;
pub mod location;
pub mod parsing;
pub mod scanning;
pub mod token;
