#![no_std]

pub mod config;
pub mod emitter;
pub mod indicator;
pub mod net;
pub mod strings;
