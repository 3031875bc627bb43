#![allow(dead_code)]

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub type Result<T> = anyhow::Result<T>;

pub mod connection;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod screen;
pub mod window;
pub mod xdata;
