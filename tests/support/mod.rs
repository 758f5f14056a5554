#![allow(dead_code)]

pub mod fixtures;
pub mod prompter;
pub mod transport;
