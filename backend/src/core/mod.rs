//! Core primitives shared by the scheduler and its host

pub mod time;
