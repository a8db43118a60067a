//! Background tasks

pub mod realtime;
