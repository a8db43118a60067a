//! External collaborators wired into the service

pub mod recommendations;
