//! Core engine functionality shared by every subsystem

pub mod entity;
