#![no_std]

// Shared logic for the IR-controlled Pomodoro timer.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library. Hardware collaborators (display, buzzer, capture and
// tick sources) are reached through the traits and events defined here.

pub mod app;
pub mod config;
pub mod countdown;
pub mod display;
pub mod ir;
pub mod minutes;
pub mod phase;
pub mod remote;
pub mod reset;
pub mod telemetry;
