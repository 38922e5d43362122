// SPDX-License-Identifier: GPL-3.0-or-later

pub mod args;
pub mod config;
pub mod engine;
pub mod fixtures;
pub mod modes;
pub mod report;
pub mod scenarios;
pub mod value;
