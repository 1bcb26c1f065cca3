//! Reporting of solved flow networks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod presentation;

pub use self::presentation::{EdgeReport, FlowReport};
