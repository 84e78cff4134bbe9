//! Utility bill classification and upload.
//!
//! A bill's PDF text is matched against an [`indicators::IndicatorSet`] to find
//! its supplier and whether it is a gas or electricity bill, then the file is
//! handed to the facilities backend with those fields attached.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod error;
pub mod external;
pub mod indicators;
pub mod logging;
pub mod printer;
pub mod utils;
