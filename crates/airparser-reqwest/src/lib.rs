#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod connect;
mod error;
mod service;

pub use crate::connect::{AirparserClient, AirparserConfig, DEFAULT_TIMEOUT_SECS, TRACING_TARGET};
pub use crate::error::{Error, Result};
