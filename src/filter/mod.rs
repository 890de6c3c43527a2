//! Deinterlacing filters
//!
//! A filter consumes one decoded frame and yields zero or more output frames.
//! Field-rate filters yield two frames per interlaced input.

pub mod yadif;

use crate::frame::RawVideoFrame;
use crate::{Error, Result};
use std::fmt;

/// Frames produced by a filter for a single input
pub type FilterOutput = Box<dyn Iterator<Item = RawVideoFrame> + Send>;

/// Builds a filter from its parameter string
pub type FilterFactory = Box<dyn Fn(&str) -> Result<Box<dyn Filter>> + Send>;

/// Video filter trait
pub trait Filter: Send {
    /// Run the filter on one frame
    fn execute(&mut self, frame: RawVideoFrame) -> Result<FilterOutput>;
}

/// Output rate of a deinterlacer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRate {
    /// One output frame per input frame
    Frame,
    /// One output frame per input field
    Field,
}

/// Field parity assumed by a deinterlacer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// Use the scan mode reported on each frame
    Auto,
    /// Upper field first
    Upper,
    /// Lower field first
    Lower,
}

/// Parsed filter parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterParams {
    /// Frames pass through unchanged
    Passthrough,
    /// Line deinterlacer
    Yadif { rate: FieldRate, parity: Parity },
}

impl FilterParams {
    /// Parse a parameter string such as `YADIF=1:-1`
    ///
    /// An empty string selects the pass-through filter.
    pub fn parse(params: &str) -> Result<Self> {
        let params = params.trim();
        if params.is_empty() {
            return Ok(FilterParams::Passthrough);
        }

        let (name, args) = params.split_once('=').unwrap_or((params, ""));
        if !name.trim().eq_ignore_ascii_case("yadif") {
            return Err(Error::Filter(format!("Unknown filter: {}", name)));
        }

        let mut args = args.split(':').map(str::trim).filter(|a| !a.is_empty());

        let rate = match args.next() {
            None | Some("0") => FieldRate::Frame,
            Some("1") => FieldRate::Field,
            Some(other) => {
                return Err(Error::Filter(format!("Invalid yadif mode: {}", other)));
            }
        };

        let parity = match args.next() {
            None | Some("-1") => Parity::Auto,
            Some("0") => Parity::Upper,
            Some("1") => Parity::Lower,
            Some(other) => {
                return Err(Error::Filter(format!("Invalid yadif parity: {}", other)));
            }
        };

        if let Some(extra) = args.next() {
            return Err(Error::Filter(format!("Unexpected yadif argument: {}", extra)));
        }

        Ok(FilterParams::Yadif { rate, parity })
    }
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterParams::Passthrough => Ok(()),
            FilterParams::Yadif { rate, parity } => {
                let mode = match rate {
                    FieldRate::Frame => 0,
                    FieldRate::Field => 1,
                };
                let parity = match parity {
                    Parity::Auto => -1,
                    Parity::Upper => 0,
                    Parity::Lower => 1,
                };
                write!(f, "YADIF={}:{}", mode, parity)
            }
        }
    }
}

/// Identity filter
#[derive(Debug, Default)]
pub struct Passthrough;

impl Filter for Passthrough {
    fn execute(&mut self, frame: RawVideoFrame) -> Result<FilterOutput> {
        Ok(Box::new(std::iter::once(frame)))
    }
}

/// Create the built-in filter for a parameter string
pub fn create_filter(params: &str) -> Result<Box<dyn Filter>> {
    match FilterParams::parse(params)? {
        FilterParams::Passthrough => Ok(Box::new(Passthrough)),
        FilterParams::Yadif { rate, parity } => Ok(Box::new(yadif::Yadif::new(rate, parity))),
    }
}
