// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Detections of candidate interference and the grid they live on.

use std::io::BufRead;

use log::trace;
use serde::{Deserialize, Serialize};

use super::{DetectionParseError, RfiError};

/// The shape of the (channel x interval) grid that detections are made over.
/// This is fixed for the lifetime of an [`super::RfiVector`] and isn't written
/// with the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    /// The number of frequency channels.
    pub num_chan: usize,

    /// The number of time intervals.
    pub num_int: usize,
}

/// A single candidate detection of periodic interference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// \[Hz\]
    pub freq: f64,

    /// The significance of the detection.
    pub sigma: f64,

    pub channel: usize,

    pub interval: usize,
}

impl Detection {
    /// Check that this detection can be folded into records on the given grid.
    /// [`super::Rfi::update`] doesn't do this check itself.
    pub fn validate(&self, grid: GridShape) -> Result<(), RfiError> {
        if self.channel >= grid.num_chan {
            return Err(RfiError::ChannelOutOfRange {
                channel: self.channel,
                num_chan: grid.num_chan,
            });
        }
        if self.interval >= grid.num_int {
            return Err(RfiError::IntervalOutOfRange {
                interval: self.interval,
                num_int: grid.num_int,
            });
        }
        if !self.freq.is_finite() {
            return Err(RfiError::NonFinite {
                what: "frequency",
                value: self.freq,
            });
        }
        if !self.sigma.is_finite() {
            return Err(RfiError::NonFinite {
                what: "significance",
                value: self.sigma,
            });
        }
        Ok(())
    }
}

/// Parse detections from text. Each non-empty line has four whitespace-separated
/// columns: frequency \[Hz\], significance, channel and interval. Anything after
/// a `#` is ignored.
pub fn parse_detections<R: BufRead>(reader: R) -> Result<Vec<Detection>, DetectionParseError> {
    let mut detections = vec![];
    for (i_line, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = i_line + 1;
        let content = match line.split_once('#') {
            Some((content, _comment)) => content,
            None => line.as_str(),
        };
        let cols: Vec<&str> = content.split_whitespace().collect();
        match cols.as_slice() {
            [] => continue,
            [freq, sigma, channel, interval] => {
                let detection = Detection {
                    freq: parse_col(freq, line_num, "frequency")?,
                    sigma: parse_col(sigma, line_num, "significance")?,
                    channel: parse_col(channel, line_num, "channel index")?,
                    interval: parse_col(interval, line_num, "interval index")?,
                };
                trace!("Line {line_num}: {detection:?}");
                detections.push(detection);
            }
            _ => {
                return Err(DetectionParseError::WrongNumColumns {
                    line_num,
                    num_cols: cols.len(),
                })
            }
        }
    }

    Ok(detections)
}

fn parse_col<T: std::str::FromStr>(
    value: &str,
    line_num: usize,
    what: &'static str,
) -> Result<T, DetectionParseError> {
    value.parse().map_err(|_| DetectionParseError::BadValue {
        line_num,
        value: value.to_string(),
        what,
    })
}
