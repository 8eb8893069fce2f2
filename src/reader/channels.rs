use log::warn;

use super::{QmsTable, ReaderError};
use crate::integrate::{Series, SeriesError};

/// Columns requested from a [`QmsTable`]
#[derive(Debug, Clone, Copy)]
pub struct ChannelRequest<'a> {
    /// Experiment time column, seconds (required)
    pub time_key: &'a str,
    /// Temperature column, kelvin (required when given)
    pub temp_key: Option<&'a str>,
    /// Mass channel labels such as `"28.00"`
    pub masses: &'a [String],
    /// Photodiode current column
    pub photon_key: Option<&'a str>,
}

/// One extracted mass channel
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Header label, e.g. `"28.00"`
    pub label: String,
    /// Raw values, aligned with [`ChannelSet::time_s`]
    pub values: Vec<f64>,
}

/// Channels extracted from a table, keyed by label and aligned on the time axis
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSet {
    /// Experiment time, seconds
    pub time_s: Vec<f64>,
    /// Sample temperature, kelvin
    pub temperature_k: Option<Vec<f64>>,
    /// Mass channels in request order, missing labels excluded
    pub masses: Vec<Channel>,
    /// Photodiode current, amperes
    pub photon_current: Option<Vec<f64>>,
    /// Requested labels that were absent from the header
    pub missing: Vec<String>,
}

impl ChannelSet {
    /// Time series of an arbitrary column aligned with this set
    pub fn series(&self, values: &[f64]) -> Result<Series, SeriesError> {
        Series::new(self.time_s.clone(), values.to_vec())
    }

    /// Look up a mass channel by label
    pub fn mass(&self, label: &str) -> Option<&Channel> {
        self.masses.iter().find(|c| c.label == label)
    }
}

impl QmsTable {
    /// Extract the requested channels.
    ///
    /// The time column, and the temperature column when requested, must be
    /// present. Absent mass or photon labels are logged, recorded in
    /// [`ChannelSet::missing`] and skipped.
    pub fn select(&self, request: &ChannelRequest<'_>) -> Result<ChannelSet, ReaderError> {
        let time_s = self.column(request.time_key)?.to_vec();
        let temperature_k = request
            .temp_key
            .map(|key| self.column(key).map(<[f64]>::to_vec))
            .transpose()?;

        let mut missing = Vec::new();
        let mut masses = Vec::with_capacity(request.masses.len());
        for label in request.masses {
            match self.column(label) {
                Ok(values) => masses.push(Channel {
                    label: label.clone(),
                    values: values.to_vec(),
                }),
                Err(_) => {
                    warn!("Mass {} not found in the data", label);
                    missing.push(label.clone());
                }
            }
        }

        let photon_current = match request.photon_key {
            Some(key) => match self.column(key) {
                Ok(values) => Some(values.to_vec()),
                Err(_) => {
                    warn!("Photon current column {} not found in the data", key);
                    missing.push(key.to_string());
                    None
                }
            },
            None => None,
        };

        Ok(ChannelSet {
            time_s,
            temperature_k,
            masses,
            photon_current,
            missing,
        })
    }
}
