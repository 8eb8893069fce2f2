//! Photon flux conversion.
//!
//! The QMS log records the photodiode current (A) of the irradiation lamp.
//! Multiplying each sample by a calibration factor gives the photon flux in
//! photons cm⁻² s⁻¹; integrating that flux over time gives the fluence in
//! photons cm⁻².

use crate::integrate::Series;

/// Default calibration factor, photons cm⁻² s⁻¹ per ampere
pub const DEFAULT_PHOTON_SCALE: f64 = 1.924e22;

/// Convert a photodiode current (A) to photon flux (photons cm⁻² s⁻¹)
#[inline]
pub fn to_photon_flux(current_amperes: f64, photon_scale: f64) -> f64 {
    current_amperes * photon_scale
}

/// Convert a current series into a photon flux series, sample by sample
pub fn flux_series(current: &Series, photon_scale: f64) -> Series {
    current.map_values(|amperes| to_photon_flux(amperes, photon_scale))
}
