//! Spectral band mapper: frequency-domain frames to energy-centre levels.

use roomtone_core::EnergyCentre;
use serde::{Deserialize, Serialize};

use crate::spectrum::hz_to_bin;

/// One dB level per energy centre.
///
/// A closed, fixed-shape value object: exactly the seven bands, no dynamic
/// keys. Serialises with the band names as field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandLevels {
    /// 32-128 Hz
    pub root: f32,
    /// 128-256 Hz
    pub sacral: f32,
    /// 256-384 Hz
    pub solar_plexus: f32,
    /// 384-512 Hz
    pub heart: f32,
    /// 512-768 Hz
    pub throat: f32,
    /// 768-1024 Hz
    pub third_eye: f32,
    /// 1024 Hz and above
    pub crown: f32,
}

impl BandLevels {
    /// The same level in every band.
    pub const fn splat(db: f32) -> Self {
        Self {
            root: db,
            sacral: db,
            solar_plexus: db,
            heart: db,
            throat: db,
            third_eye: db,
            crown: db,
        }
    }

    /// Build from a per-band function.
    pub fn from_fn(mut f: impl FnMut(EnergyCentre) -> f32) -> Self {
        Self {
            root: f(EnergyCentre::Root),
            sacral: f(EnergyCentre::Sacral),
            solar_plexus: f(EnergyCentre::SolarPlexus),
            heart: f(EnergyCentre::Heart),
            throat: f(EnergyCentre::Throat),
            third_eye: f(EnergyCentre::ThirdEye),
            crown: f(EnergyCentre::Crown),
        }
    }

    /// Level of one band.
    pub fn get(&self, band: EnergyCentre) -> f32 {
        match band {
            EnergyCentre::Root => self.root,
            EnergyCentre::Sacral => self.sacral,
            EnergyCentre::SolarPlexus => self.solar_plexus,
            EnergyCentre::Heart => self.heart,
            EnergyCentre::Throat => self.throat,
            EnergyCentre::ThirdEye => self.third_eye,
            EnergyCentre::Crown => self.crown,
        }
    }

    /// Iterate bands with their levels, in ascending frequency order.
    pub fn iter(&self) -> impl Iterator<Item = (EnergyCentre, f32)> + '_ {
        EnergyCentre::ALL.into_iter().map(|band| (band, self.get(band)))
    }

    /// Levels as an array ordered like [`EnergyCentre::ALL`].
    pub fn to_array(&self) -> [f32; 7] {
        [
            self.root,
            self.sacral,
            self.solar_plexus,
            self.heart,
            self.throat,
            self.third_eye,
            self.crown,
        ]
    }
}

/// Map one frequency-domain frame to averaged band levels.
///
/// Each band's `[low, high)` Hz range is converted to a bin range with
/// nearest-bin rounding and clamped to the frame; the band level is the
/// arithmetic mean of the dB values in that range (dB values are averaged
/// directly, not through the linear domain). An empty bin range yields
/// `-inf`. Pure function of its inputs.
pub fn band_levels(spectrum_db: &[f32], sample_rate: f32, fft_size: usize) -> BandLevels {
    BandLevels::from_fn(|band| {
        let (low_hz, high_hz) = band.range_hz();
        let low = hz_to_bin(low_hz, sample_rate, fft_size).min(spectrum_db.len());
        let high = hz_to_bin(high_hz, sample_rate, fft_size).min(spectrum_db.len());
        if low >= high {
            return f32::NEG_INFINITY;
        }
        let sum: f32 = spectrum_db[low..high].iter().sum();
        sum / (high - low) as f32
    })
}
