//! The seven fixed energy-centre frequency bands.
//!
//! Roomtone bands the audible spectrum into seven named ranges used both for
//! acoustic banding and for mapping to the wellness terminology shown to
//! users. The set is closed: there is no way to construct an eighth band or
//! an unrecognised band name.

/// One of the seven fixed frequency bands.
///
/// Variants are ordered by ascending frequency. Each carries its Hz range as
/// a compile-time constant; the ranges are contiguous and non-overlapping.
/// Everything from 1024 Hz up classifies as [`EnergyCentre::Crown`], even
/// above its nominal 4000 Hz upper averaging edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergyCentre {
    /// 32-128 Hz
    Root,
    /// 128-256 Hz
    Sacral,
    /// 256-384 Hz
    SolarPlexus,
    /// 384-512 Hz
    Heart,
    /// 512-768 Hz
    Throat,
    /// 768-1024 Hz
    ThirdEye,
    /// 1024 Hz and above (averaged up to 4000 Hz)
    Crown,
}

impl EnergyCentre {
    /// All bands in ascending frequency order.
    pub const ALL: [EnergyCentre; 7] = [
        EnergyCentre::Root,
        EnergyCentre::Sacral,
        EnergyCentre::SolarPlexus,
        EnergyCentre::Heart,
        EnergyCentre::Throat,
        EnergyCentre::ThirdEye,
        EnergyCentre::Crown,
    ];

    /// The band's `[low, high)` range in Hz.
    ///
    /// For [`EnergyCentre::Crown`] the upper edge bounds spectrum averaging
    /// only; classification by frequency is open-ended upward.
    pub const fn range_hz(self) -> (f32, f32) {
        match self {
            EnergyCentre::Root => (32.0, 128.0),
            EnergyCentre::Sacral => (128.0, 256.0),
            EnergyCentre::SolarPlexus => (256.0, 384.0),
            EnergyCentre::Heart => (384.0, 512.0),
            EnergyCentre::Throat => (512.0, 768.0),
            EnergyCentre::ThirdEye => (768.0, 1024.0),
            EnergyCentre::Crown => (1024.0, 4000.0),
        }
    }

    /// Lowercase band name.
    pub const fn name(self) -> &'static str {
        match self {
            EnergyCentre::Root => "root",
            EnergyCentre::Sacral => "sacral",
            EnergyCentre::SolarPlexus => "solar_plexus",
            EnergyCentre::Heart => "heart",
            EnergyCentre::Throat => "throat",
            EnergyCentre::ThirdEye => "third_eye",
            EnergyCentre::Crown => "crown",
        }
    }

    /// Position of the band in [`EnergyCentre::ALL`].
    pub const fn index(self) -> usize {
        match self {
            EnergyCentre::Root => 0,
            EnergyCentre::Sacral => 1,
            EnergyCentre::SolarPlexus => 2,
            EnergyCentre::Heart => 3,
            EnergyCentre::Throat => 4,
            EnergyCentre::ThirdEye => 5,
            EnergyCentre::Crown => 6,
        }
    }

    /// Classify a frequency into its band.
    ///
    /// Returns `None` for non-finite frequencies and frequencies below the
    /// Root band's lower edge. Frequencies at or above 1024 Hz always map to
    /// [`EnergyCentre::Crown`].
    pub fn for_frequency(hz: f32) -> Option<EnergyCentre> {
        if !hz.is_finite() {
            return None;
        }
        let (crown_low, _) = EnergyCentre::Crown.range_hz();
        if hz >= crown_low {
            return Some(EnergyCentre::Crown);
        }
        EnergyCentre::ALL
            .into_iter()
            .find(|band| {
                let (low, high) = band.range_hz();
                hz >= low && hz < high
            })
    }
}
