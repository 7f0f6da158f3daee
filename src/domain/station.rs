// Station domain model - altitude bands and the static resort table
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// One of the three elevation tiers a resort reports weather for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeBand {
    Base,
    #[default]
    Mid,
    Top,
}

impl AltitudeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            AltitudeBand::Base => "base",
            AltitudeBand::Mid => "mid",
            AltitudeBand::Top => "top",
        }
    }
}

impl FromStr for AltitudeBand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(AltitudeBand::Base),
            "mid" => Ok(AltitudeBand::Mid),
            "top" => Ok(AltitudeBand::Top),
            other => anyhow::bail!("unknown altitude band: {}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandAltitudes {
    pub base_m: u32,
    pub mid_m: u32,
    pub top_m: u32,
}

impl BandAltitudes {
    pub fn for_band(&self, band: AltitudeBand) -> u32 {
        match band {
            AltitudeBand::Base => self.base_m,
            AltitudeBand::Mid => self.mid_m,
            AltitudeBand::Top => self.top_m,
        }
    }
}

/// Static reference data for one resort. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationProfile {
    pub slug: String,
    pub name: String,
    pub region: String,
    pub country: String,
    pub altitudes: BandAltitudes,
    pub lat: f64,
    pub lon: f64,
    pub open: bool,
}

/// The fixed in-memory station table.
pub fn station_profiles() -> &'static [StationProfile] {
    static PROFILES: OnceLock<Vec<StationProfile>> = OnceLock::new();
    PROFILES.get_or_init(|| {
        vec![
            profile("baqueira-beret", "Baqueira Beret", "Val d'Aran", "ES", 1500, 1800, 2510, 42.6986, 0.9311, true),
            profile("sierra-nevada", "Sierra Nevada", "Granada", "ES", 2100, 2700, 3300, 37.0930, -3.3984, true),
            profile("formigal", "Formigal", "Huesca", "ES", 1510, 1800, 2250, 42.7764, -0.3775, true),
            profile("candanchu", "Candanchú", "Huesca", "ES", 1530, 1800, 2400, 42.7889, -0.5280, true),
            profile("la-molina", "La Molina", "Girona", "ES", 1700, 2000, 2445, 42.3360, 1.9470, true),
            profile("cerler", "Cerler", "Huesca", "ES", 1500, 2100, 2630, 42.5810, 0.5360, false),
        ]
    })
}

pub fn find_station(slug: &str) -> Option<&'static StationProfile> {
    station_profiles().iter().find(|p| p.slug == slug)
}

/// Fallback display name for a slug with no profile entry.
pub fn display_name_from_slug(slug: &str) -> String {
    // Convert "la-molina" to "La Molina"
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn profile(
    slug: &str,
    name: &str,
    region: &str,
    country: &str,
    base_m: u32,
    mid_m: u32,
    top_m: u32,
    lat: f64,
    lon: f64,
    open: bool,
) -> StationProfile {
    StationProfile {
        slug: slug.to_string(),
        name: name.to_string(),
        region: region.to_string(),
        country: country.to_string(),
        altitudes: BandAltitudes { base_m, mid_m, top_m },
        lat,
        lon,
        open,
    }
}
