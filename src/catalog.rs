use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Spectral line catalog – static reference data
// ---------------------------------------------------------------------------

/// A reference spectral feature at its laboratory (rest) wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectralLine {
    pub element: &'static str,
    pub name: &'static str,
    /// Rest wavelength in Ångströms.
    pub rest_wavelength: f64,
}

impl SpectralLine {
    const fn new(element: &'static str, name: &'static str, rest_wavelength: f64) -> Self {
        Self {
            element,
            name,
            rest_wavelength,
        }
    }
}

impl fmt::Display for SpectralLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.element)
    }
}

/// Known lines grouped by element. Declaration order is significant:
/// line identification returns the first entry within tolerance.
static LINES: &[SpectralLine] = &[
    SpectralLine::new("hydrogen", "H-alpha", 6562.8),
    SpectralLine::new("hydrogen", "H-beta", 4861.3),
    SpectralLine::new("hydrogen", "H-gamma", 4340.5),
    SpectralLine::new("hydrogen", "H-delta", 4101.7),
    SpectralLine::new("hydrogen", "Lyman-alpha", 1215.7),
    SpectralLine::new("oxygen", "[O II]", 3727.0),
    SpectralLine::new("oxygen", "[O III] 4959", 4958.9),
    SpectralLine::new("oxygen", "[O III] 5007", 5006.8),
    SpectralLine::new("nitrogen", "[N II] 6548", 6548.1),
    SpectralLine::new("nitrogen", "[N II] 6583", 6583.5),
    SpectralLine::new("calcium", "Ca II K", 3933.7),
    SpectralLine::new("calcium", "Ca II H", 3968.5),
    SpectralLine::new("sodium", "Na D1", 5895.9),
    SpectralLine::new("sodium", "Na D2", 5889.9),
    SpectralLine::new("magnesium", "Mg I b", 5183.6),
];

/// Every catalog line in declaration order.
pub fn lines() -> &'static [SpectralLine] {
    LINES
}

/// Lines belonging to one element (case-insensitive), in declaration order.
pub fn lines_for(element: &str) -> impl Iterator<Item = &'static SpectralLine> + '_ {
    LINES
        .iter()
        .filter(move |line| line.element.eq_ignore_ascii_case(element))
}

/// Distinct element names in declaration order.
pub fn elements() -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for line in LINES {
        if !out.contains(&line.element) {
            out.push(line.element);
        }
    }
    out
}

/// Look up a line by its exact name, e.g. `"H-alpha"`.
pub fn find(name: &str) -> Option<&'static SpectralLine> {
    LINES.iter().find(|line| line.name == name)
}
