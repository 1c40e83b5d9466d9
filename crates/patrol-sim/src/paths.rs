//! Waypoint sources for units.
//!
//! The engine asks a `PathProvider` once per unit at construction time and
//! never again. Providers may hand back any number of waypoints; an empty
//! path is rejected by the engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use patrol_core::error::PathError;
use patrol_core::types::Coords;

/// Supplies the ordered waypoint sequence of each unit.
pub trait PathProvider {
    fn path(&self, unit: u32) -> Result<Vec<Coords>, PathError>;
}

/// Free movement: every unit starts from the same point and loiters there
/// until steered.
#[derive(Debug, Clone, Copy)]
pub struct FixedStart(pub Coords);

impl PathProvider for FixedStart {
    fn path(&self, _unit: u32) -> Result<Vec<Coords>, PathError> {
        Ok(vec![self.0])
    }
}

/// Built-in demo tours for units 0 through 4, drawn for a 1500 m area.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandcraftedPaths;

impl PathProvider for HandcraftedPaths {
    fn path(&self, unit: u32) -> Result<Vec<Coords>, PathError> {
        // Square patrol around the center, shared by units 1-4.
        let square = [
            (460.0, 1050.0),
            (1060.0, 1050.0),
            (1060.0, 450.0),
            (460.0, 450.0),
            (0.0, 1500.0),
        ];
        let tour: Vec<(f64, f64)> = match unit {
            0 => vec![
                (750.0, 750.0),
                (760.0, 750.0),
                (750.0, 750.0),
                (760.0, 750.0),
                (770.0, 750.0),
            ],
            1 => std::iter::once((1280.0, 80.0)).chain(square).collect(),
            2 => std::iter::once((1320.0, 120.0)).chain(square).collect(),
            3 => std::iter::once((1400.0, 160.0)).chain(square).collect(),
            4 => std::iter::once((1500.0, 200.0)).chain(square).collect(),
            _ => return Err(PathError::MissingUnit(unit)),
        };
        Ok(tour.into_iter().map(Coords::from).collect())
    }
}

/// Paths assembled in code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaths {
    paths: HashMap<u32, Vec<Coords>>,
}

impl InMemoryPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path of `unit`, replacing any previous one.
    pub fn with(mut self, unit: u32, path: Vec<Coords>) -> Self {
        self.paths.insert(unit, path);
        self
    }
}

impl From<HashMap<u32, Vec<Coords>>> for InMemoryPaths {
    fn from(paths: HashMap<u32, Vec<Coords>>) -> Self {
        Self { paths }
    }
}

impl PathProvider for InMemoryPaths {
    fn path(&self, unit: u32) -> Result<Vec<Coords>, PathError> {
        self.paths
            .get(&unit)
            .cloned()
            .ok_or(PathError::MissingUnit(unit))
    }
}

/// Tours precomputed per seed and stored as JSON:
///
/// ```json
/// {"drones": [{"index": "0", "tour": ["(1500, 0)", "(1637, 172)"]}]}
/// ```
#[derive(Debug, Clone)]
pub struct TourFile {
    paths: HashMap<u32, Vec<Coords>>,
}

#[derive(Deserialize)]
struct TourDocument {
    drones: Vec<TourEntry>,
}

#[derive(Deserialize)]
struct TourEntry {
    index: String,
    tour: Vec<String>,
}

impl TourFile {
    /// File holding the tours of `seed`: `<prefix><seed>.json`. A trailing
    /// `.json` on the prefix is ignored.
    pub fn file_name(prefix: &str, seed: u64) -> PathBuf {
        let stem = prefix.strip_suffix(".json").unwrap_or(prefix);
        PathBuf::from(format!("{stem}{seed}.json"))
    }

    /// Load the tours of `seed` from `<prefix><seed>.json`.
    pub fn load_for_seed(prefix: &str, seed: u64) -> Result<Self, PathError> {
        Self::load(Self::file_name(prefix, seed))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PathError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PathError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, PathError> {
        let doc: TourDocument = serde_json::from_str(json)?;

        let mut paths = HashMap::with_capacity(doc.drones.len());
        for entry in doc.drones {
            let unit: u32 = entry
                .index
                .trim()
                .parse()
                .map_err(|_| PathError::UnitIndex(entry.index.clone()))?;
            let tour = entry
                .tour
                .iter()
                .map(|w| parse_waypoint(w))
                .collect::<Result<Vec<_>, _>>()?;
            paths.insert(unit, tour);
        }
        Ok(Self { paths })
    }

    /// Number of units with a tour.
    pub fn unit_count(&self) -> usize {
        self.paths.len()
    }
}

impl PathProvider for TourFile {
    fn path(&self, unit: u32) -> Result<Vec<Coords>, PathError> {
        self.paths
            .get(&unit)
            .cloned()
            .ok_or(PathError::MissingUnit(unit))
    }
}

/// Parse a `"(x, y)"` waypoint.
fn parse_waypoint(raw: &str) -> Result<Coords, PathError> {
    let malformed = || PathError::Waypoint(raw.to_string());

    let inner = raw
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(malformed)?;
    let (x, y) = inner.split_once(',').ok_or_else(malformed)?;
    let x: f64 = x.trim().parse().map_err(|_| malformed())?;
    let y: f64 = y.trim().parse().map_err(|_| malformed())?;
    Ok(Coords::new(x, y))
}
