use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

/// A closed ring of lon/lat coordinates. The first ring of a polygon is
/// the outer boundary, any further rings are holes.
pub type Ring = Vec<(f64, f64)>;

#[derive(Debug, Clone)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

/// One country shape, keyed by the same id scheme as the country catalog.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub polygons: Vec<Polygon>,
}

/// Region boundaries for the whole map, decoded from a GeoJSON-style
/// feature collection. Loaded once; never re-fetched for recoloring.
#[derive(Debug, Clone)]
pub struct WorldTopology {
    pub regions: Vec<Region>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

fn ring_from_coords(coords: Vec<[f64; 2]>) -> Ring {
    coords.into_iter().map(|[lon, lat]| (lon, lat)).collect()
}

impl Feature {
    /// Feature-level id wins; some datasets only carry it as a property.
    fn region_id(&self) -> Option<String> {
        match &self.id {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => self.properties.id.clone(),
        }
    }
}

impl WorldTopology {
    /// Read and decode a topology file. Initialization-time only.
    pub async fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read topology file {path:?}"))?;
        let topology = Self::from_json(&raw)
            .with_context(|| format!("Failed to decode topology file {path:?}"))?;
        info!(?path, regions = topology.regions.len(), "topology loaded");
        Ok(topology)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(raw)?;
        let mut regions = Vec::with_capacity(collection.features.len());

        for feature in collection.features {
            let Some(id) = feature.region_id() else {
                // Unkeyed shapes cannot be colored or clicked; skip them.
                continue;
            };
            let name = feature.properties.name.unwrap_or_default();
            let polygons = match feature.geometry {
                Some(Geometry::Polygon { coordinates }) => vec![Polygon {
                    rings: coordinates.into_iter().map(ring_from_coords).collect(),
                }],
                Some(Geometry::MultiPolygon { coordinates }) => coordinates
                    .into_iter()
                    .map(|rings| Polygon {
                        rings: rings.into_iter().map(ring_from_coords).collect(),
                    })
                    .collect(),
                None => continue,
            };
            regions.push(Region { id, name, polygons });
        }

        Ok(Self { regions })
    }

    /// Lon/lat bounding box over every ring, used to fit the projection.
    pub fn bounds(&self) -> Option<LonLatBounds> {
        let mut bounds: Option<LonLatBounds> = None;
        for region in &self.regions {
            for polygon in &region.polygons {
                for ring in &polygon.rings {
                    for &(lon, lat) in ring {
                        let b = bounds.get_or_insert(LonLatBounds {
                            min_lon: lon,
                            max_lon: lon,
                            min_lat: lat,
                            max_lat: lat,
                        });
                        b.min_lon = b.min_lon.min(lon);
                        b.max_lon = b.max_lon.max(lon);
                        b.min_lat = b.min_lat.min(lat);
                        b.max_lat = b.max_lat.max(lat);
                    }
                }
            }
        }
        bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLatBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl LonLatBounds {
    /// The whole world, for datasets that do not span it.
    pub const WORLD: LonLatBounds = LonLatBounds {
        min_lon: -180.0,
        max_lon: 180.0,
        min_lat: -90.0,
        max_lat: 90.0,
    };

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}
