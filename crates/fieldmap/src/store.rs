use crate::geometry::PolygonId;
use crate::storage::KeyValueStore;
use crate::types::{check_ring, LatLng, Polygon};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};

/// Slot holding the serialized polygon collection unless configured otherwise.
pub const DEFAULT_SLOT: &str = "polygons";

/// Ordered collection of field polygons, written through to a key-value slot
/// on every mutation.
///
/// Derived fields are computed on creation and on [`recompute_and_select`];
/// editing coordinates leaves them stale until the polygon is selected again.
///
/// Each mutation writes the new state before adopting it, so a failed write
/// leaves the in-memory collection as it was.
///
/// [`recompute_and_select`]: PolygonStore::recompute_and_select
#[derive(Debug)]
pub struct PolygonStore<S: KeyValueStore> {
    backend: S,
    slot: String,
    polygons: Vec<Polygon>,
    next_id: PolygonId,
    selected: Option<PolygonId>,
}

impl<S: KeyValueStore> PolygonStore<S> {
    /// Load the collection from the default slot.
    pub fn open(backend: S) -> Result<Self> {
        Self::open_slot(backend, DEFAULT_SLOT)
    }

    /// Load the collection from `slot`. Absent or malformed data opens empty.
    pub fn open_slot(backend: S, slot: impl Into<String>) -> Result<Self> {
        let slot = slot.into();
        let polygons = load_polygons(&backend, &slot)?;

        let highest = polygons
            .iter()
            .map(|p| p.id.get())
            .max()
            .unwrap_or(0)
            .max(polygons.len() as u64);
        let floor = highest.checked_add(1).unwrap_or_else(|| {
            warn!("polygon slot '{slot}' holds id {highest}; no ids left to assign");
            u64::MAX
        });
        // A stored counter below the floor would hand out ids already in use.
        let next_id = match load_counter(&backend, &counter_slot(&slot))? {
            Some(stored) => stored.max(floor),
            None => floor,
        };

        info!(
            "loaded {} polygon(s) from slot '{}', next id {}",
            polygons.len(),
            slot,
            next_id
        );

        Ok(Self {
            backend,
            slot,
            polygons,
            next_id: PolygonId::new(next_id),
            selected: None,
        })
    }

    /// Add a polygon with the next free id and freshly computed metrics.
    ///
    /// Rings whose vertices or metrics are not finite are rejected.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        coordinates: Vec<LatLng>,
    ) -> Result<Polygon> {
        let name = name.into();
        check_ring(&coordinates).with_context(|| format!("create polygon '{name}'"))?;

        let id = self.next_id;
        let following = id
            .checked_next()
            .ok_or_else(|| anyhow!("polygon id space exhausted at {id}"))?;

        let polygon = Polygon::new(id, name, coordinates);
        let mut candidate = self.polygons.clone();
        candidate.push(polygon.clone());

        self.write_counter(following)?;
        self.write_polygons(&candidate)?;

        debug!(
            "create polygon {} '{}' ({} vertices, area {:?})",
            id,
            polygon.name,
            polygon.coordinates.len(),
            polygon.area
        );
        self.polygons = candidate;
        self.next_id = following;
        Ok(polygon)
    }

    /// Add an unnamed polygon, as produced by a finished draw gesture.
    pub fn create_drawn(&mut self, coordinates: Vec<LatLng>) -> Result<Polygon> {
        self.create("", coordinates)
    }

    /// Remove every record with `id`. Unknown ids are a no-op, but the
    /// collection is still written back.
    pub fn delete(&mut self, id: PolygonId) -> Result<()> {
        let candidate: Vec<Polygon> = self
            .polygons
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        self.write_polygons(&candidate)?;

        if candidate.len() == self.polygons.len() {
            debug!("delete polygon {id}: no match");
        } else {
            debug!("delete polygon {id}");
        }
        self.polygons = candidate;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    /// Refresh the derived fields of `id`, persist, and make it the selection.
    ///
    /// Returns `None` without touching storage or the selection when `id` is unknown.
    pub fn recompute_and_select(&mut self, id: PolygonId) -> Result<Option<Polygon>> {
        let Some(index) = self.position(id) else {
            debug!("select polygon {id}: no match");
            return Ok(None);
        };

        let mut candidate = self.polygons.clone();
        candidate[index].recompute();
        let polygon = candidate[index].clone();
        self.write_polygons(&candidate)?;

        debug!(
            "select polygon {} (centroid {}, area {:?})",
            id, polygon.centroid, polygon.area
        );
        self.polygons = candidate;
        self.selected = Some(id);
        Ok(Some(polygon))
    }

    /// First polygon whose name equals `name` exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&Polygon> {
        self.polygons.iter().find(|p| p.name == name)
    }

    /// Search-box behaviour: select the exact-name match, or clear the
    /// selection when nothing matches. Metrics are not recomputed.
    pub fn select_by_name(&mut self, query: &str) -> Option<Polygon> {
        let hit = self.find_by_name(query).cloned();
        self.selected = hit.as_ref().map(|p| p.id);
        hit
    }

    /// Change the label of `id`. Returns whether a record matched.
    pub fn rename(&mut self, id: PolygonId, name: impl Into<String>) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let mut candidate = self.polygons.clone();
        candidate[index].name = name.into();
        self.write_polygons(&candidate)?;

        debug!("rename polygon {} to '{}'", id, candidate[index].name);
        self.polygons = candidate;
        Ok(true)
    }

    /// Replace the ring of `id`, leaving `centroid` and `area` as they were.
    /// Returns whether a record matched.
    pub fn update_coordinates(&mut self, id: PolygonId, coordinates: Vec<LatLng>) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        check_ring(&coordinates).with_context(|| format!("update polygon {id}"))?;

        let mut candidate = self.polygons.clone();
        candidate[index].coordinates = coordinates;
        self.write_polygons(&candidate)?;

        debug!(
            "update polygon {} ring ({} vertices); metrics stale until selected",
            id,
            candidate[index].coordinates.len()
        );
        self.polygons = candidate;
        Ok(true)
    }

    /// Snapshot of the collection, in insertion order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn get(&self, id: PolygonId) -> Option<&Polygon> {
        self.polygons.iter().find(|p| p.id == id)
    }

    /// The currently selected polygon, if it still exists.
    pub fn selected(&self) -> Option<&Polygon> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Id the next `create` will assign.
    pub fn next_id(&self) -> PolygonId {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Give back the backend, e.g. to reopen a store over the same slots.
    pub fn into_backend(self) -> S {
        self.backend
    }

    fn position(&self, id: PolygonId) -> Option<usize> {
        self.polygons.iter().position(|p| p.id == id)
    }

    fn write_polygons(&mut self, polygons: &[Polygon]) -> Result<()> {
        let data = serde_json::to_string_pretty(polygons).context("serialize polygons")?;
        self.backend
            .set(&self.slot, &data)
            .with_context(|| format!("write polygon slot '{}'", self.slot))
    }

    fn write_counter(&mut self, next_id: PolygonId) -> Result<()> {
        let key = counter_slot(&self.slot);
        self.backend
            .set(&key, &next_id.get().to_string())
            .with_context(|| format!("write id counter slot '{key}'"))
    }
}

fn counter_slot(slot: &str) -> String {
    format!("{slot}.next_id")
}

fn load_polygons<S: KeyValueStore>(backend: &S, slot: &str) -> Result<Vec<Polygon>> {
    let Some(data) = backend
        .get(slot)
        .with_context(|| format!("read polygon slot '{slot}'"))?
    else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<Polygon>>(&data) {
        Ok(polygons) => Ok(polygons),
        Err(err) => {
            warn!("ignoring malformed polygon slot '{slot}': {err}");
            Ok(Vec::new())
        }
    }
}

fn load_counter<S: KeyValueStore>(backend: &S, key: &str) -> Result<Option<u64>> {
    let Some(data) = backend
        .get(key)
        .with_context(|| format!("read id counter slot '{key}'"))?
    else {
        return Ok(None);
    };

    match data.trim().parse::<u64>() {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("ignoring malformed id counter '{key}': {err}");
            Ok(None)
        }
    }
}
