use crate::core::registration::RegistrationPipeline;
use crate::core::route_list::{ListChange, RouteList};
use crate::domain::model::{Cep, Entry, MapPoint};
use crate::domain::ports::{
    AddressResolver, CoordinateResolver, DeviceLocationProvider, MapPresentation,
};
use crate::utils::error::{RegistrationError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    /// No entry has coordinates; the map was not touched.
    NothingToShow,
    Rendered { points: usize, with_start: bool },
}

/// Owns the route list for one session and routes user actions to it.
pub struct RouteSession<A: AddressResolver, C: CoordinateResolver> {
    list: RouteList,
    pipeline: RegistrationPipeline<A, C>,
}

impl<A: AddressResolver, C: CoordinateResolver> RouteSession<A, C> {
    pub fn new(pipeline: RegistrationPipeline<A, C>) -> Self {
        Self {
            list: RouteList::new(),
            pipeline,
        }
    }

    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&ListChange, &[Entry]) + Send + Sync + 'static,
    {
        self.list.subscribe(listener);
    }

    pub fn entries(&self) -> &[Entry] {
        self.list.entries()
    }

    pub fn list(&self) -> &RouteList {
        &self.list
    }

    pub async fn register(
        &mut self,
        raw: &str,
    ) -> std::result::Result<Option<Entry>, RegistrationError> {
        self.pipeline.register(raw, &mut self.list).await
    }

    pub fn remove(&mut self, cep: &Cep) -> Option<Entry> {
        self.list.remove(cep)
    }

    pub fn move_up(&mut self, cep: &Cep) -> bool {
        self.list.move_up(cep)
    }

    pub fn move_down(&mut self, cep: &Cep) -> bool {
        self.list.move_down(cep)
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    pub async fn open_map<M, L>(&self, map: &mut M, location: &L) -> Result<MapOutcome>
    where
        M: MapPresentation + ?Sized,
        L: DeviceLocationProvider + ?Sized,
    {
        open_map(&self.list, map, location).await
    }
}

/// Hands the plottable part of `list` to the map, optionally with the
/// device position as a start pin.
pub async fn open_map<M, L>(list: &RouteList, map: &mut M, location: &L) -> Result<MapOutcome>
where
    M: MapPresentation + ?Sized,
    L: DeviceLocationProvider + ?Sized,
{
    let snapshot = list.snapshot_with_coordinates();
    if snapshot.is_empty() {
        tracing::warn!("⚠️ No registered CEP has coordinates, nothing to show on the map");
        return Ok(MapOutcome::NothingToShow);
    }

    let points: Vec<MapPoint> = snapshot.iter().filter_map(MapPoint::from_entry).collect();

    map.clear().await?;

    let start = location.current_location().await;
    if let Some(start) = start {
        map.set_start(start.latitude, start.longitude).await?;
    } else {
        tracing::debug!("No device location, map opens without a start pin");
    }

    map.render(&points).await?;
    map.fit_to_view().await?;

    tracing::info!("🗺️ Map updated with {} point(s)", points.len());
    Ok(MapOutcome::Rendered {
        points: points.len(),
        with_start: start.is_some(),
    })
}
