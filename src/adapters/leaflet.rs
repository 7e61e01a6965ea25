use crate::domain::model::MapPoint;
use crate::domain::ports::{MapPresentation, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;

pub const START_LABEL: &str = "Início";

const COMMANDS_PLACEHOLDER: &str = "__MAP_COMMANDS__";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>cep-route</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
<div id="map"></div>
<script>
const COMMANDS = __MAP_COMMANDS__;
const map = L.map('map').setView([-14.235, -51.9253], 4);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  maxZoom: 19,
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
const layer = L.layerGroup().addTo(map);
let start = null;
let bounds = [];
function text(value) {
  const el = document.createElement('span');
  el.textContent = value;
  return el;
}
const handlers = {
  clear: () => { layer.clearLayers(); start = null; bounds = []; },
  set_start: (c) => {
    start = [c.lat, c.lon];
    L.circleMarker(start, { color: '#c62828', radius: 9 }).bindPopup(text(c.label)).addTo(layer);
    bounds.push(start);
  },
  render: (c) => {
    const line = c.points.map((p) => [p.lat, p.lon]);
    c.points.forEach((p, i) => {
      L.marker([p.lat, p.lon]).bindPopup(text((i + 1) + '. ' + p.label)).addTo(layer);
    });
    const route = start ? [start].concat(line) : line;
    if (route.length > 1) {
      L.polyline(route, { color: '#1565c0', weight: 4 }).addTo(layer);
    }
    bounds = bounds.concat(line);
  },
  fit_to_view: () => {
    if (bounds.length) { map.fitBounds(bounds, { padding: [32, 32] }); }
  }
};
COMMANDS.forEach((c) => handlers[c.cmd](c));
</script>
</body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum MapCommand {
    Clear,
    SetStart { lat: f64, lon: f64, label: String },
    Render { points: Vec<MapPoint> },
    FitToView,
}

/// Map surface backed by a static Leaflet page. Commands are kept as a log
/// that the page replays on load; a `clear` truncates the log.
pub struct LeafletPage<S: Storage> {
    storage: S,
    file_name: String,
    commands: Vec<MapCommand>,
    ready: watch::Sender<bool>,
}

impl<S: Storage> LeafletPage<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            storage,
            file_name: file_name.into(),
            commands: Vec::new(),
            ready,
        }
    }

    /// Receiver that flips to `true` once the initial page has been written.
    pub fn ready_signal(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    /// Writes the empty page and signals readiness.
    pub async fn load(&mut self) -> Result<()> {
        self.commands.clear();
        self.publish().await?;
        self.ready.send_replace(true);
        tracing::debug!("Map page {} loaded", self.file_name);
        Ok(())
    }

    pub fn page_html(&self) -> Result<String> {
        // 避免標籤文字中的 "</script>" 提前結束 script 區塊
        let commands = serde_json::to_string(&self.commands)?.replace("</", "<\\/");
        Ok(PAGE_TEMPLATE.replace(COMMANDS_PLACEHOLDER, &commands))
    }

    async fn publish(&self) -> Result<()> {
        let html = self.page_html()?;
        self.storage
            .write_file(&self.file_name, html.as_bytes())
            .await
    }

    async fn push(&mut self, command: MapCommand) -> Result<()> {
        self.commands.push(command);
        self.publish().await
    }
}

#[async_trait]
impl<S: Storage> MapPresentation for LeafletPage<S> {
    async fn render(&mut self, points: &[MapPoint]) -> Result<()> {
        self.push(MapCommand::Render {
            points: points.to_vec(),
        })
        .await
    }

    async fn set_start(&mut self, latitude: f64, longitude: f64) -> Result<()> {
        self.push(MapCommand::SetStart {
            lat: latitude,
            lon: longitude,
            label: START_LABEL.to_string(),
        })
        .await
    }

    async fn clear(&mut self) -> Result<()> {
        self.commands.clear();
        self.push(MapCommand::Clear).await
    }

    async fn fit_to_view(&mut self) -> Result<()> {
        self.push(MapCommand::FitToView).await
    }
}
