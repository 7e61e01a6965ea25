use crate::app::commands::{parse_command, Command, HELP};
use crate::app::view::render_list;
use crate::core::normalizer::{classify, CepInput};
use crate::core::session::{MapOutcome, RouteSession};
use crate::core::{
    AddressResolver, Cep, CoordinateResolver, DeviceLocationProvider, MapPresentation,
};
use crate::utils::error::Result;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Terminal front end for a route session. The list is redrawn whenever a
/// change notification arrived while a command ran.
pub struct Console<A, C, M, L>
where
    A: AddressResolver,
    C: CoordinateResolver,
    M: MapPresentation,
    L: DeviceLocationProvider,
{
    session: RouteSession<A, C>,
    map: M,
    location: L,
    map_location: String,
    dirty: Arc<AtomicBool>,
}

impl<A, C, M, L> Console<A, C, M, L>
where
    A: AddressResolver,
    C: CoordinateResolver,
    M: MapPresentation,
    L: DeviceLocationProvider,
{
    pub fn new(
        mut session: RouteSession<A, C>,
        map: M,
        location: L,
        map_location: impl Into<String>,
    ) -> Self {
        let dirty = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&dirty);
        session.on_change(move |change, entries| {
            tracing::debug!("List changed: {:?} ({} entries)", change, entries.len());
            flag.store(true, Ordering::Relaxed);
        });

        Self {
            session,
            map,
            location,
            map_location: map_location.into(),
            dirty,
        }
    }

    pub fn session(&self) -> &RouteSession<A, C> {
        &self.session
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Type a CEP to add it, or 'help'.")?;
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if !self.execute(parse_command(&line), out).await? {
                break;
            }
        }
        Ok(())
    }

    /// Runs one command. Returns `false` when the session should end.
    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        match command {
            Command::Add(raw) => match self.session.register(&raw).await {
                Ok(Some(entry)) => {
                    tracing::info!("✅ Registered {}", entry.cep());
                    if !entry.has_coordinates() {
                        writeln!(out, "{} added without coordinates", entry.cep().formatted())?;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!("Registration failed: {}", e);
                    writeln!(out, "{}", e.user_message())?;
                }
            },
            Command::Remove(raw) => {
                if let Some(cep) = self.target(&raw, "rm", out)? {
                    self.session.remove(&cep);
                }
            }
            Command::Up(raw) => {
                if let Some(cep) = self.target(&raw, "up", out)? {
                    self.session.move_up(&cep);
                }
            }
            Command::Down(raw) => {
                if let Some(cep) = self.target(&raw, "down", out)? {
                    self.session.move_down(&cep);
                }
            }
            Command::Clear => self.session.clear(),
            Command::List => writeln!(out, "{}", render_list(self.session.entries()))?,
            Command::Map => match self.session.open_map(&mut self.map, &self.location).await {
                Ok(MapOutcome::NothingToShow) => {
                    writeln!(out, "No CEP with coordinates to show on the map")?
                }
                Ok(MapOutcome::Rendered { points, with_start }) => {
                    let start = if with_start { " with start pin" } else { "" };
                    writeln!(
                        out,
                        "Map with {} point(s){} written to {}",
                        points, start, self.map_location
                    )?;
                }
                // 地圖失敗不影響清單，工作階段繼續
                Err(e) => {
                    tracing::warn!("⚠️ Could not update the map: {}", e);
                    writeln!(out, "Could not update the map: {}", e.user_friendly_message())?;
                }
            },
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }

        if self.dirty.swap(false, Ordering::Relaxed) {
            writeln!(out, "{}", render_list(self.session.entries()))?;
        }
        Ok(true)
    }

    /// Resolves the argument of rm/up/down to a CEP that is in the list.
    fn target<W: Write>(&self, raw: &str, keyword: &str, out: &mut W) -> Result<Option<Cep>> {
        match classify(raw) {
            CepInput::Empty => {
                writeln!(out, "Usage: {} <cep>", keyword)?;
                Ok(None)
            }
            CepInput::InvalidLength(_) => {
                writeln!(out, "Invalid CEP: type exactly 8 digits")?;
                Ok(None)
            }
            CepInput::Valid(cep) if !self.session.list().contains(&cep) => {
                writeln!(out, "CEP {} is not in the list", cep.formatted())?;
                Ok(None)
            }
            CepInput::Valid(cep) => Ok(Some(cep)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registration::RegistrationPipeline;
    use crate::core::{Coordinates, MapPoint};
    use crate::utils::error::{AppError, LookupError};
    use async_trait::async_trait;

    struct KnownAddresses;

    #[async_trait]
    impl AddressResolver for KnownAddresses {
        async fn resolve(&self, cep: &Cep) -> std::result::Result<String, LookupError> {
            match cep.as_str() {
                "99999999" => Err(LookupError::NotFound(cep.to_string())),
                "00000000" => Ok(String::new()),
                other => Ok(format!("Rua {}, Natal, RN", other)),
            }
        }
    }

    struct NoCoordinatesFor0;

    #[async_trait]
    impl CoordinateResolver for NoCoordinatesFor0 {
        async fn resolve(&self, query: &str) -> Option<Coordinates> {
            (!query.starts_with('(')).then(|| Coordinates::new(-5.8, -35.2))
        }
    }

    #[derive(Default)]
    struct PointCounter {
        rendered: Vec<usize>,
        disk_full: bool,
    }

    #[async_trait]
    impl MapPresentation for PointCounter {
        async fn render(&mut self, points: &[MapPoint]) -> Result<()> {
            if self.disk_full {
                return Err(AppError::IoError(std::io::Error::other("disk full")));
            }
            self.rendered.push(points.len());
            Ok(())
        }

        async fn set_start(&mut self, _latitude: f64, _longitude: f64) -> Result<()> {
            Ok(())
        }

        async fn clear(&mut self) -> Result<()> {
            Ok(())
        }

        async fn fit_to_view(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct Nowhere;

    #[async_trait]
    impl DeviceLocationProvider for Nowhere {
        async fn current_location(&self) -> Option<Coordinates> {
            None
        }
    }

    type TestConsole = Console<KnownAddresses, NoCoordinatesFor0, PointCounter, Nowhere>;

    fn console() -> TestConsole {
        let session =
            RouteSession::new(RegistrationPipeline::new(KnownAddresses, NoCoordinatesFor0));
        Console::new(session, PointCounter::default(), Nowhere, "output/map.html")
    }

    async fn run_script(console: &mut TestConsole, script: &str) -> String {
        let mut out = Vec::new();
        console.run(script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    fn order(console: &TestConsole) -> Vec<String> {
        console
            .session()
            .entries()
            .iter()
            .map(|e| e.cep().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_script_registers_and_reorders() {
        let mut console = console();
        let output = run_script(
            &mut console,
            "59064-320\nadd 01001000\n\n   \nup 01001-000\nmap\nquit\nadd 22222222\n",
        )
        .await;

        assert_eq!(order(&console), vec!["01001000", "59064320"]);
        assert_eq!(console.map().rendered, vec![2]);
        assert!(output.contains("Map with 2 point(s) written to output/map.html"));
        assert!(output.contains(" 1. 01001-000  Rua 01001000, Natal, RN"));
    }

    #[tokio::test]
    async fn test_errors_print_user_messages() {
        let mut console = console();
        let output = run_script(
            &mut console,
            "123\n59064320\n59064320\n99999999\nrm\nrm 11111111\n",
        )
        .await;

        assert!(output.contains("Invalid CEP: type exactly 8 digits"));
        assert!(output.contains("CEP 59064320 is already in the list"));
        assert!(output.contains("Could not look up CEP 99999999"));
        assert!(output.contains("Usage: rm <cep>"));
        assert!(output.contains("CEP 11111-111 is not in the list"));
        assert_eq!(order(&console), vec!["59064320"]);
    }

    #[tokio::test]
    async fn test_empty_input_prints_nothing() {
        let mut console = console();
        let mut out = Vec::new();
        let keep_going = console
            .execute(Command::Add("  ".to_string()), &mut out)
            .await
            .unwrap();
        assert!(keep_going);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_map_without_plottable_entries() {
        let mut console = console();
        let output = run_script(&mut console, "00000000\nmap\n").await;

        assert!(output.contains("added without coordinates"));
        assert!(output.contains("No CEP with coordinates to show on the map"));
        assert!(console.map().rendered.is_empty());
    }

    #[tokio::test]
    async fn test_list_redrawn_only_after_changes() {
        let mut console = console();
        let mut out = Vec::new();

        console
            .execute(Command::Add("11111111".to_string()), &mut out)
            .await
            .unwrap();
        let after_add = String::from_utf8(out.clone()).unwrap();
        assert!(after_add.contains(" 1. 11111-111"));

        out.clear();
        console
            .execute(Command::Up("11111111".to_string()), &mut out)
            .await
            .unwrap();
        assert!(out.is_empty());

        console.execute(Command::Clear, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "(list is empty)\n");
    }

    #[tokio::test]
    async fn test_map_failure_keeps_session_running() {
        let mut console = console();
        console.map.disk_full = true;

        let output = run_script(&mut console, "59064320\nmap\n01001000\nlist\n").await;

        assert!(output.contains("Could not update the map: File system error: disk full"));
        assert_eq!(order(&console), vec!["59064320", "01001000"]);
        assert!(output.contains(" 2. 01001-000  Rua 01001000, Natal, RN"));
        assert!(console.map().rendered.is_empty());
    }
}
