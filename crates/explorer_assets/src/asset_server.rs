use std::{collections::HashSet, path::Path};

use log::{debug, error, info};
use tokio::runtime::Handle as TokioHandle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use uuid::Uuid;

use crate::{
    asset_events::{AssetEvent, AssetLookup},
    assets::Handle,
    error::AssetError,
    tour::{Tour, load_tour, load_tour_script},
};

/// Reads and validates a tour file. `.js` files are treated as the viewer's
/// `var APP_DATA = ...;` script, anything else as plain JSON.
pub fn read_tour_file(path: &Path) -> Result<Tour, AssetError> {
    let source = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let is_script = path.extension().is_some_and(|ext| ext == "js");
    let tour = if is_script {
        load_tour_script(&source)?
    } else {
        load_tour(&source)?
    };

    Ok(tour)
}

/// Loads tours on the IO runtime and hands the results back over a channel.
pub struct AssetServer {
    event_sender: UnboundedSender<AssetEvent<Tour>>,
    events: UnboundedReceiver<AssetEvent<Tour>>,
    // Issued handles whose event has not been received yet
    pending: HashSet<Uuid>,
    // The "ticket" to the async world
    io_handle: TokioHandle,
}

impl AssetServer {
    pub fn new(io_handle: TokioHandle) -> Self {
        let (event_sender, events) = unbounded_channel();
        Self {
            event_sender,
            events,
            pending: HashSet::new(),
            io_handle,
        }
    }

    /// Starts loading a tour file. Returns immediately; the outcome shows up
    /// in an [`AssetLookup`] after [`AssetServer::flush`] or through
    /// [`AssetServer::wait_for`].
    pub fn load_tour(&mut self, path: impl AsRef<Path>) -> Handle<Tour> {
        let handle = Handle::<Tour>::new();
        let id = handle.id;
        self.pending.insert(id);
        let path = path.as_ref().to_path_buf();
        let sender = self.event_sender.clone();

        // Works from any thread, the runtime handle does the spawning
        self.io_handle.spawn(async move {
            let display = path.display().to_string();
            info!("Loading tour: {display}");

            let read_path = path.clone();
            let result = tokio::task::spawn_blocking(move || read_tour_file(&read_path)).await;

            let event = match result {
                Ok(Ok(asset)) => AssetEvent::Loaded {
                    id,
                    path: display,
                    asset,
                },
                Ok(Err(error)) => AssetEvent::Failed {
                    id,
                    path: display,
                    error,
                },
                Err(join_error) => {
                    error!("Tour loader task for {display} died: {join_error}");
                    AssetEvent::Failed {
                        id,
                        path: display,
                        error: AssetError::WorkerGone,
                    }
                }
            };

            // Receiver gone means nobody cares about the result anymore
            let _ = sender.send(event);
        });

        handle
    }

    /// Moves every finished load into `lookup` without blocking.
    /// Returns how many events were applied.
    pub fn flush(&mut self, lookup: &mut AssetLookup<Tour>) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.pending.remove(&event.id());
            lookup.apply(event);
            applied += 1;
        }
        if applied > 0 {
            debug!("Flushed {applied} asset events");
        }
        applied
    }

    /// Waits until `handle` settles and returns its outcome. Other loads that
    /// finish in the meantime are stored in `lookup`.
    ///
    /// An outcome can be taken once; handles this server did not issue, or
    /// whose outcome was already taken, fail with [`AssetError::UnknownHandle`].
    pub async fn wait_for(
        &mut self,
        handle: Handle<Tour>,
        lookup: &mut AssetLookup<Tour>,
    ) -> Result<Tour, AssetError> {
        if let Some(outcome) = lookup.take(handle) {
            return outcome;
        }

        if !self.pending.contains(&handle.id) {
            return Err(AssetError::UnknownHandle(handle.id));
        }

        while let Some(event) = self.events.recv().await {
            self.pending.remove(&event.id());
            if event.id() == handle.id {
                return event.into_result();
            }
            lookup.apply(event);
        }

        Err(AssetError::WorkerGone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::error::TourError;

    fn asset(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/rumtek_tour")
            .join(name)
    }

    #[test]
    fn reads_json_and_script_forms_alike() {
        let from_json = read_tour_file(&asset("data.json")).unwrap();
        let from_script = read_tour_file(&asset("data.js")).unwrap();
        assert_eq!(from_json, from_script);
        assert_eq!(from_json.name(), "Rumtek_tour");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_tour_file(&asset("missing.json")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[tokio::test]
    async fn loads_tour_in_background() {
        let mut server = AssetServer::new(TokioHandle::current());
        let mut lookup = AssetLookup::default();

        let handle = server.load_tour(asset("data.json"));
        let tour = server.wait_for(handle, &mut lookup).await.unwrap();
        assert_eq!(tour.len(), 6);
    }

    #[tokio::test]
    async fn other_loads_land_in_lookup() {
        let mut server = AssetServer::new(TokioHandle::current());
        let mut lookup = AssetLookup::default();

        let missing = server.load_tour(asset("missing.json"));
        let script = server.load_tour(asset("data.js"));

        let tour = server.wait_for(script, &mut lookup).await.unwrap();
        assert_eq!(tour.entry_scene().unwrap().id, "0-institute_exterior");

        let err = server.wait_for(missing, &mut lookup).await.unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[tokio::test]
    async fn outcome_is_handed_out_once() {
        let mut server = AssetServer::new(TokioHandle::current());
        let mut lookup = AssetLookup::default();

        let handle = server.load_tour(asset("data.json"));
        assert!(server.wait_for(handle, &mut lookup).await.is_ok());

        let again = server.wait_for(handle, &mut lookup).await;
        assert!(matches!(again, Err(AssetError::UnknownHandle(id)) if id == handle.id));
    }

    #[tokio::test]
    async fn foreign_handles_are_rejected() {
        let mut server = AssetServer::new(TokioHandle::current());
        let mut other = AssetServer::new(TokioHandle::current());
        let mut lookup = AssetLookup::default();

        let theirs = other.load_tour(asset("data.json"));
        assert!(matches!(
            server.wait_for(theirs, &mut lookup).await,
            Err(AssetError::UnknownHandle(_))
        ));
        assert!(matches!(
            server.wait_for(Handle::new(), &mut lookup).await,
            Err(AssetError::UnknownHandle(_))
        ));
    }

    #[tokio::test]
    async fn flushed_outcome_is_waited_once() {
        let mut server = AssetServer::new(TokioHandle::current());
        let mut lookup = AssetLookup::default();
        let handle = server.load_tour(asset("data.json"));

        while !lookup.is_settled(handle) {
            server.flush(&mut lookup);
            tokio::task::yield_now().await;
        }

        assert!(server.wait_for(handle, &mut lookup).await.is_ok());
        assert!(matches!(
            server.wait_for(handle, &mut lookup).await,
            Err(AssetError::UnknownHandle(_))
        ));
    }

    #[tokio::test]
    async fn flush_collects_finished_loads() {
        let dir = std::env::temp_dir().join(format!("explorer-assets-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.json");
        std::fs::write(
            &path,
            r#"{"name":"e","scenes":[],"settings":{"mouseViewMode":"drag","autorotateEnabled":false,"fullscreenButton":false,"viewControlButtons":false}}"#,
        )
        .unwrap();

        let mut server = AssetServer::new(TokioHandle::current());
        let mut lookup = AssetLookup::default();
        let handle = server.load_tour(&path);

        while !lookup.is_settled(handle) {
            server.flush(&mut lookup);
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            lookup.error(handle),
            Some(AssetError::Tour(TourError::EmptyTour))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
