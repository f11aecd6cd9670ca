use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, sync::RwLock};

use crate::{error::AppError, models::trip::Trip};

/// Fixed key the whole trip collection is stored under.
const TRIPS_FILE: &str = "trips.json";

/// Single owner of the trip collection. The collection is loaded once at
/// startup, kept in memory, and written back in full on every append.
#[derive(Clone)]
pub struct StorageService {
    root: Arc<PathBuf>,
    trips: Arc<RwLock<Vec<Trip>>>,
}

impl StorageService {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
            trips: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn trips_path(&self) -> PathBuf {
        self.root().join(TRIPS_FILE)
    }

    /// Creates the data directory and loads whatever collection the store
    /// already holds.
    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        let stored = self.read_collection().await?;
        *self.trips.write().await = stored;
        Ok(())
    }

    /// Adopts `seed` as the collection when the store holds no value yet.
    pub async fn seed_if_missing(&self, seed: Vec<Trip>) -> Result<(), AppError> {
        if fs::try_exists(self.trips_path()).await? {
            return Ok(());
        }
        self.persist(&seed).await?;
        *self.trips.write().await = seed;
        Ok(())
    }

    pub async fn list_trips(&self) -> Vec<Trip> {
        self.trips.read().await.clone()
    }

    pub async fn get_trip(&self, trip_id: &str) -> Option<Trip> {
        self.trips
            .read()
            .await
            .iter()
            .find(|trip| trip.id == trip_id)
            .cloned()
    }

    /// Appends one record and writes the whole resulting collection back to
    /// the store. The in-memory collection only changes once the write has
    /// succeeded.
    pub async fn append_trip(&self, trip: Trip) -> Result<Vec<Trip>, AppError> {
        let mut trips = self.trips.write().await;
        let mut next = Vec::with_capacity(trips.len() + 1);
        next.extend(trips.iter().cloned());
        next.push(trip);
        self.persist(&next).await?;
        *trips = next.clone();
        Ok(next)
    }

    async fn read_collection(&self) -> Result<Vec<Trip>, AppError> {
        let path = self.trips_path();
        if !fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }
        let raw = fs::read(&path).await?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let trips: Vec<Trip> =
            serde_json::from_slice(&raw).map_err(|err| AppError::Other(err.into()))?;
        Ok(trips)
    }

    async fn persist(&self, trips: &[Trip]) -> Result<(), AppError> {
        let data =
            serde_json::to_vec_pretty(trips).map_err(|err| AppError::Other(err.into()))?;
        fs::write(self.trips_path(), data).await?;
        Ok(())
    }
}
