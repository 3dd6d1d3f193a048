use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::models::trip::{Trip, TripDate};

/// Validated fields for a trip that has not been assigned an id yet.
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub name: String,
    pub start_date: TripDate,
    pub end_date: TripDate,
}

/// All trips in insertion order plus the id counter.
#[derive(Debug)]
pub struct TripTable {
    trips: Vec<Trip>,
    next_id: u64,
}

impl Default for TripTable {
    fn default() -> Self {
        Self {
            trips: Vec::new(),
            next_id: 1,
        }
    }
}

impl TripTable {
    /// Assigns the next id and appends the trip with an empty itinerary.
    pub fn insert(&mut self, draft: TripDraft) -> &Trip {
        let id = self.next_id;
        self.next_id += 1;
        self.trips.push(Trip {
            id,
            name: draft.name,
            start_date: draft.start_date,
            end_date: draft.end_date,
            events: Vec::new(),
        });
        &self.trips[self.trips.len() - 1]
    }

    pub fn get(&self, id: u64) -> Option<&Trip> {
        self.trips.iter().find(|trip| trip.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Trip> {
        self.trips.iter_mut().find(|trip| trip.id == id)
    }

    pub fn remove(&mut self, id: u64) -> Option<Trip> {
        let index = self.trips.iter().position(|trip| trip.id == id)?;
        Some(self.trips.remove(index))
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Process-wide trip storage. Every operation holds the lock for its whole
/// read-modify-write sequence.
#[derive(Clone, Default)]
pub struct TripStore {
    table: Arc<Mutex<TripTable>>,
}

impl TripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self) -> MutexGuard<'_, TripTable> {
        self.table.lock().await
    }
}
