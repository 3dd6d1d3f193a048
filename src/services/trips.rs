use tracing::{debug, info, warn};

use crate::{
    error::{TripError, ValidationError},
    models::trip::{
        count_day_markers, events_from_value, trip_duration, NewTrip, Trip, TripChanges, TripDate,
    },
    services::store::{TripDraft, TripStore},
};

/// Validation and mutation rules for trips.
#[derive(Clone, Default)]
pub struct TripService {
    store: TripStore,
}

impl TripService {
    pub fn new(store: TripStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NewTrip) -> Result<Trip, TripError> {
        let (Some(name), Some(start), Some(end)) = (
            non_empty(input.name),
            non_empty(input.start_date),
            non_empty(input.end_date),
        ) else {
            return Err(reject(ValidationError::MissingFields));
        };

        let start_date = TripDate::parse("startDate", &start).map_err(reject)?;
        let end_date = TripDate::parse("endDate", &end).map_err(reject)?;

        let duration = trip_duration(&start_date, &end_date);
        // Unreachable while the duration is floored at one day.
        if duration < 0 {
            return Err(reject(ValidationError::InvalidRange));
        }

        let mut table = self.store.lock().await;
        let trip = table
            .insert(TripDraft {
                name,
                start_date,
                end_date,
            })
            .clone();
        info!(trip_id = trip.id, name = %trip.name, duration, "trip created");
        Ok(trip)
    }

    pub async fn list(&self) -> Vec<Trip> {
        let table = self.store.lock().await;
        debug!(count = table.len(), "listing trips");
        table.trips().to_vec()
    }

    pub async fn get(&self, id: u64) -> Result<Trip, TripError> {
        let table = self.store.lock().await;
        match table.get(id) {
            Some(trip) => Ok(trip.clone()),
            None => {
                debug!(trip_id = id, "trip not found");
                Err(TripError::NotFound)
            }
        }
    }

    /// Applies a partial update.
    ///
    /// The date range is checked first against the effective new dates. A
    /// supplied event list is then checked against the dates stored before
    /// this call, not the ones being written. Nothing is written unless every
    /// check passes.
    pub async fn update(&self, id: u64, changes: TripChanges) -> Result<Trip, TripError> {
        let mut table = self.store.lock().await;
        let Some(trip) = table.get_mut(id) else {
            debug!(trip_id = id, "trip not found for update");
            return Err(TripError::NotFound);
        };

        let touches_dates = changes.touches_dates();
        let name = match changes.name {
            Some(None) => return Err(reject(ValidationError::NullField { field: "name" })),
            name => name.flatten(),
        };
        let start_date = supplied_date("startDate", changes.start_date.as_ref())?;
        let end_date = supplied_date("endDate", changes.end_date.as_ref())?;

        if touches_dates {
            let effective_start = start_date.as_ref().unwrap_or(&trip.start_date);
            let effective_end = end_date.as_ref().unwrap_or(&trip.end_date);
            let duration = trip_duration(effective_start, effective_end);
            // Unreachable while the duration is floored at one day.
            if duration < 0 {
                return Err(reject(ValidationError::InvalidRange));
            }
        }

        let events = match changes.events {
            Some(value) => {
                let events = events_from_value(value).map_err(reject)?;
                let days = count_day_markers(&events);
                let allowed = trip.duration_days();
                if i64::try_from(days).unwrap_or(i64::MAX) > allowed {
                    warn!(trip_id = id, days, allowed, "too many days in events");
                    return Err(TripError::Validation(ValidationError::TooManyDays {
                        allowed,
                    }));
                }
                Some((events, days))
            }
            None => None,
        };

        if let Some(name) = name {
            trip.name = name;
        }
        if let Some(start_date) = start_date {
            trip.start_date = start_date;
        }
        if let Some(end_date) = end_date {
            trip.end_date = end_date;
        }
        if let Some((events, days)) = events {
            trip.events = events;
            debug!(trip_id = id, count = trip.events.len(), days, "events replaced");
        }

        info!(trip_id = id, "trip updated");
        Ok(trip.clone())
    }

    pub async fn delete(&self, id: u64) -> Result<Trip, TripError> {
        let mut table = self.store.lock().await;
        match table.remove(id) {
            Some(trip) => {
                info!(trip_id = id, name = %trip.name, "trip deleted");
                Ok(trip)
            }
            None => {
                debug!(trip_id = id, "trip not found for deletion");
                Err(TripError::NotFound)
            }
        }
    }

    pub async fn count(&self) -> usize {
        self.store.lock().await.len()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Parses a date field from an update body. `Some(None)` is an explicit `null`.
fn supplied_date(
    field: &'static str,
    value: Option<&Option<String>>,
) -> Result<Option<TripDate>, TripError> {
    match value {
        None => Ok(None),
        Some(Some(raw)) => TripDate::parse(field, raw).map(Some).map_err(reject),
        Some(None) => Err(reject(ValidationError::InvalidDate {
            field,
            value: "null".to_string(),
        })),
    }
}

fn reject(err: ValidationError) -> TripError {
    warn!(code = err.code(), "rejected trip input: {err}");
    TripError::Validation(err)
}
