// --- File: crates/timelish_appointments/src/store.rs ---
//! In-memory appointment store.
//!
//! Real persistence is delegated to whatever sits behind the
//! [`AppointmentStore`] trait; this implementation backs a single-process
//! deployment and the test suite. It is seeded from the tenant's booking
//! catalog at startup.

use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use timelish_common::models::{Appointment, BookingOption, Customer};
use timelish_common::services::{AppointmentStore, BoxFuture, StoreError};
use timelish_config::CatalogConfig;

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
    customers: RwLock<HashMap<Uuid, Customer>>,
    options: RwLock<HashMap<Uuid, BookingOption>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-seeded with the tenant's booking options and
    /// registered customers.
    pub fn from_catalog(catalog: &CatalogConfig) -> Self {
        let options = catalog
            .options
            .iter()
            .map(|option| {
                (
                    option.id,
                    BookingOption {
                        id: option.id,
                        name: option.name.clone(),
                        duration_minutes: option.duration_minutes,
                        price: option.price,
                        deposit_rule: option.deposit.clone(),
                        cancellation: option.cancellation.clone(),
                        reschedule: option.reschedule.clone(),
                    },
                )
            })
            .collect();
        let customers = catalog
            .customers
            .iter()
            .map(|customer| {
                (
                    customer.id,
                    Customer {
                        id: customer.id,
                        name: customer.name.clone(),
                        phone: customer.phone.clone(),
                        deposit_rule: customer.deposit.clone(),
                    },
                )
            })
            .collect();

        Self {
            appointments: RwLock::new(HashMap::new()),
            customers: RwLock::new(customers),
            options: RwLock::new(options),
        }
    }
}

impl AppointmentStore for InMemoryAppointmentStore {
    fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> BoxFuture<'_, Appointment, StoreError> {
        Box::pin(async move {
            let mut appointments = self.appointments.write().await;
            if appointments.contains_key(&appointment.id) {
                return Err(StoreError::Conflict(format!(
                    "Appointment {} already exists",
                    appointment.id
                )));
            }
            appointments.insert(appointment.id, appointment.clone());
            Ok(appointment)
        })
    }

    fn get_appointment(&self, id: Uuid) -> BoxFuture<'_, Option<Appointment>, StoreError> {
        Box::pin(async move { Ok(self.appointments.read().await.get(&id).cloned()) })
    }

    fn get_by_intent_id(
        &self,
        intent_id: &str,
    ) -> BoxFuture<'_, Option<Appointment>, StoreError> {
        let intent_id = intent_id.to_string();
        Box::pin(async move {
            Ok(self
                .appointments
                .read()
                .await
                .values()
                .find(|appointment| {
                    appointment
                        .payment
                        .intent
                        .as_ref()
                        .map(|intent| intent.id == intent_id)
                        .unwrap_or(false)
                })
                .cloned())
        })
    }

    fn update_appointment(
        &self,
        appointment: Appointment,
    ) -> BoxFuture<'_, Appointment, StoreError> {
        Box::pin(async move {
            let mut appointments = self.appointments.write().await;
            if !appointments.contains_key(&appointment.id) {
                return Err(StoreError::NotFound(format!(
                    "Appointment {}",
                    appointment.id
                )));
            }
            appointments.insert(appointment.id, appointment.clone());
            Ok(appointment)
        })
    }

    fn list_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        Box::pin(async move {
            let mut appointments: Vec<Appointment> =
                self.appointments.read().await.values().cloned().collect();
            appointments.sort_by_key(|appointment| appointment.start_time);
            Ok(appointments)
        })
    }

    fn get_customer(&self, id: Uuid) -> BoxFuture<'_, Option<Customer>, StoreError> {
        Box::pin(async move { Ok(self.customers.read().await.get(&id).cloned()) })
    }

    fn insert_customer(&self, customer: Customer) -> BoxFuture<'_, Customer, StoreError> {
        Box::pin(async move {
            let mut customers = self.customers.write().await;
            if customers.contains_key(&customer.id) {
                return Err(StoreError::Conflict(format!(
                    "Customer {} already exists",
                    customer.id
                )));
            }
            customers.insert(customer.id, customer.clone());
            Ok(customer)
        })
    }

    fn get_option(&self, id: Uuid) -> BoxFuture<'_, Option<BookingOption>, StoreError> {
        Box::pin(async move { Ok(self.options.read().await.get(&id).cloned()) })
    }
}
