// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory repositories and fixtures for tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::action::Action;
use crate::appointment::Appointment;
use crate::beneficiary::Beneficiary;
use crate::clock::Clock;
use crate::counselor::Counselor;
use crate::repository::{
	ActionRepository, AppointmentRepository, BeneficiaryRepository, CounselorRepository,
	Repositories, RepositoryError,
};
use crate::types::{ActionId, AppointmentId, BeneficiaryId, CounselorId};

/// A `Mutex`-backed store implementing every repository contract.
///
/// Counts reads so tests can assert a policy never touched the store.
#[derive(Default)]
pub struct InMemoryStore {
	counselors: Mutex<HashMap<CounselorId, Counselor>>,
	beneficiaries: Mutex<HashMap<BeneficiaryId, Beneficiary>>,
	appointments: Mutex<HashMap<AppointmentId, Appointment>>,
	actions: Mutex<HashMap<ActionId, Action>>,
	reads: AtomicUsize,
	failing: AtomicBool,
}

impl InMemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert_counselor(&self, counselor: Counselor) {
		self.counselors
			.lock()
			.unwrap()
			.insert(counselor.id.clone(), counselor);
	}

	pub fn insert_beneficiary(&self, beneficiary: Beneficiary) {
		self.beneficiaries
			.lock()
			.unwrap()
			.insert(beneficiary.id.clone(), beneficiary);
	}

	pub fn insert_appointment(&self, appointment: Appointment) {
		self.appointments
			.lock()
			.unwrap()
			.insert(appointment.id.clone(), appointment);
	}

	pub fn insert_action(&self, action: Action) {
		self.actions.lock().unwrap().insert(action.id.clone(), action);
	}

	/// Makes every subsequent read fail with a backend error.
	pub fn fail_reads(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	pub fn read_count(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	/// The same store behind every repository contract.
	pub fn repositories(store: &Arc<Self>) -> Repositories {
		Repositories::new(store.clone(), store.clone(), store.clone(), store.clone())
	}

	fn read(&self) -> Result<(), RepositoryError> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		if self.failing.load(Ordering::SeqCst) {
			return Err(RepositoryError::Backend("store unavailable".to_string()));
		}
		Ok(())
	}
}

#[async_trait]
impl CounselorRepository for InMemoryStore {
	async fn get(&self, id: &CounselorId) -> Result<Option<Counselor>, RepositoryError> {
		self.read()?;
		Ok(self.counselors.lock().unwrap().get(id).cloned())
	}
}

#[async_trait]
impl BeneficiaryRepository for InMemoryStore {
	async fn get(&self, id: &BeneficiaryId) -> Result<Option<Beneficiary>, RepositoryError> {
		self.read()?;
		Ok(self.beneficiaries.lock().unwrap().get(id).cloned())
	}

	async fn find_by_ids(&self, ids: &[BeneficiaryId]) -> Result<Vec<Beneficiary>, RepositoryError> {
		self.read()?;
		let beneficiaries = self.beneficiaries.lock().unwrap();
		Ok(ids
			.iter()
			.filter_map(|id| beneficiaries.get(id).cloned())
			.collect())
	}

	async fn find_owned_by(
		&self,
		ids: &[BeneficiaryId],
		counselor_id: &CounselorId,
	) -> Result<Vec<Beneficiary>, RepositoryError> {
		self.read()?;
		let beneficiaries = self.beneficiaries.lock().unwrap();
		Ok(ids
			.iter()
			.filter_map(|id| beneficiaries.get(id))
			.filter(|b| b.current_counselor_id.as_ref() == Some(counselor_id))
			.cloned()
			.collect())
	}
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
	async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, RepositoryError> {
		self.read()?;
		Ok(self.appointments.lock().unwrap().get(id).cloned())
	}
}

#[async_trait]
impl ActionRepository for InMemoryStore {
	async fn get(&self, id: &ActionId) -> Result<Option<Action>, RepositoryError> {
		self.read()?;
		Ok(self.actions.lock().unwrap().get(id).cloned())
	}
}

/// A clock stuck at one instant.
///
/// The default instant is after [`fixtures::date`], so fixture appointments
/// have already taken place.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		self.0
	}
}

impl Default for FixedClock {
	fn default() -> Self {
		Self(Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap())
	}
}

pub mod fixtures {
	use super::*;
	use crate::appointment::{AppointmentCreator, AppointmentType};
	use crate::types::AgencyId;

	pub fn date() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).unwrap()
	}

	fn appointment(id: &str, creator: &str, appointment_type: AppointmentType) -> Appointment {
		Appointment {
			id: AppointmentId::new(id),
			appointment_type,
			title: "Rendez-vous conseiller".to_string(),
			subtitle: "avec Nils".to_string(),
			comment: None,
			modality: None,
			date: date(),
			duration_minutes: 30,
			participants: Vec::new(),
			precision: None,
			address: None,
			organizer: None,
			counselor_present: true,
			invitation: None,
			creator: AppointmentCreator {
				id: CounselorId::new(creator),
				first_name: "Nils".to_string(),
				last_name: "Tavernier".to_string(),
			},
			agency_id: None,
			closed_at: None,
			max_participants: None,
		}
	}

	/// A counselor interview with no participants.
	pub fn individual_appointment(id: &str, creator: &str) -> Appointment {
		appointment(id, creator, AppointmentType::CounselorInterview)
	}

	/// A workshop scoped to `agency`, with no participants.
	pub fn collective_appointment(id: &str, creator: &str, agency: Option<&str>) -> Appointment {
		let mut appointment = appointment(id, creator, AppointmentType::Workshop);
		appointment.agency_id = agency.map(AgencyId::new);
		appointment
	}
}
