// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read contracts the policies use to load relationship data.
//!
//! Adapters live outside this crate. Policies take identifiers and perform
//! their own reads through these traits so that every decision is computed
//! from fresh data.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::action::Action;
use crate::appointment::Appointment;
use crate::beneficiary::Beneficiary;
use crate::counselor::Counselor;
use crate::types::{ActionId, AppointmentId, BeneficiaryId, CounselorId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
	#[error("repository backend error: {0}")]
	Backend(String),

	#[error("corrupt {entity} {id}: {message}")]
	Corrupt {
		entity: &'static str,
		id: String,
		message: String,
	},
}

#[async_trait]
pub trait CounselorRepository: Send + Sync {
	async fn get(&self, id: &CounselorId) -> Result<Option<Counselor>, RepositoryError>;
}

#[async_trait]
pub trait BeneficiaryRepository: Send + Sync {
	async fn get(&self, id: &BeneficiaryId) -> Result<Option<Beneficiary>, RepositoryError>;

	/// Beneficiaries among `ids` that exist. Unknown ids are skipped.
	async fn find_by_ids(&self, ids: &[BeneficiaryId]) -> Result<Vec<Beneficiary>, RepositoryError>;

	/// Beneficiaries among `ids` whose current counselor is `counselor_id`.
	async fn find_owned_by(
		&self,
		ids: &[BeneficiaryId],
		counselor_id: &CounselorId,
	) -> Result<Vec<Beneficiary>, RepositoryError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
	/// Loads the appointment with its participants and their counselors.
	async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, RepositoryError>;
}

#[async_trait]
pub trait ActionRepository: Send + Sync {
	async fn get(&self, id: &ActionId) -> Result<Option<Action>, RepositoryError>;
}

/// The repositories a [`crate::PolicyEvaluator`] reads from.
#[derive(Clone)]
pub struct Repositories {
	pub counselors: Arc<dyn CounselorRepository>,
	pub beneficiaries: Arc<dyn BeneficiaryRepository>,
	pub appointments: Arc<dyn AppointmentRepository>,
	pub actions: Arc<dyn ActionRepository>,
}

impl Repositories {
	pub fn new(
		counselors: Arc<dyn CounselorRepository>,
		beneficiaries: Arc<dyn BeneficiaryRepository>,
		appointments: Arc<dyn AppointmentRepository>,
		actions: Arc<dyn ActionRepository>,
	) -> Self {
		Self {
			counselors,
			beneficiaries,
			appointments,
			actions,
		}
	}
}
