// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Named authorization policies.
//!
//! Each policy takes an [`Actor`] and the identifiers of the resources it is
//! about, loads the relationship data it needs, and runs the resolvers. The
//! evaluation order is always the same:
//!
//! 1. **Actor kind**: a policy meant for counselors denies beneficiaries (and
//!    vice versa) before any repository read
//! 2. **Input shape**: blank identifiers and empty batches deny
//! 3. **Relationship reads**: a missing appointment is `NotFound`, any other
//!    missing entity or repository failure is `InsufficientRights`
//! 4. **Resolvers**: direct ownership first, agency fallback last
//!
//! Decisions are logged at debug level with the actor and resource ids.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::decision::AuthorizationDecision;
use super::resolvers::{
	AgencyScopeResolver, AppointmentScope, AppointmentScopeResolver, DirectOwnership,
	OwnershipResolver, RepositoryAgencyScope, TransferHistory, TransferHistoryResolver,
};
use super::settings::EngineSettings;
use crate::actor::Actor;
use crate::appointment::Appointment;
use crate::beneficiary::Beneficiary;
use crate::counselor::Counselor;
use crate::repository::{
	ActionRepository, AppointmentRepository, BeneficiaryRepository, CounselorRepository,
	Repositories, RepositoryError,
};
use crate::types::{ActionId, AgencyId, AppointmentId, BeneficiaryId, CounselorId, Role};

/// Outcome of loading the resource a policy is about.
enum Loaded<T> {
	Found(T),
	Missing,
	Failed,
}

fn loaded<T>(entity: &'static str, result: Result<Option<T>, RepositoryError>) -> Loaded<T> {
	match result {
		Ok(Some(value)) => Loaded::Found(value),
		Ok(None) => Loaded::Missing,
		Err(e) => {
			warn!(entity, error = %e, "repository read failed, denying");
			Loaded::Failed
		}
	}
}

/// Unwraps a [`Loaded`] or returns `Denied(InsufficientRights)`.
macro_rules! found_or_deny {
	($loaded:expr) => {
		match $loaded {
			Loaded::Found(value) => value,
			Loaded::Missing | Loaded::Failed => return AuthorizationDecision::deny(),
		}
	};
}

fn log_decision(decision: AuthorizationDecision) -> AuthorizationDecision {
	match decision.denial_reason() {
		None => debug!(decision = ?decision, "authorization granted"),
		Some(reason) => debug!(decision = ?decision, reason = ?reason, "authorization denied"),
	}
	decision
}

/// Evaluates the named authorization policies.
pub struct PolicyEvaluator {
	counselors: Arc<dyn CounselorRepository>,
	beneficiaries: Arc<dyn BeneficiaryRepository>,
	appointments: Arc<dyn AppointmentRepository>,
	actions: Arc<dyn ActionRepository>,
	ownership: Arc<dyn OwnershipResolver>,
	transfers: Arc<dyn TransferHistoryResolver>,
	agency_scope: Arc<dyn AgencyScopeResolver>,
	appointment_scope: Arc<dyn AppointmentScopeResolver>,
}

impl PolicyEvaluator {
	/// Builds an evaluator with the default resolvers.
	pub fn new(repositories: Repositories, settings: EngineSettings) -> Self {
		let agency_scope =
			RepositoryAgencyScope::new(repositories.counselors.clone(), settings.inter_agency);
		Self {
			counselors: repositories.counselors,
			beneficiaries: repositories.beneficiaries,
			appointments: repositories.appointments,
			actions: repositories.actions,
			ownership: Arc::new(DirectOwnership),
			transfers: Arc::new(TransferHistory),
			agency_scope: Arc::new(agency_scope),
			appointment_scope: Arc::new(AppointmentScope::new(settings.legacy_collective_fallback)),
		}
	}

	pub fn with_ownership_resolver(mut self, resolver: Arc<dyn OwnershipResolver>) -> Self {
		self.ownership = resolver;
		self
	}

	pub fn with_transfer_history_resolver(
		mut self,
		resolver: Arc<dyn TransferHistoryResolver>,
	) -> Self {
		self.transfers = resolver;
		self
	}

	pub fn with_agency_scope_resolver(mut self, resolver: Arc<dyn AgencyScopeResolver>) -> Self {
		self.agency_scope = resolver;
		self
	}

	pub fn with_appointment_scope_resolver(
		mut self,
		resolver: Arc<dyn AppointmentScopeResolver>,
	) -> Self {
		self.appointment_scope = resolver;
		self
	}

	// =========================================================================
	// Beneficiary policies
	// =========================================================================

	/// Counselor of the beneficiary, or an inter-agency colleague of that
	/// counselor.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, beneficiary_id = %beneficiary_id)
    )]
	pub async fn authorize_counselor_for_beneficiary(
		&self,
		actor: &Actor,
		beneficiary_id: &BeneficiaryId,
	) -> AuthorizationDecision {
		log_decision(self.evaluate_counselor_for_beneficiary(actor, beneficiary_id, false).await)
	}

	/// Like [`Self::authorize_counselor_for_beneficiary`], and the beneficiary
	/// shares their favorites.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, beneficiary_id = %beneficiary_id)
    )]
	pub async fn authorize_counselor_for_beneficiary_sharing_favorites(
		&self,
		actor: &Actor,
		beneficiary_id: &BeneficiaryId,
	) -> AuthorizationDecision {
		log_decision(self.evaluate_counselor_for_beneficiary(actor, beneficiary_id, true).await)
	}

	/// The actor is `counselor_id` and directly owns the beneficiary. No
	/// agency fallback.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(
            actor_id = %actor.id,
            actor_kind = ?actor.kind,
            counselor_id = %counselor_id,
            beneficiary_id = %beneficiary_id,
        )
    )]
	pub async fn authorize_counselor_for_own_beneficiary(
		&self,
		actor: &Actor,
		counselor_id: &CounselorId,
		beneficiary_id: &BeneficiaryId,
	) -> AuthorizationDecision {
		let decision = async {
			let Some(actor_counselor) = actor.counselor_id() else {
				return AuthorizationDecision::deny();
			};
			if &actor_counselor != counselor_id || beneficiary_id.is_blank() {
				return AuthorizationDecision::deny();
			}
			let beneficiary =
				found_or_deny!(loaded("beneficiary", self.beneficiaries.get(beneficiary_id).await));
			AuthorizationDecision::from_bool(self.ownership.owns_beneficiary(counselor_id, &beneficiary))
		}
		.await;
		log_decision(decision)
	}

	/// Every requested beneficiary is directly owned by the counselor.
	///
	/// Ids are de-duplicated first. An empty request denies.
	#[instrument(
        level = "debug",
        skip(self, actor, beneficiary_ids),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, requested = beneficiary_ids.len())
    )]
	pub async fn authorize_counselor_for_beneficiary_batch(
		&self,
		actor: &Actor,
		beneficiary_ids: &[BeneficiaryId],
	) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = actor.counselor_id() else {
				return AuthorizationDecision::deny();
			};
			let Some(requested) = requested_set(beneficiary_ids) else {
				return AuthorizationDecision::deny();
			};

			let ids: Vec<BeneficiaryId> = requested.iter().cloned().collect();
			let owned = match self.beneficiaries.find_owned_by(&ids, &counselor_id).await {
				Ok(owned) => owned,
				Err(e) => {
					warn!(error = %e, "batch ownership lookup failed, denying");
					return AuthorizationDecision::deny();
				}
			};

			let matched: BTreeSet<&BeneficiaryId> = owned
				.iter()
				.filter(|b| self.ownership.owns_beneficiary(&counselor_id, b))
				.map(|b| &b.id)
				.filter(|id| requested.contains(*id))
				.collect();

			debug!(
				requested = requested.len(),
				matched = matched.len(),
				"batch ownership resolved"
			);
			AuthorizationDecision::from_bool(matched.len() == requested.len())
		}
		.await;
		log_decision(decision)
	}

	/// Every requested beneficiary is, or was before a temporary transfer,
	/// held by the counselor.
	#[instrument(
        level = "debug",
        skip(self, actor, beneficiary_ids),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, requested = beneficiary_ids.len())
    )]
	pub async fn authorize_counselor_for_transferred_beneficiaries(
		&self,
		actor: &Actor,
		beneficiary_ids: &[BeneficiaryId],
	) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = actor.counselor_id() else {
				return AuthorizationDecision::deny();
			};
			let Some(requested) = requested_set(beneficiary_ids) else {
				return AuthorizationDecision::deny();
			};

			let ids: Vec<BeneficiaryId> = requested.iter().cloned().collect();
			let found: BTreeMap<BeneficiaryId, Beneficiary> =
				match self.beneficiaries.find_by_ids(&ids).await {
					Ok(found) => found.into_iter().map(|b| (b.id.clone(), b)).collect(),
					Err(e) => {
						warn!(error = %e, "transfer lookup failed, denying");
						return AuthorizationDecision::deny();
					}
				};

			for id in &requested {
				let authorized = found
					.get(id)
					.is_some_and(|b| self.transfers.was_owner(&counselor_id, b));
				if !authorized {
					debug!(beneficiary_id = %id, "beneficiary never held by counselor");
					return AuthorizationDecision::deny();
				}
			}
			AuthorizationDecision::Authorized
		}
		.await;
		log_decision(decision)
	}

	/// The actor is the beneficiary `beneficiary_id`. No repository read.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, beneficiary_id = %beneficiary_id)
    )]
	pub async fn authorize_beneficiary_self(
		&self,
		actor: &Actor,
		beneficiary_id: &BeneficiaryId,
	) -> AuthorizationDecision {
		let decision = match actor.beneficiary_id() {
			Some(own) => AuthorizationDecision::from_bool(&own == beneficiary_id),
			None => AuthorizationDecision::deny(),
		};
		log_decision(decision)
	}

	// =========================================================================
	// Action policies
	// =========================================================================

	/// The beneficiary the action belongs to passes
	/// [`Self::authorize_counselor_for_beneficiary`].
	///
	/// A missing action is `NotFound`.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, action_id = %action_id)
    )]
	pub async fn authorize_counselor_for_action(
		&self,
		actor: &Actor,
		action_id: &ActionId,
	) -> AuthorizationDecision {
		let decision = async {
			if actor.counselor_id().is_none() || action_id.is_blank() {
				return AuthorizationDecision::deny();
			}
			let action = match loaded("action", self.actions.get(action_id).await) {
				Loaded::Found(action) => action,
				Loaded::Missing => return AuthorizationDecision::not_found(),
				Loaded::Failed => return AuthorizationDecision::deny(),
			};
			debug!(beneficiary_id = %action.beneficiary_id, "action resolved");
			self.evaluate_counselor_for_beneficiary(actor, &action.beneficiary_id, false)
				.await
		}
		.await;
		log_decision(decision)
	}

	// =========================================================================
	// Appointment policies
	// =========================================================================

	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, appointment_id = %appointment_id)
    )]
	pub async fn authorize_counselor_for_appointment(
		&self,
		actor: &Actor,
		appointment_id: &AppointmentId,
	) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = actor.counselor_id() else {
				return AuthorizationDecision::deny();
			};
			let appointment = match self.load_appointment(appointment_id).await {
				Ok(appointment) => appointment,
				Err(denied) => return denied,
			};
			let counselor =
				found_or_deny!(loaded("counselor", self.counselors.get(&counselor_id).await));

			let inter_agency = self.agency_scope.is_inter_agency_enabled(actor.organization);
			AuthorizationDecision::from_bool(self.appointment_scope.counselor_may_access(
				&counselor,
				&appointment,
				inter_agency,
			))
		}
		.await;
		log_decision(decision)
	}

	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, appointment_id = %appointment_id)
    )]
	pub async fn authorize_beneficiary_for_appointment(
		&self,
		actor: &Actor,
		appointment_id: &AppointmentId,
	) -> AuthorizationDecision {
		let decision = async {
			let Some(beneficiary_id) = actor.beneficiary_id() else {
				return AuthorizationDecision::deny();
			};
			let appointment = match self.load_appointment(appointment_id).await {
				Ok(appointment) => appointment,
				Err(denied) => return denied,
			};

			let counselor_agency = if appointment.scoped_agency().is_some() {
				self.counselor_agency_of(&beneficiary_id).await
			} else {
				None
			};

			AuthorizationDecision::from_bool(self.appointment_scope.beneficiary_may_access(
				&beneficiary_id,
				counselor_agency.as_ref(),
				&appointment,
			))
		}
		.await;
		log_decision(decision)
	}

	/// The actor created the appointment or counsels one of its participants.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, appointment_id = %appointment_id)
    )]
	pub async fn authorize_appointment_owner(
		&self,
		actor: &Actor,
		appointment_id: &AppointmentId,
	) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = actor.counselor_id() else {
				return AuthorizationDecision::deny();
			};
			let appointment = match self.load_appointment(appointment_id).await {
				Ok(appointment) => appointment,
				Err(denied) => return denied,
			};
			AuthorizationDecision::from_bool(
				self.ownership.owns_appointment(&counselor_id, &appointment),
			)
		}
		.await;
		log_decision(decision)
	}

	// =========================================================================
	// Counselor and supervisor policies
	// =========================================================================

	/// The actor is a counselor with an existing record.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind)
    )]
	pub async fn authorize_any_counselor(&self, actor: &Actor) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = actor.counselor_id() else {
				return AuthorizationDecision::deny();
			};
			found_or_deny!(loaded("counselor", self.counselors.get(&counselor_id).await));
			AuthorizationDecision::Authorized
		}
		.await;
		log_decision(decision)
	}

	/// The actor is the counselor `counselor_id`, and that counselor exists.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, counselor_id = %counselor_id)
    )]
	pub async fn authorize_counselor_self(
		&self,
		actor: &Actor,
		counselor_id: &CounselorId,
	) -> AuthorizationDecision {
		let decision = async {
			match actor.counselor_id() {
				Some(own) if &own == counselor_id => {}
				_ => return AuthorizationDecision::deny(),
			}
			found_or_deny!(loaded("counselor", self.counselors.get(counselor_id).await));
			AuthorizationDecision::Authorized
		}
		.await;
		log_decision(decision)
	}

	/// The actor is a counselor of `agency_id`.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, agency_id = %agency_id)
    )]
	pub async fn authorize_counselor_of_agency(
		&self,
		actor: &Actor,
		agency_id: &AgencyId,
	) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = actor.counselor_id() else {
				return AuthorizationDecision::deny();
			};
			if agency_id.is_blank() {
				return AuthorizationDecision::deny();
			}
			let counselor =
				found_or_deny!(loaded("counselor", self.counselors.get(&counselor_id).await));
			AuthorizationDecision::from_bool(belongs_to(&counselor, agency_id))
		}
		.await;
		log_decision(decision)
	}

	/// The actor holds the supervisor role and has a counselor record.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind)
    )]
	pub async fn authorize_supervisor(&self, actor: &Actor) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = supervisor_id(actor) else {
				return AuthorizationDecision::deny();
			};
			found_or_deny!(loaded("counselor", self.counselors.get(&counselor_id).await));
			AuthorizationDecision::Authorized
		}
		.await;
		log_decision(decision)
	}

	/// The actor holds the supervisor role and belongs to `agency_id`.
	#[instrument(
        level = "debug",
        skip(self, actor),
        fields(actor_id = %actor.id, actor_kind = ?actor.kind, agency_id = %agency_id)
    )]
	pub async fn authorize_supervisor_of_agency(
		&self,
		actor: &Actor,
		agency_id: &AgencyId,
	) -> AuthorizationDecision {
		let decision = async {
			let Some(counselor_id) = supervisor_id(actor) else {
				return AuthorizationDecision::deny();
			};
			if agency_id.is_blank() {
				return AuthorizationDecision::deny();
			}
			let counselor =
				found_or_deny!(loaded("counselor", self.counselors.get(&counselor_id).await));
			AuthorizationDecision::from_bool(belongs_to(&counselor, agency_id))
		}
		.await;
		log_decision(decision)
	}

	// =========================================================================
	// Shared evaluation steps
	// =========================================================================

	async fn evaluate_counselor_for_beneficiary(
		&self,
		actor: &Actor,
		beneficiary_id: &BeneficiaryId,
		require_shared_favorites: bool,
	) -> AuthorizationDecision {
		let Some(counselor_id) = actor.counselor_id() else {
			return AuthorizationDecision::deny();
		};
		if beneficiary_id.is_blank() {
			return AuthorizationDecision::deny();
		}
		let beneficiary =
			found_or_deny!(loaded("beneficiary", self.beneficiaries.get(beneficiary_id).await));
		if require_shared_favorites && !beneficiary.shares_favorites {
			return AuthorizationDecision::deny();
		}

		AuthorizationDecision::from_bool(
			self.counselor_reaches(actor, &counselor_id, &beneficiary).await,
		)
	}

	/// Direct ownership, or the inter-agency fallback through the
	/// beneficiary's current counselor.
	async fn counselor_reaches(
		&self,
		actor: &Actor,
		counselor_id: &CounselorId,
		beneficiary: &Beneficiary,
	) -> bool {
		if self.ownership.owns_beneficiary(counselor_id, beneficiary) {
			return true;
		}
		if !self.agency_scope.is_inter_agency_enabled(actor.organization) {
			return false;
		}
		match &beneficiary.current_counselor_id {
			Some(current) => self.agency_scope.same_agency_as(counselor_id, current).await,
			None => false,
		}
	}

	async fn load_appointment(
		&self,
		appointment_id: &AppointmentId,
	) -> Result<Appointment, AuthorizationDecision> {
		if appointment_id.is_blank() {
			return Err(AuthorizationDecision::deny());
		}
		match loaded("appointment", self.appointments.get(appointment_id).await) {
			Loaded::Found(appointment) => Ok(appointment),
			Loaded::Missing => Err(AuthorizationDecision::not_found()),
			Loaded::Failed => Err(AuthorizationDecision::deny()),
		}
	}

	/// Agency of the beneficiary's current counselor, if every link exists.
	async fn counselor_agency_of(&self, beneficiary_id: &BeneficiaryId) -> Option<AgencyId> {
		let beneficiary = match loaded("beneficiary", self.beneficiaries.get(beneficiary_id).await)
		{
			Loaded::Found(beneficiary) => beneficiary,
			Loaded::Missing | Loaded::Failed => return None,
		};
		let counselor_id = beneficiary.current_counselor_id?;
		match loaded("counselor", self.counselors.get(&counselor_id).await) {
			Loaded::Found(counselor) => counselor.agency_id.filter(|id| !id.is_blank()),
			Loaded::Missing | Loaded::Failed => None,
		}
	}
}

/// De-duplicated request, or `None` when it is empty or holds a blank id.
fn requested_set(ids: &[BeneficiaryId]) -> Option<BTreeSet<BeneficiaryId>> {
	if ids.is_empty() || ids.iter().any(BeneficiaryId::is_blank) {
		return None;
	}
	Some(ids.iter().cloned().collect())
}

fn supervisor_id(actor: &Actor) -> Option<CounselorId> {
	if !actor.has_role(Role::Supervisor) {
		return None;
	}
	actor.counselor_id()
}

fn belongs_to(counselor: &Counselor, agency_id: &AgencyId) -> bool {
	!agency_id.is_blank() && counselor.agency_id.as_ref() == Some(agency_id)
}
