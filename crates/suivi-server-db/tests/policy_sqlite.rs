// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policies evaluated against SQLite-backed relationship data.

use suivi_server_auth::testing::fixtures;
use suivi_server_auth::{
	Action, Actor, AgencyId, AppointmentChanges, AppointmentDraft, AppointmentParticipant,
	AppointmentRuleError, AppointmentRules, AuthorizationDecision, AuthzError, Beneficiary,
	BeneficiaryId, Counselor, CounselorId, EngineSettings, Organization, PolicyEvaluator,
};
use suivi_server_config::AuthzConfig;
use suivi_server_db::{
	create_memory_pool, sqlite_repositories, SqliteActionRepository, SqliteAppointmentRepository,
	SqliteBeneficiaryRepository, SqliteCounselorRepository,
};

struct Harness {
	counselors: SqliteCounselorRepository,
	beneficiaries: SqliteBeneficiaryRepository,
	appointments: SqliteAppointmentRepository,
	actions: SqliteActionRepository,
	engine: PolicyEvaluator,
}

async fn harness() -> Harness {
	let pool = create_memory_pool().await.unwrap();
	let settings = EngineSettings::try_from(&AuthzConfig::default()).unwrap();
	Harness {
		counselors: SqliteCounselorRepository::new(pool.clone()),
		beneficiaries: SqliteBeneficiaryRepository::new(pool.clone()),
		appointments: SqliteAppointmentRepository::new(pool.clone()),
		actions: SqliteActionRepository::new(pool.clone()),
		engine: PolicyEvaluator::new(sqlite_repositories(&pool), settings),
	}
}

impl Harness {
	async fn counselor(&self, id: &str, org: Organization, agency: Option<&str>) -> Counselor {
		let mut counselor = Counselor::new(id, org).with_name("Nils", "Tavernier");
		counselor.agency_id = agency.map(AgencyId::new);
		self.counselors.save_counselor(&counselor).await.unwrap();
		counselor
	}

	async fn beneficiary(&self, id: &str, counselor: &str) -> Beneficiary {
		let beneficiary = Beneficiary::new(id, Organization::Milo).with_counselor(counselor);
		self.beneficiaries.save_beneficiary(&beneficiary).await.unwrap();
		beneficiary
	}
}

fn ids(ids: &[&str]) -> Vec<BeneficiaryId> {
	ids.iter().map(|id| BeneficiaryId::new(*id)).collect()
}

#[tokio::test]
async fn agency_colleague_scenario() {
	let h = harness().await;
	h.counselor("C1", Organization::Milo, Some("A1")).await;
	h.counselor("C2", Organization::Milo, Some("A1")).await;
	h.beneficiary("B1", "C2").await;
	let c1 = Actor::counselor("C1", Organization::Milo);

	let same_agency = h
		.engine
		.authorize_counselor_for_beneficiary(&c1, &"B1".into())
		.await;
	assert_eq!(same_agency, AuthorizationDecision::Authorized);

	h.counselor("C2", Organization::Milo, Some("A2")).await;
	let other_agency = h
		.engine
		.authorize_counselor_for_beneficiary(&c1, &"B1".into())
		.await;
	assert_eq!(other_agency, AuthorizationDecision::deny());
	assert_eq!(other_agency.into_result(), Err(AuthzError::InsufficientRights));
}

#[tokio::test]
async fn batch_scenario() {
	let h = harness().await;
	h.beneficiary("b1", "c1").await;
	h.beneficiary("b2", "c2").await;
	let c1 = Actor::counselor("c1", Organization::Milo);

	let mixed = h
		.engine
		.authorize_counselor_for_beneficiary_batch(&c1, &ids(&["b1", "b1", "b2"]))
		.await;
	let owned = h
		.engine
		.authorize_counselor_for_beneficiary_batch(&c1, &ids(&["b1", "b1"]))
		.await;
	assert_eq!(mixed, AuthorizationDecision::deny());
	assert_eq!(owned, AuthorizationDecision::Authorized);
}

#[tokio::test]
async fn temporary_transfer_and_reclaim() {
	let h = harness().await;
	let mut b1 = h.beneficiary("b1", "c1").await;
	let c1 = Actor::counselor("c1", Organization::PoleEmploi);

	b1.transfer_to(CounselorId::new("c2"), true);
	h.beneficiaries.save_beneficiary(&b1).await.unwrap();

	let transfer = h
		.engine
		.authorize_counselor_for_transferred_beneficiaries(&c1, &ids(&["b1"]))
		.await;
	let plain = h
		.engine
		.authorize_counselor_for_beneficiary(&c1, &"b1".into())
		.await;
	assert_eq!(transfer, AuthorizationDecision::Authorized);
	assert_eq!(plain, AuthorizationDecision::deny());

	b1.reclaim(CounselorId::new("c1"));
	h.beneficiaries.save_beneficiary(&b1).await.unwrap();
	let reclaimed = h
		.engine
		.authorize_counselor_for_beneficiary(&c1, &"b1".into())
		.await;
	let former_holder = h
		.engine
		.authorize_counselor_for_transferred_beneficiaries(
			&Actor::counselor("c2", Organization::PoleEmploi),
			&ids(&["b1"]),
		)
		.await;
	assert_eq!(reclaimed, AuthorizationDecision::Authorized);
	assert_eq!(former_holder, AuthorizationDecision::deny());
}

#[tokio::test]
async fn collective_appointment_lifecycle() {
	let h = harness().await;
	let creator = h.counselor("c1", Organization::Milo, Some("a1")).await;
	h.counselor("c2", Organization::Milo, Some("a1")).await;
	h.counselor("c3", Organization::Milo, Some("a2")).await;
	h.beneficiary("b1", "c1").await;
	h.beneficiary("b2", "c2").await;
	h.beneficiary("b3", "c3").await;

	let rules = AppointmentRules::new();
	let draft = AppointmentDraft {
		appointment_type: Some("ATELIER".to_string()),
		date: fixtures::date(),
		duration_minutes: 90,
		max_participants: Some(2),
		..AppointmentDraft::default()
	};

	let participants = vec![
		AppointmentParticipant::new("b1").with_counselor("c1", Some(AgencyId::new("a1"))),
		AppointmentParticipant::new("b2").with_counselor("c2", Some(AgencyId::new("a1"))),
		AppointmentParticipant::new("b3").with_counselor("c3", Some(AgencyId::new("a2"))),
	];
	let mixed_agencies = rules
		.validate_create(draft.clone(), &participants, &creator)
		.unwrap_err();
	assert!(matches!(
		mixed_agencies,
		AppointmentRuleError::BeneficiaryNotLinkedToAgency { .. }
	));

	let workshop = rules
		.validate_create(draft, &participants[..2], &creator)
		.unwrap();
	h.appointments.save_appointment(&workshop).await.unwrap();

	let colleague = Actor::counselor("c2", Organization::Milo);
	let outsider = Actor::counselor("c3", Organization::Milo);
	assert!(h
		.engine
		.authorize_counselor_for_appointment(&colleague, &workshop.id)
		.await
		.is_authorized());
	assert_eq!(
		h.engine
			.authorize_counselor_for_appointment(&outsider, &workshop.id)
			.await,
		AuthorizationDecision::deny()
	);
	assert!(h
		.engine
		.authorize_beneficiary_for_appointment(&Actor::beneficiary("b2", Organization::Milo), &workshop.id)
		.await
		.is_authorized());

	let closed = rules
		.validate_close(
			&workshop,
			&ids(&["b2"]),
			&suivi_server_auth::testing::FixedClock::default(),
		)
		.unwrap();
	h.appointments.save_appointment(&closed).await.unwrap();

	let reloaded = h
		.appointments
		.get_appointment(&workshop.id)
		.await
		.unwrap()
		.unwrap();
	let attended: Vec<_> = reloaded
		.participants
		.iter()
		.filter(|p| p.present == Some(true))
		.map(|p| p.beneficiary_id.as_str())
		.collect();
	assert_eq!(attended, vec!["b2"]);
	let err = rules
		.validate_update(&reloaded, AppointmentChanges::from_appointment(&reloaded))
		.unwrap_err();
	assert_eq!(
		AuthzError::from(err),
		AuthzError::InvalidAppointmentRule(AppointmentRuleError::ClosedAppointment)
	);
}

#[tokio::test]
async fn capacity_is_enforced_for_same_agency_participants() {
	let h = harness().await;
	let creator = h.counselor("c1", Organization::Milo, Some("a1")).await;
	let participants: Vec<_> = ["b1", "b2", "b3"]
		.iter()
		.map(|id| AppointmentParticipant::new(*id).with_counselor("c1", Some(AgencyId::new("a1"))))
		.collect();
	let draft = AppointmentDraft {
		appointment_type: Some("INFORMATION_COLLECTIVE".to_string()),
		date: fixtures::date(),
		max_participants: Some(2),
		..AppointmentDraft::default()
	};

	let err = AppointmentRules::new()
		.validate_create(draft, &participants, &creator)
		.unwrap_err();
	assert_eq!(
		err,
		AppointmentRuleError::CapacityExceeded {
			max_participants: 2,
			participants: 3,
		}
	);
}

#[tokio::test]
async fn missing_appointment_is_not_found() {
	let h = harness().await;
	h.counselor("c1", Organization::Milo, Some("a1")).await;
	let decision = h
		.engine
		.authorize_counselor_for_appointment(&Actor::counselor("c1", Organization::Milo), &"nope".into())
		.await;
	assert_eq!(decision.into_result(), Err(AuthzError::NotFound));
}

#[tokio::test]
async fn action_access_follows_its_beneficiary() {
	let h = harness().await;
	h.counselor("C1", Organization::Milo, Some("A1")).await;
	h.counselor("C2", Organization::Milo, Some("A1")).await;
	h.counselor("C3", Organization::Milo, Some("A2")).await;
	h.beneficiary("B1", "C2").await;
	h.actions.save_action(&Action::new("act1", "B1")).await.unwrap();

	let colleague = h
		.engine
		.authorize_counselor_for_action(&Actor::counselor("C1", Organization::Milo), &"act1".into())
		.await;
	let outsider = h
		.engine
		.authorize_counselor_for_action(&Actor::counselor("C3", Organization::Milo), &"act1".into())
		.await;
	let missing = h
		.engine
		.authorize_counselor_for_action(&Actor::counselor("C2", Organization::Milo), &"act9".into())
		.await;
	let own_plan = h
		.engine
		.authorize_beneficiary_self(&Actor::beneficiary("B1", Organization::Milo), &"B1".into())
		.await;

	assert_eq!(colleague, AuthorizationDecision::Authorized);
	assert_eq!(outsider, AuthorizationDecision::deny());
	assert_eq!(missing, AuthorizationDecision::not_found());
	assert_eq!(own_plan, AuthorizationDecision::Authorized);
}
