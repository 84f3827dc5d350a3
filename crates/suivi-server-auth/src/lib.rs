// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization core for the counselor/beneficiary follow-up platform.
//!
//! This crate provides:
//! - Domain entities: actors, counselors, beneficiaries, appointments and actions
//! - Repository contracts the policies read relationship data through
//! - Relationship resolvers and the [`PolicyEvaluator`] named policies
//! - [`AppointmentRules`], the appointment creation/update/closure rules
//! - The beneficiary transfer state machine

pub mod action;
pub mod actor;
pub mod appointment;
pub mod authz;
pub mod beneficiary;
pub mod clock;
pub mod counselor;
pub mod error;
pub mod repository;
pub mod rules;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use action::Action;
pub use actor::{Actor, ActorKind};
pub use appointment::{
	Appointment, AppointmentChanges, AppointmentCreator, AppointmentDraft, AppointmentKind,
	AppointmentParticipant, AppointmentStatus, AppointmentType,
};
pub use authz::{
	AgencyScopeResolver, AppointmentScope, AppointmentScopeResolver, AuthorizationDecision,
	DenialReason, DirectOwnership, EngineSettings, InterAgencyOrganizations, OwnershipResolver,
	PolicyEvaluator, RepositoryAgencyScope, TransferHistory, TransferHistoryResolver,
};
pub use beneficiary::Beneficiary;
pub use clock::{Clock, SystemClock};
pub use counselor::Counselor;
pub use error::{AppointmentRuleError, AuthzError};
pub use repository::{
	ActionRepository, AppointmentRepository, BeneficiaryRepository, CounselorRepository,
	Repositories, RepositoryError,
};
pub use rules::AppointmentRules;
pub use types::{
	ActionId, ActorId, AgencyId, AppointmentId, BeneficiaryId, CounselorId, Organization,
	Role, UnknownCodeError,
};
