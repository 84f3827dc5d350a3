// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Relationship-based authorization.
//!
//! Small resolvers each answer one relationship question from loaded data:
//!
//! - [`OwnershipResolver`]: is this counselor the current counselor, or the
//!   creator of an appointment?
//! - [`TransferHistoryResolver`]: did this counselor hold the beneficiary
//!   before a temporary transfer?
//! - [`AgencyScopeResolver`]: may this counselor act for a colleague of the
//!   same agency?
//! - [`AppointmentScopeResolver`]: individual vs collective appointment rules.
//!
//! [`PolicyEvaluator`] composes them into the named policies use-case handlers
//! call. Every policy loads what it needs through the repositories and returns
//! an [`AuthorizationDecision`]. Nothing is cached between calls.

mod decision;
mod engine;
mod resolvers;
mod settings;

pub use decision::{AuthorizationDecision, DenialReason};
pub use engine::PolicyEvaluator;
pub use resolvers::{
	AgencyScopeResolver, AppointmentScope, AppointmentScopeResolver, DirectOwnership,
	OwnershipResolver, RepositoryAgencyScope, TransferHistory, TransferHistoryResolver,
};
pub use settings::{EngineSettings, InterAgencyOrganizations};
