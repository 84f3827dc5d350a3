// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod agency;
mod appointment;
mod ownership;
mod transfer;

pub use agency::{AgencyScopeResolver, RepositoryAgencyScope};
pub use appointment::{AppointmentScope, AppointmentScopeResolver};
pub use ownership::{DirectOwnership, OwnershipResolver};
pub use transfer::{TransferHistory, TransferHistoryResolver};
