// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docuscan-server — axum HTTP surface over the compositor, the Paperless
// client, and the settings store.

pub mod api;
pub mod error;
pub mod state;

pub use api::build_router;
pub use error::ApiError;
pub use state::AppState;
