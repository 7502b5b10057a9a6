// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A wall is a grid of stream references; the directory holds streamers with their handles,
//! aliases and live status.

pub mod grid;
pub mod ids;
pub mod stream_ref;
pub mod streamer;

pub use grid::{checked_capacity, Grid, GridError, MAX_CELLS};
pub use ids::{Id, IdError, StreamerName};
pub use stream_ref::{Platform, StreamRef, StreamRefError, StreamType};
pub use streamer::{ChannelHandles, GroupPath, LiveStatus, StreamState, Streamer};
