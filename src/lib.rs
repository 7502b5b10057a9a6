// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Streamwall: reference resolution and URL state for a YouTube/Twitch stream wall.
//!
//! Free text and links become typed [`model::StreamRef`]s ([`resolve`]), refs become player URLs
//! ([`embed`]), and the grid of refs lives in the page URL ([`ops`]). A [`directory`] of streamers
//! fed by catalogues and a live-status [`backend`] lets cells follow a streamer rather than a
//! fixed stream.

pub mod action;
pub mod backend;
pub mod config;
pub mod directory;
pub mod embed;
pub mod http;
pub mod logging;
pub mod model;
pub mod ops;
pub mod reconcile;
pub mod resolve;
pub mod store;
pub mod wall;
