// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The wall: grid, directory, dispatcher and local store owned together.
//!
//! Every user action goes through [`Wall::apply_invocation`]. Grid changes come back as
//! [`Effect::Render`] with the cells whose player must change; everything else is an effect the
//! UI layer carries out (prompts, overlays, fullscreen).

use std::fmt;

use crate::action::{ActionKind, CellIndex, Dispatcher, Invocation};
use crate::directory::{Directory, NeighborScope, SearchOptions};
use crate::embed::{compile_chat, EmbedOptions, EmbedUrl};
use crate::model::{Grid, StreamRef, StreamType, Streamer};
use crate::ops::{apply_ops, serialize, ApplyError, GridOp, UrlState};
use crate::reconcile::{CellUpdate, OfflinePolicy, Reconciler};
use crate::resolve::{parse_explicit, resolve, to_link, ResolveError};
use crate::store::{LocalStore, StoreError};

/// Input starting with this asks the backend for a channel search.
const SEARCH_PREFIX: &str = "yt-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    List,
    Settings,
    ModifyList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Players to load, replace or remove.
    Render(Vec<CellUpdate>),
    /// The armed action changed; `None` hides the overlay label.
    Label(Option<&'static str>),
    PromptSwitch { cell: CellIndex },
    PromptEmbed { cell: CellIndex },
    PromptLayout,
    Toggle(Overlay),
    ToggleChat { cell: CellIndex, url: Option<String> },
    ToggleFullscreen,
    Rotate { cell: CellIndex },
    Interact { cell: CellIndex },
    BackendToggled { enabled: bool },
    CloseOverlays,
    /// Input the resolver could not place; ask the backend.
    Refer { cell: CellIndex, input: String },
    /// `yt-<query>` input; ask the backend to search for a channel.
    Search { cell: CellIndex, query: String },
    /// A YouTube ref the directory knows nothing live about; ask the backend who owns it.
    Learn { stream: StreamRef },
}

#[derive(Debug)]
pub enum WallError {
    Apply(ApplyError),
    Resolve(ResolveError),
    Store(StoreError),
}

impl fmt::Display for WallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply(err) => write!(f, "grid update failed: {err}"),
            Self::Resolve(err) => write!(f, "cannot resolve input: {err}"),
            Self::Store(err) => write!(f, "local store: {err}"),
        }
    }
}

impl std::error::Error for WallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Apply(err) => Some(err),
            Self::Resolve(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ApplyError> for WallError {
    fn from(err: ApplyError) -> Self {
        Self::Apply(err)
    }
}

impl From<ResolveError> for WallError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

impl From<StoreError> for WallError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WallOptions {
    pub embed: EmbedOptions,
    pub search: SearchOptions,
    pub offline_policy: OfflinePolicy,
}

#[derive(Debug)]
pub struct Wall {
    directory: Directory,
    state: UrlState,
    dispatcher: Dispatcher,
    store: LocalStore,
    embed: EmbedOptions,
    search: SearchOptions,
    reconciler: Reconciler,
}

impl Wall {
    pub fn new(
        directory: Directory,
        state: UrlState,
        store: LocalStore,
        options: WallOptions,
    ) -> Self {
        Self {
            directory,
            state,
            dispatcher: Dispatcher::new(),
            store,
            embed: options.embed,
            search: options.search,
            reconciler: Reconciler::new(options.offline_policy),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Backend frames and catalogue loads merge through here; the next
    /// [`reconcile`](Self::reconcile) picks up any status change.
    pub fn directory_mut(&mut self) -> &mut Directory {
        &mut self.directory
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn state(&self) -> &UrlState {
        &self.state
    }

    /// Canonical query string for the current grid.
    pub fn query(&self) -> String {
        serialize(&self.state)
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn search_options(&self) -> SearchOptions {
        self.search
    }

    pub fn embed_options(&self) -> &EmbedOptions {
        &self.embed
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Players as of the last render, by cell index.
    pub fn embeds(&self) -> &[Option<EmbedUrl>] {
        self.reconciler.embeds()
    }

    /// Backend location in effect: the URL override first, then the local store.
    pub fn backend_location(&self) -> Option<&str> {
        self.state.backend.as_deref().or_else(|| self.store.backend_location())
    }

    pub fn key_down(&mut self, key: &str, shift: bool, hovered: Option<CellIndex>) -> Vec<Effect> {
        if self.dispatcher.press(key, shift, hovered) {
            vec![Effect::Label(self.dispatcher.label())]
        } else {
            Vec::new()
        }
    }

    pub fn key_up(
        &mut self,
        key: &str,
        hovered: Option<CellIndex>,
    ) -> Result<Vec<Effect>, WallError> {
        match self.dispatcher.release(key, hovered) {
            Some(invocation) => self.finish(invocation),
            None => Ok(Vec::new()),
        }
    }

    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        now_ms: u64,
        cell: Option<CellIndex>,
    ) -> Vec<Effect> {
        let over_blank =
            cell.and_then(|index| self.grid().cell(index)).map_or(true, StreamRef::is_blank);
        self.dispatcher.pointer_down(x, y, now_ms, cell, over_blank);
        vec![Effect::Label(self.dispatcher.label())]
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: u64) -> Vec<Effect> {
        self.dispatcher.pointer_move(x, y, now_ms);
        vec![Effect::Label(self.dispatcher.label())]
    }

    pub fn pointer_up(
        &mut self,
        x: f64,
        y: f64,
        now_ms: u64,
        hovered: Option<CellIndex>,
    ) -> Result<Vec<Effect>, WallError> {
        match self.dispatcher.pointer_up(x, y, now_ms, hovered) {
            Some(invocation) => self.finish(invocation),
            None => Ok(vec![Effect::Label(None)]),
        }
    }

    pub fn blur(&mut self) -> Vec<Effect> {
        self.dispatcher.blur();
        vec![Effect::Label(None)]
    }

    fn finish(&mut self, invocation: Invocation) -> Result<Vec<Effect>, WallError> {
        let mut effects = vec![Effect::Label(None)];
        effects.extend(self.apply_invocation(invocation)?);
        Ok(effects)
    }

    /// Carries out one completed action. Actions aimed at no cell, or at a cell outside the grid,
    /// do nothing.
    pub fn apply_invocation(&mut self, invocation: Invocation) -> Result<Vec<Effect>, WallError> {
        let Invocation { action, target, anchor } = invocation;

        let cell_action = !matches!(
            action,
            ActionKind::Help
                | ActionKind::List
                | ActionKind::Settings
                | ActionKind::ModifyList
                | ActionKind::Fullscreen
                | ActionKind::AdjustLayout
                | ActionKind::Backend
                | ActionKind::CloseOverlays
        );
        let target = target.filter(|&index| index < self.grid().capacity());
        let cell = match (cell_action, target) {
            (true, None) => return Ok(Vec::new()),
            (_, Some(index)) => index,
            (false, None) => 0,
        };

        let effects = match action {
            ActionKind::Help => vec![Effect::Toggle(Overlay::Help)],
            ActionKind::List => vec![Effect::Toggle(Overlay::List)],
            ActionKind::Settings => vec![Effect::Toggle(Overlay::Settings)],
            ActionKind::ModifyList => vec![Effect::Toggle(Overlay::ModifyList)],
            ActionKind::Fullscreen => vec![Effect::ToggleFullscreen],
            ActionKind::AdjustLayout => vec![Effect::PromptLayout],
            ActionKind::CloseOverlays => vec![Effect::CloseOverlays],
            ActionKind::Backend => {
                let enabled = !self.store.backend_enabled();
                self.store.set_backend_enabled(enabled)?;
                vec![Effect::BackendToggled { enabled }]
            }
            ActionKind::Switch => vec![Effect::PromptSwitch { cell }],
            ActionKind::Embed => vec![Effect::PromptEmbed { cell }],
            ActionKind::Rotate => vec![Effect::Rotate { cell }],
            ActionKind::Interact => vec![Effect::Interact { cell }],
            ActionKind::Chat => {
                let url = self
                    .grid()
                    .cell(cell)
                    .and_then(|stream| compile_chat(stream, &self.directory, &self.embed));
                vec![Effect::ToggleChat { cell, url }]
            }
            ActionKind::Reload => self
                .reconciler
                .reload(cell, &self.state.grid, &self.directory, &self.embed)
                .map(|update| vec![Effect::Render(vec![update])])
                .unwrap_or_default(),
            ActionKind::Delete | ActionKind::Cut => self.remove(cell)?,
            ActionKind::Paste => match self.store.take_clipboard()? {
                Some(link) => self.set_from_string(cell, &link)?,
                None => Vec::new(),
            },
            ActionKind::Move => match anchor.filter(|&from| from != cell) {
                Some(from) => self.apply(&[GridOp::Swap { a: from, b: cell }])?,
                None => Vec::new(),
            },
            ActionKind::Copy => match anchor.filter(|&from| from != cell) {
                Some(from) => self.apply(&[GridOp::Copy { from, to: cell }])?,
                None => Vec::new(),
            },
            ActionKind::Next => self.step(cell, 1, NeighborScope::Group)?,
            ActionKind::Previous => self.step(cell, -1, NeighborScope::Group)?,
            ActionKind::NextGlobal => self.step(cell, 1, NeighborScope::Global)?,
            ActionKind::PreviousGlobal => self.step(cell, -1, NeighborScope::Global)?,
        };
        Ok(effects)
    }

    /// Applies a batch against the current revision and renders whatever changed.
    pub fn apply(&mut self, ops: &[GridOp]) -> Result<Vec<Effect>, WallError> {
        let rev = self.state.grid.rev();
        let result = apply_ops(&mut self.state.grid, rev, ops)?;
        self.reconciler.follow(&result.delta, self.state.grid.capacity());
        Ok(self.render())
    }

    /// Resolves free text into `cell`.
    ///
    /// With the backend enabled, `yt-<query>` becomes a channel search, text the resolver cannot
    /// place becomes a refer request, and YouTube refs of unknown status are set and also looked
    /// up.
    pub fn set_from_string(
        &mut self,
        cell: CellIndex,
        input: &str,
    ) -> Result<Vec<Effect>, WallError> {
        let input = input.trim();
        let backend = self.store.backend_enabled();
        if backend && parse_explicit(input).is_none() {
            let query = input.strip_prefix(SEARCH_PREFIX).map(str::trim).unwrap_or_default();
            if !query.is_empty() {
                return Ok(vec![Effect::Search { cell, query: query.to_owned() }]);
            }
        }

        match resolve(input, &self.directory) {
            Ok(stream) => {
                let learn = (backend && self.can_learn(&stream)).then(|| stream.without_extras());
                let mut effects = self.apply(&[GridOp::Set { index: cell, stream }])?;
                effects.extend(learn.map(|stream| Effect::Learn { stream }));
                Ok(effects)
            }
            Err(ResolveError::Unrecognized(_)) if backend => {
                Ok(vec![Effect::Refer { cell, input: input.to_owned() }])
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn resize(&mut self, rows: usize, columns: usize) -> Result<Vec<Effect>, WallError> {
        self.apply(&[GridOp::Resize { rows, columns }])
    }

    /// Periodic status check; reports only cells whose player changed.
    pub fn reconcile(&mut self) -> Vec<Effect> {
        self.render()
    }

    fn render(&mut self) -> Vec<Effect> {
        let updates = self.reconciler.tick(&self.state.grid, &self.directory, &self.embed);
        if updates.is_empty() {
            Vec::new()
        } else {
            vec![Effect::Render(updates)]
        }
    }

    /// Videos no streamer claims, and channels whose streamer has no status yet.
    fn can_learn(&self, stream: &StreamRef) -> bool {
        let owner = self.directory.streamer_for_ref(stream);
        match stream.kind() {
            StreamType::YoutubeVideo => owner.is_none(),
            StreamType::YoutubeChannel | StreamType::YoutubeHandle | StreamType::YoutubeCustom => {
                owner.and_then(Streamer::status).is_none()
            }
            _ => false,
        }
    }

    /// Clears the cell, keeping its link in the clipboard for a later paste.
    fn remove(&mut self, cell: CellIndex) -> Result<Vec<Effect>, WallError> {
        let Some(stream) = self.grid().cell(cell).filter(|stream| !stream.is_blank()) else {
            return Ok(Vec::new());
        };
        let link = to_link(stream);
        self.store.set_clipboard(link)?;
        self.apply(&[GridOp::Clear { index: cell }])
    }

    fn step(
        &mut self,
        cell: CellIndex,
        offset: isize,
        scope: NeighborScope,
    ) -> Result<Vec<Effect>, WallError> {
        let current = self.grid().cell(cell).cloned().unwrap_or_default();
        let Some(next) = self.directory.neighbor(&current, offset, scope) else {
            return Ok(Vec::new());
        };
        let Ok(stream) = StreamRef::new(StreamType::Alias, next.name().as_str()) else {
            return Ok(Vec::new());
        };
        self.apply(&[GridOp::Set { index: cell, stream }])
    }
}
