// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Key and pointer gestures turned into wall actions.
//!
//! An action is armed on key-down (or pointer-down) over an anchor cell and fires on the matching
//! key-up over whatever cell is hovered then. Two-operand actions use both cells.

use std::fmt;

use smol_str::SmolStr;

mod gesture;

pub use gesture::{classify, Direction, Gesture, LONG_PRESS_MS, NEUTRAL_RADIUS};

/// Grid cell index.
pub type CellIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Help,
    List,
    Switch,
    Next,
    Previous,
    NextGlobal,
    PreviousGlobal,
    Delete,
    Move,
    Copy,
    Chat,
    Reload,
    Fullscreen,
    AdjustLayout,
    Backend,
    Settings,
    ModifyList,
    Interact,
    Embed,
    Cut,
    Paste,
    Rotate,
    CloseOverlays,
}

impl ActionKind {
    pub const ALL: [ActionKind; 23] = [
        Self::Help,
        Self::List,
        Self::Switch,
        Self::Next,
        Self::Previous,
        Self::NextGlobal,
        Self::PreviousGlobal,
        Self::Delete,
        Self::Move,
        Self::Copy,
        Self::Chat,
        Self::Reload,
        Self::Fullscreen,
        Self::AdjustLayout,
        Self::Backend,
        Self::Settings,
        Self::ModifyList,
        Self::Interact,
        Self::Embed,
        Self::Cut,
        Self::Paste,
        Self::Rotate,
        Self::CloseOverlays,
    ];

    /// Label shown on the hover overlay while the action is armed.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::List => "list",
            Self::Switch => "switch",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::NextGlobal => "next+",
            Self::PreviousGlobal => "previous+",
            Self::Delete => "delete",
            Self::Move => "move",
            Self::Copy => "copy",
            Self::Chat => "chat",
            Self::Reload => "reload",
            Self::Fullscreen => "fullscreen",
            Self::AdjustLayout => "adjust layout",
            Self::Backend => "backend",
            Self::Settings => "settings",
            Self::ModifyList => "modify list",
            Self::Interact => "interact",
            Self::Embed => "embed",
            Self::Cut => "cut",
            Self::Paste => "paste",
            Self::Rotate => "rotate",
            Self::CloseOverlays => "close",
        }
    }

    pub const fn help(self) -> &'static str {
        match self {
            Self::Help => "Toggles the help overlay",
            Self::List => "Toggles the stream list overlay",
            Self::Switch => "Prompts to select a new stream",
            Self::Next => "Skips to the next stream within the current group",
            Self::Previous => "Skips to the previous stream within the current group",
            Self::NextGlobal => "Skips to the next stream, regardless of current group",
            Self::PreviousGlobal => "Skips to the previous stream, regardless of current group",
            Self::Delete => "Removes the stream, the link will be saved to local storage",
            Self::Move => "Moves the stream between locations",
            Self::Copy => "Copies the stream to another location",
            Self::Chat => "Toggles the chat panel",
            Self::Reload => "Reloads the stream",
            Self::Fullscreen => "Toggles fullscreen",
            Self::AdjustLayout => "Prompts to select new row/column inputs",
            Self::Backend => "Enables use of the backend for fetching video data",
            Self::Settings => "Toggles the settings menu",
            Self::ModifyList => "Toggles the window for modifying the streamer list",
            Self::Interact => "Disable page interactions and allow access to the stream",
            Self::Embed => "Embeds the target link",
            Self::Cut => "Deletes the stream and saves the link to local storage",
            Self::Paste => "Uses local storage to select a stream",
            Self::Rotate => "Rotates the video by 90 degrees",
            Self::CloseOverlays => "Closes all overlay windows",
        }
    }

    /// Key that triggers the action, as reported by a keyboard event.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Help => "h",
            Self::List => "l",
            Self::Switch => "s",
            Self::Next => "n",
            Self::Previous => "p",
            Self::NextGlobal => "j",
            Self::PreviousGlobal => "k",
            Self::Delete => "d",
            Self::Move => "m",
            Self::Copy => "y",
            Self::Chat => "c",
            Self::Reload => "r",
            Self::Fullscreen => "f",
            Self::AdjustLayout => "a",
            Self::Backend => "b",
            Self::Settings => "`",
            Self::ModifyList => "\\",
            Self::Interact => " ",
            Self::Embed => "e",
            Self::Cut => "x",
            Self::Paste => "v",
            Self::Rotate => "z",
            Self::CloseOverlays => "Escape",
        }
    }

    pub const fn is_two_operand(self) -> bool {
        matches!(self, Self::Move | Self::Copy)
    }

    fn lookup(key: &str) -> Option<Self> {
        Some(match key {
            "F11" => Self::Fullscreen,
            "escape" | "Escape" => Self::CloseOverlays,
            _ => return Self::ALL.iter().copied().find(|action| action.key() == key),
        })
    }

    /// Maps a key to its action. With shift held the upper-case spelling is tried first.
    pub fn for_key(key: &str, shift: bool) -> Option<Self> {
        let (upper, lower) = (key.to_uppercase(), key.to_lowercase());
        let (first, second) = if shift { (upper, lower) } else { (lower, upper) };
        Self::lookup(&first).or_else(|| Self::lookup(&second))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A completed action: `target` is the cell under the pointer on release, `anchor` the one under
/// it when the action was armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub action: ActionKind,
    pub target: Option<CellIndex>,
    pub anchor: Option<CellIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    Armed { key: SmolStr, action: ActionKind, anchor: Option<CellIndex> },
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    state: DispatchState,
    gesture: Option<Gesture>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DispatchState {
        &self.state
    }

    pub fn armed(&self) -> Option<ActionKind> {
        match &self.state {
            DispatchState::Idle => None,
            DispatchState::Armed { action, .. } => Some(*action),
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        self.armed().map(ActionKind::name)
    }

    /// Key-down. Repeats of the armed key are ignored; another mapped key swaps the action but
    /// keeps the anchor captured by the first press.
    pub fn press(&mut self, key: &str, shift: bool, hovered: Option<CellIndex>) -> bool {
        let Some(action) = ActionKind::for_key(key, shift) else {
            return false;
        };
        self.arm(key, action, hovered);
        true
    }

    /// Key-up. Fires when the released key maps to the armed action.
    pub fn release(&mut self, key: &str, hovered: Option<CellIndex>) -> Option<Invocation> {
        let action = ActionKind::for_key(key, false)?;
        self.fire(action, hovered)
    }

    /// Focus loss: drop any armed action and the gesture in flight.
    pub fn blur(&mut self) {
        self.state = DispatchState::Idle;
        self.gesture = None;
    }

    /// Pointer-down over `cell` at `(x, y)`; `over_blank` tells whether that cell shows nothing.
    pub fn pointer_down(
        &mut self,
        x: f64,
        y: f64,
        now_ms: u64,
        cell: Option<CellIndex>,
        over_blank: bool,
    ) {
        let gesture = Gesture::begin(x, y, now_ms, over_blank);
        if let Some(action) = gesture.classify(x, y, now_ms) {
            self.arm(action.key(), action, cell);
        }
        self.gesture = Some(gesture);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: u64) {
        let Some(action) = self.gesture.as_ref().and_then(|gesture| gesture.classify(x, y, now_ms))
        else {
            return;
        };
        let anchor = match &self.state {
            DispatchState::Armed { anchor, .. } => *anchor,
            DispatchState::Idle => None,
        };
        self.arm(action.key(), action, anchor);
    }

    pub fn pointer_up(
        &mut self,
        x: f64,
        y: f64,
        now_ms: u64,
        hovered: Option<CellIndex>,
    ) -> Option<Invocation> {
        let gesture = self.gesture.take()?;
        match gesture.classify(x, y, now_ms) {
            Some(action) => self.fire(action, hovered),
            None => {
                self.state = DispatchState::Idle;
                None
            }
        }
    }

    fn arm(&mut self, key: &str, action: ActionKind, hovered: Option<CellIndex>) {
        self.state = match &self.state {
            DispatchState::Armed { key: armed, .. } if armed == key => return,
            DispatchState::Armed { anchor, .. } => {
                DispatchState::Armed { key: SmolStr::new(key), action, anchor: *anchor }
            }
            DispatchState::Idle => {
                DispatchState::Armed { key: SmolStr::new(key), action, anchor: hovered }
            }
        };
    }

    fn fire(&mut self, action: ActionKind, hovered: Option<CellIndex>) -> Option<Invocation> {
        match &self.state {
            DispatchState::Armed { action: armed, anchor, .. } if *armed == action => {
                let invocation = Invocation { action, target: hovered, anchor: *anchor };
                self.state = DispatchState::Idle;
                Some(invocation)
            }
            _ => None,
        }
    }
}
