//! Menu bar buttons and selection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    File,
    Edit,
    Format,
    View,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuButton {
    pub item: MenuItem,
    pub label: &'static str,
    /// Screen column of the first label char.
    pub column: u16,
    /// Char index of the underlined hotkey within `label`.
    pub hotkey_index: usize,
}

impl MenuButton {
    pub fn hotkey(&self) -> char {
        self.label
            .chars()
            .nth(self.hotkey_index)
            .unwrap_or(' ')
            .to_ascii_lowercase()
    }
}

pub const MENU_BUTTONS: [MenuButton; 5] = [
    MenuButton {
        item: MenuItem::File,
        label: "File",
        column: 0,
        hotkey_index: 0,
    },
    MenuButton {
        item: MenuItem::Edit,
        label: "Edit",
        column: 6,
        hotkey_index: 0,
    },
    MenuButton {
        item: MenuItem::Format,
        label: "Format",
        column: 12,
        hotkey_index: 1,
    },
    MenuButton {
        item: MenuItem::View,
        label: "View",
        column: 20,
        hotkey_index: 0,
    },
    MenuButton {
        item: MenuItem::Help,
        label: "Help",
        column: 26,
        hotkey_index: 0,
    },
];

/// Selected button; wraps around at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuBar {
    active: usize,
}

impl MenuBar {
    pub fn buttons(&self) -> &'static [MenuButton] {
        &MENU_BUTTONS
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> MenuButton {
        MENU_BUTTONS[self.active]
    }

    /// Step the selection by `delta`, wrapping around.
    pub fn move_by(&mut self, delta: isize) {
        let count = MENU_BUTTONS.len() as isize;
        self.active = (self.active as isize + delta).rem_euclid(count) as usize;
    }

    /// Select the button whose hotkey is `key` (case-insensitive). Returns
    /// false and keeps the selection when no button matches.
    pub fn select_hotkey(&mut self, key: char) -> bool {
        let key = key.to_ascii_lowercase();
        match MENU_BUTTONS.iter().position(|b| b.hotkey() == key) {
            Some(index) => {
                self.active = index;
                true
            }
            None => false,
        }
    }
}
