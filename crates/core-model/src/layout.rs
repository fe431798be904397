//! Screen geometry.
//!
//! Rows from the top: title (0), rule (1), menu (2), rule (3), then the text
//! region down to the bottom rule (`h - 2`) and the status row (`h - 1`).
//! Regions are expressed in terminal cells. A region that does not fit is
//! empty (zero height); the top bars claim rows first.

pub const TITLE_ROW: u16 = 0;
pub const MENU_ROW: u16 = 2;
pub const TEXT_START_ROW: u16 = 4;
const TOP_RULES: [u16; 2] = [1, 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl LayoutRegion {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub title: LayoutRegion,
    pub menu: LayoutRegion,
    pub text: LayoutRegion,
    pub status: LayoutRegion,
    rules: Vec<u16>,
}

impl Layout {
    pub fn compute(width: u16, height: u16) -> Self {
        let row = |y: u16| {
            if y < height {
                LayoutRegion::new(0, y, width, 1)
            } else {
                LayoutRegion::new(0, y, width, 0)
            }
        };
        let mut rules: Vec<u16> = TOP_RULES.into_iter().filter(|&r| r < height).collect();
        let (status, text_height) = if height > TEXT_START_ROW + 1 {
            rules.push(height - 2);
            (row(height - 1), height - 2 - TEXT_START_ROW)
        } else if height > TEXT_START_ROW {
            (row(height - 1), 0)
        } else {
            (LayoutRegion::new(0, height, width, 0), 0)
        };
        Self {
            width,
            height,
            title: row(TITLE_ROW),
            menu: row(MENU_ROW),
            text: LayoutRegion::new(0, TEXT_START_ROW, width, text_height),
            status,
            rules,
        }
    }

    /// Rows painted with a horizontal rule.
    pub fn rule_rows(&self) -> &[u16] {
        &self.rules
    }
}
