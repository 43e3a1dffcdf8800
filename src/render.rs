//! Flat-color draw list
//!
//! Turns a [`Snapshot`] into axis-aligned rectangles in canvas units. Each
//! cell is `CELL_SIZE` wide and drawn one unit smaller so neighbours keep a
//! gutter. Rasterizing the list is left to the host (canvas 2D, terminal, ...).

use serde::{Deserialize, Serialize};

use crate::consts::{CELL_GUTTER, CELL_SIZE, DEADLY_BLOCK_SIZE};
use crate::settings::{PaletteKind, Settings};
use crate::sim::{Position, Snapshot, footprint_cells};

/// Half-period of hazard blinking (ms)
pub const BLINK_PERIOD_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Colors per entity kind and state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub head: Color,
    pub body: Color,
    pub food: Color,
    pub multiplier: Color,
    pub boosted_body: Color,
    pub blaster_warning: Color,
    pub blaster_armed: Color,
    pub flame: Color,
    pub deadly_block: Color,
    pub deadly_block_flash: Color,
}

impl Palette {
    pub const CLASSIC: Palette = Palette {
        background: Color::rgb(0x11, 0x11, 0x11),
        head: Color::rgb(0x00, 0x64, 0x00),
        body: Color::rgb(0x00, 0xff, 0x88),
        food: Color::rgb(0x00, 0x80, 0x00),
        multiplier: Color::rgb(0xff, 0xd7, 0x00),
        boosted_body: Color::rgb(0xff, 0xe0, 0x66),
        blaster_warning: Color::rgb(0xff, 0xa5, 0x00),
        blaster_armed: Color::rgb(0x8b, 0x00, 0x00),
        flame: Color::rgb(0xff, 0x45, 0x00),
        deadly_block: Color::rgb(0x80, 0x00, 0x80),
        deadly_block_flash: Color::rgb(0xff, 0xff, 0xff),
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        background: Color::rgb(0x00, 0x00, 0x00),
        head: Color::rgb(0xff, 0xff, 0xff),
        body: Color::rgb(0x00, 0xff, 0x00),
        food: Color::rgb(0x00, 0xff, 0xff),
        multiplier: Color::rgb(0xff, 0xff, 0x00),
        boosted_body: Color::rgb(0xff, 0xff, 0x00),
        blaster_warning: Color::rgb(0xff, 0x80, 0x00),
        blaster_armed: Color::rgb(0xff, 0x00, 0x00),
        flame: Color::rgb(0xff, 0x00, 0x00),
        deadly_block: Color::rgb(0xff, 0x00, 0xff),
        deadly_block_flash: Color::rgb(0xff, 0xff, 0xff),
    };

    pub fn for_kind(kind: PaletteKind) -> &'static Palette {
        match kind {
            PaletteKind::Classic => &Self::CLASSIC,
            PaletteKind::HighContrast => &Self::HIGH_CONTRAST,
        }
    }
}

/// A filled rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub color: Color,
}

impl Rect {
    /// Rectangle for one grid cell, with the gutter removed
    pub fn cell(pos: Position, color: Color) -> Self {
        Self {
            x: pos.x.max(0) as u32 * CELL_SIZE,
            y: pos.y.max(0) as u32 * CELL_SIZE,
            w: CELL_SIZE - CELL_GUTTER,
            h: CELL_SIZE - CELL_GUTTER,
            color,
        }
    }
}

/// Whether blinking entities are in their lit half-period
fn blink_on(now: u64) -> bool {
    (now / BLINK_PERIOD_MS) % 2 == 0
}

/// Build the draw list for one frame, back to front
pub fn draw_list(snapshot: &Snapshot, settings: &Settings, now: u64) -> Vec<Rect> {
    let palette = Palette::for_kind(settings.palette);
    let lit = !settings.effective_blink() || blink_on(now);
    let mut rects = Vec::with_capacity(
        1 + snapshot.creature.len()
            + snapshot.flames.len()
            + snapshot.blasters.len()
            + snapshot.deadly_blocks.len() * 4
            + 2,
    );

    rects.push(Rect {
        x: 0,
        y: 0,
        w: snapshot.grid.cols as u32 * CELL_SIZE,
        h: snapshot.grid.rows as u32 * CELL_SIZE,
        color: palette.background,
    });

    for &pos in &snapshot.flames {
        rects.push(Rect::cell(pos, palette.flame));
    }

    for block in &snapshot.deadly_blocks {
        let color = if block.flashing && lit {
            palette.deadly_block_flash
        } else {
            palette.deadly_block
        };
        rects.extend(footprint_cells(block.pos, DEADLY_BLOCK_SIZE).map(|c| Rect::cell(c, color)));
    }

    for blaster in &snapshot.blasters {
        if blaster.warning {
            // Warning blasters blink; armed ones stay solid
            if lit {
                rects.push(Rect::cell(blaster.pos, palette.blaster_warning));
            }
        } else {
            rects.push(Rect::cell(blaster.pos, palette.blaster_armed));
        }
    }

    rects.push(Rect::cell(snapshot.food, palette.food));
    if let Some(pos) = snapshot.multiplier {
        rects.push(Rect::cell(pos, palette.multiplier));
    }

    let body = if snapshot.boost_active {
        palette.boosted_body
    } else {
        palette.body
    };
    // Tail first so the head is drawn on top
    for (i, &pos) in snapshot.creature.iter().enumerate().rev() {
        let color = if i == 0 { palette.head } else { body };
        rects.push(Rect::cell(pos, color));
    }

    rects
}
