//! Hit object types shared between standard and mania charts.

/// Playfield width in osu! pixels. Column/x conversions are relative to this.
pub const PLAYFIELD_WIDTH: i32 = 512;

/// Playfield height in osu! pixels.
pub const PLAYFIELD_HEIGHT: i32 = 384;

/// Hit sound accent bitfield as stored in the `.osu` object line.
///
/// Bit 0 (normal) carries no accent information; the converter only cares
/// about whistle, finish, and clap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitSound(pub u8);

impl HitSound {
    pub const NORMAL: HitSound = HitSound(0);
    pub const WHISTLE: HitSound = HitSound(2);
    pub const FINISH: HitSound = HitSound(4);
    pub const CLAP: HitSound = HitSound(8);

    pub fn has_whistle(self) -> bool {
        self.0 & Self::WHISTLE.0 != 0
    }

    pub fn has_finish(self) -> bool {
        self.0 & Self::FINISH.0 != 0
    }

    pub fn has_clap(self) -> bool {
        self.0 & Self::CLAP.0 != 0
    }

    /// True if any accent (whistle, finish, clap) is set.
    pub fn has_accent(self) -> bool {
        self.has_whistle() || self.has_finish() || self.has_clap()
    }
}

impl std::ops::BitOr for HitSound {
    type Output = HitSound;

    fn bitor(self, rhs: HitSound) -> HitSound {
        HitSound(self.0 | rhs.0)
    }
}

/// One object of a parsed chart.
///
/// `Circle`, `Slider`, and `Spinner` come from standard-mode charts;
/// `Hold` only appears in converted mania output (a mania tap is written
/// as a `Circle` whose x encodes its column).
#[derive(Debug, Clone, PartialEq)]
pub enum HitObject {
    Circle {
        x: i32,
        y: i32,
        time: i32,
        hit_sound: HitSound,
    },
    Slider {
        x: i32,
        y: i32,
        time: i32,
        hit_sound: HitSound,
        /// Back-and-forth traversal count ("slides"); repeat count plus one.
        slides: i32,
        /// Visual curve length in osu! pixels.
        length: f64,
        /// Raw curve descriptor (`B|x:y|...`), preserved for round-tripping.
        curve: String,
    },
    Spinner {
        time: i32,
        end_time: i32,
        hit_sound: HitSound,
    },
    Hold {
        x: i32,
        time: i32,
        end_time: i32,
        hit_sound: HitSound,
    },
}

impl HitObject {
    pub fn time(&self) -> i32 {
        match self {
            HitObject::Circle { time, .. }
            | HitObject::Slider { time, .. }
            | HitObject::Spinner { time, .. }
            | HitObject::Hold { time, .. } => *time,
        }
    }

    pub fn y(&self) -> i32 {
        match self {
            HitObject::Circle { y, .. } | HitObject::Slider { y, .. } => *y,
            HitObject::Hold { .. } => PLAYFIELD_HEIGHT / 2,
            HitObject::Spinner { .. } => PLAYFIELD_HEIGHT / 2,
        }
    }
}

/// Maps an x position onto one of `columns` equal bands of the playfield.
pub fn column_from_x(x: i32, columns: usize) -> usize {
    let col = x * columns as i32 / PLAYFIELD_WIDTH;
    col.clamp(0, columns as i32 - 1) as usize
}

/// Centre x of a column band; inverse of [`column_from_x`].
pub fn column_to_x(column: usize, columns: usize) -> i32 {
    let band = PLAYFIELD_WIDTH as f64 / columns as f64;
    (band * column as f64 + band / 2.0) as i32
}
