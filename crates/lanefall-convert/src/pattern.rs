//! Lane-assigned notes and the per-event pattern they are grouped in.

/// One generated mania note.
///
/// `end_time` present means the note is a hold; holds shorter than a 1/32
/// beat are never constructed (see [`Note::hold`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub column: usize,
    pub start_time: i32,
    pub end_time: Option<i32>,
}

impl Note {
    pub fn tap(column: usize, time: i32) -> Note {
        Note {
            column,
            start_time: time,
            end_time: None,
        }
    }

    /// A hold from `start_time` to `end_time`, normalized to a tap when the
    /// duration is at most a 1/32 beat. Near-zero holds are artifacts of the
    /// integer segment arithmetic and are unplayable, so they collapse here
    /// at the single point where holds are made.
    pub fn hold(column: usize, start_time: i32, end_time: i32, beat_length: f64) -> Note {
        if (end_time - start_time) as f64 <= beat_length / 32.0 {
            return Note::tap(column, start_time);
        }
        Note {
            column,
            start_time,
            end_time: Some(end_time),
        }
    }

    pub fn is_hold(&self) -> bool {
        self.end_time.is_some()
    }
}

/// The notes generated for one source event (or one row of a sustained
/// event), all sharing a fixed column count.
///
/// Patterns are moved, not shared: each generation step consumes the
/// previous pattern by value and hands a fresh one back to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    columns: usize,
    notes: Vec<Note>,
}

impl Pattern {
    pub fn new(columns: usize) -> Pattern {
        Pattern {
            columns,
            notes: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Column of the first note, if any. The generators treat this as "the"
    /// previous column when the previous pattern held a single note.
    pub fn first_column(&self) -> Option<usize> {
        self.notes.first().map(|n| n.column)
    }

    pub fn column_has_note(&self, column: usize) -> bool {
        self.notes.iter().any(|n| n.column == column)
    }

    /// Number of distinct columns touched by this pattern.
    pub fn occupied_column_count(&self) -> usize {
        let mut mask: u16 = 0;
        for note in &self.notes {
            mask |= 1 << note.column;
        }
        mask.count_ones() as usize
    }

    pub fn push(&mut self, note: Note) {
        debug_assert!(note.column < self.columns);
        self.notes.push(note);
    }

    /// Moves all notes of `other` into `self`, leaving `other` empty.
    pub fn merge(&mut self, other: &mut Pattern) {
        self.notes.append(&mut other.notes);
    }
}

/// Direction a single-note staircase is currently running in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StairDirection {
    #[default]
    Ascending,
    Descending,
}

/// The capability set derived per source event that selects a generation
/// branch. A named-boolean set rather than a bitfield so matches stay
/// exhaustive and tests can build states directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertType {
    /// Echo the previous pattern's columns.
    pub force_stack: bool,
    /// New notes must avoid every column the previous pattern occupies.
    pub force_not_stack: bool,
    /// Emit exactly one note.
    pub keep_single: bool,
    /// Use the lower-probability note-count table.
    pub low_probability: bool,
    /// Advance candidate columns by +1 with wraparound instead of randomly.
    pub gathered: bool,
    /// Generate symmetric pairs about the centre.
    pub mirror: bool,
    /// Mirror the previous pattern's columns.
    pub reverse: bool,
    /// Jump to the far edge column.
    pub cycle: bool,
    /// Continue a single-note staircase upward.
    pub stair: bool,
    /// Continue a single-note staircase downward.
    pub reverse_stair: bool,
}

impl ConvertType {
    pub fn with_stair(mut self, direction: StairDirection) -> ConvertType {
        match direction {
            StairDirection::Ascending => self.stair = true,
            StairDirection::Descending => self.reverse_stair = true,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hold_normalizes_to_tap() {
        // 500ms beat -> anything <= 15.625ms becomes a tap.
        let note = Note::hold(2, 1000, 1015, 500.0);
        assert_eq!(note, Note::tap(2, 1000));

        let kept = Note::hold(2, 1000, 1016, 500.0);
        assert!(kept.is_hold());
        assert_eq!(kept.end_time, Some(1016));
    }

    #[test]
    fn test_occupied_column_count_dedups() {
        let mut pattern = Pattern::new(4);
        pattern.push(Note::tap(1, 0));
        pattern.push(Note::tap(1, 100));
        pattern.push(Note::tap(3, 0));
        assert_eq!(pattern.occupied_column_count(), 2);
        assert!(pattern.column_has_note(1));
        assert!(!pattern.column_has_note(0));
    }

    #[test]
    fn test_merge_drains_other() {
        let mut a = Pattern::new(4);
        a.push(Note::tap(0, 0));
        let mut b = Pattern::new(4);
        b.push(Note::tap(1, 0));
        b.push(Note::tap(2, 0));

        a.merge(&mut b);
        assert_eq!(a.len(), 3);
        assert!(b.is_empty());
    }

    #[test]
    fn test_with_stair() {
        let ty = ConvertType::default().with_stair(StairDirection::Descending);
        assert!(ty.reverse_stair);
        assert!(!ty.stair);
    }
}
