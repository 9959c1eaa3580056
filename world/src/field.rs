//! Live boulders, their horizontal slots, and the selection cursor.

use std::time::Duration;

use scale_boulders_core::{BoulderId, BoulderSnapshot, Direction, ScaleSpec, SpawnRejection};

/// Falling entity carrying one scale to identify.
#[derive(Clone, Debug, PartialEq)]
pub struct Boulder {
    id: BoulderId,
    slot: u32,
    scale: ScaleSpec,
    vertical_position: f32,
    fall_speed: f32,
    point_value: u32,
    attempted: bool,
}

impl Boulder {
    fn spawn(id: BoulderId, slot: u32, scale: ScaleSpec, fall_speed: f32, point_value: u32) -> Self {
        debug_assert!(fall_speed > 0.0, "boulders must fall downward");
        Self {
            id,
            slot,
            scale,
            vertical_position: 0.0,
            fall_speed,
            point_value,
            attempted: false,
        }
    }

    /// Unique identifier of the boulder.
    #[must_use]
    pub const fn id(&self) -> BoulderId {
        self.id
    }

    /// Horizontal slot the boulder occupies.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Scale the boulder carries.
    #[must_use]
    pub const fn scale(&self) -> &ScaleSpec {
        &self.scale
    }

    /// Distance fallen from the top of the field.
    #[must_use]
    pub const fn vertical_position(&self) -> f32 {
        self.vertical_position
    }

    /// Fall speed captured when the boulder spawned.
    #[must_use]
    pub const fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    /// Points awarded if the boulder is identified now.
    #[must_use]
    pub const fn point_value(&self) -> u32 {
        self.point_value
    }

    /// Whether at least one guess was made on the boulder.
    #[must_use]
    pub const fn attempted(&self) -> bool {
        self.attempted
    }

    /// Halves the point value, rounding down, and records the attempt.
    pub(crate) fn halve_value(&mut self) -> u32 {
        self.point_value /= 2;
        self.attempted = true;
        self.point_value
    }

    pub(crate) fn snapshot(&self) -> BoulderSnapshot {
        BoulderSnapshot {
            id: self.id,
            slot: self.slot,
            scale: self.scale.clone(),
            vertical_position: self.vertical_position,
            fall_speed: self.fall_speed,
            point_value: self.point_value,
            attempted: self.attempted,
        }
    }
}

/// Ordered collection of live boulders plus the selection cursor.
///
/// Boulders are kept sorted by slot. The cursor is an index into that order;
/// it is `None` exactly when the field is empty.
#[derive(Clone, Debug)]
pub struct BoulderField {
    boulders: Vec<Boulder>,
    cursor: Option<usize>,
    slot_count: u32,
    floor_position: f32,
    next_id: u32,
}

impl BoulderField {
    pub(crate) fn new(slot_count: u32, floor_position: f32) -> Self {
        Self {
            boulders: Vec::new(),
            cursor: None,
            slot_count,
            floor_position,
            next_id: 0,
        }
    }

    /// Live boulders in slot order.
    #[must_use]
    pub fn boulders(&self) -> &[Boulder] {
        &self.boulders
    }

    /// Index of the selected boulder within [`BoulderField::boulders`].
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Position at which boulders land.
    #[must_use]
    pub const fn floor_position(&self) -> f32 {
        self.floor_position
    }

    /// Number of horizontal slots.
    #[must_use]
    pub const fn slot_count(&self) -> u32 {
        self.slot_count
    }

    /// Currently selected boulder, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Boulder> {
        self.cursor.and_then(|index| self.boulders.get(index))
    }

    pub(crate) fn selected_id(&self) -> Option<BoulderId> {
        self.selected().map(Boulder::id)
    }

    pub(crate) fn boulder_mut(&mut self, id: BoulderId) -> Option<&mut Boulder> {
        self.boulders.iter_mut().find(|boulder| boulder.id == id)
    }

    /// Places a boulder at the top of the lowest free slot.
    ///
    /// The first boulder entering an empty field becomes selected; otherwise
    /// the cursor keeps pointing at the boulder it selected before.
    pub(crate) fn spawn(
        &mut self,
        scale: ScaleSpec,
        fall_speed: f32,
        point_value: u32,
    ) -> Result<(BoulderId, u32), SpawnRejection> {
        let slot = self.lowest_free_slot().ok_or(SpawnRejection::FieldFull)?;
        let id = BoulderId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let index = self.boulders.partition_point(|boulder| boulder.slot < slot);
        self.boulders
            .insert(index, Boulder::spawn(id, slot, scale, fall_speed, point_value));
        self.cursor = match self.cursor {
            None => Some(index),
            Some(cursor) if cursor >= index => Some(cursor + 1),
            Some(cursor) => Some(cursor),
        };
        Ok((id, slot))
    }

    fn lowest_free_slot(&self) -> Option<u32> {
        // Boulders are sorted by slot, so the first gap is the lowest free slot.
        let mut candidate = 0;
        for boulder in &self.boulders {
            if boulder.slot != candidate {
                break;
            }
            candidate += 1;
        }
        (candidate < self.slot_count).then_some(candidate)
    }

    /// Moves every boulder down by its own fall speed over `dt`.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        for boulder in &mut self.boulders {
            debug_assert!(boulder.fall_speed > 0.0, "boulders must fall downward");
            boulder.vertical_position += boulder.fall_speed * seconds;
        }
    }

    /// Removes and returns every boulder at or past the floor, in slot order.
    pub(crate) fn collect_landed(&mut self) -> Vec<Boulder> {
        let mut landed = Vec::new();
        let mut index = 0;
        while index < self.boulders.len() {
            if self.boulders[index].vertical_position >= self.floor_position {
                landed.push(self.remove_at(index));
            } else {
                index += 1;
            }
        }
        landed
    }

    /// Removes the boulder with the provided identifier.
    pub(crate) fn remove(&mut self, id: BoulderId) -> Option<Boulder> {
        let index = self.boulders.iter().position(|boulder| boulder.id == id)?;
        Some(self.remove_at(index))
    }

    fn remove_at(&mut self, index: usize) -> Boulder {
        let removed = self.boulders.remove(index);
        let remaining = self.boulders.len();
        self.cursor = match self.cursor {
            _ if remaining == 0 => None,
            None => None,
            Some(cursor) if cursor > index => Some(cursor - 1),
            Some(cursor) => Some(cursor.min(remaining - 1)),
        };
        removed
    }

    /// Moves the cursor one boulder in the provided direction, clamped to the ends.
    pub(crate) fn move_selection(&mut self, direction: Direction) {
        let Some(cursor) = self.cursor else {
            return;
        };
        self.cursor = Some(match direction {
            Direction::Left => cursor.saturating_sub(1),
            Direction::Right => (cursor + 1).min(self.boulders.len() - 1),
        });
    }
}
