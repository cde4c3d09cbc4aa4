use crate::error::{MawError, Result};
use crate::layout::Direction;

/// Tab strip orientation flags: which edge of the notebook holds the strip.
pub const ORIENT_NORTH: u8 = 0x01;
pub const ORIENT_SOUTH: u8 = 0x02;
pub const ORIENT_WEST: u8 = 0x04;
pub const ORIENT_EAST: u8 = 0x08;

/// Gravity flags: which edge of the strip the active-tab indicator favors.
pub const GRAV_NORTH: u8 = 0x10;
pub const GRAV_SOUTH: u8 = 0x20;
pub const GRAV_WEST: u8 = 0x40;
pub const GRAV_EAST: u8 = 0x80;

const ALL_ORIENT: u8 = ORIENT_NORTH | ORIENT_SOUTH | ORIENT_WEST | ORIENT_EAST;
const ALL_GRAV: u8 = GRAV_NORTH | GRAV_SOUTH | GRAV_WEST | GRAV_EAST;

/// Validated notebook style bitmask.
///
/// Holds exactly one orientation flag and exactly one gravity flag. Raw
/// input may leave either group unset; the group then normalizes to its
/// default member (orientation north, gravity south). More than one flag
/// in a group never validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NbStyle(u8);

impl NbStyle {
    pub const DEFAULT_BITS: u8 = ORIENT_NORTH | GRAV_SOUTH;

    pub fn new(raw: u8) -> Result<Self> {
        let orient = raw & ALL_ORIENT;
        if orient.count_ones() > 1 {
            return Err(MawError::InvalidStyle(format!(
                "more than one orientation flag set (0x{orient:02x})"
            )));
        }

        let grav = raw & ALL_GRAV;
        if grav.count_ones() > 1 {
            return Err(MawError::InvalidStyle(format!(
                "more than one gravity flag set (0x{grav:02x})"
            )));
        }

        let orient = if orient == 0 { ORIENT_NORTH } else { orient };
        let grav = if grav == 0 { GRAV_SOUTH } else { grav };
        Ok(Self(orient | grav))
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn orientation(&self) -> u8 {
        self.0 & ALL_ORIENT
    }

    pub fn gravity(&self) -> u8 {
        self.0 & ALL_GRAV
    }

    /// Box axis the notebook lays out along: strip above/below the pages
    /// stacks vertically, strip beside the pages stacks horizontally.
    pub fn axis(&self) -> Direction {
        if self.orientation() & (ORIENT_NORTH | ORIENT_SOUTH) != 0 {
            Direction::Column
        } else {
            Direction::Row
        }
    }

    /// Whether the tab strip occupies the first layout slot.
    pub fn tabs_leading(&self) -> bool {
        self.orientation() & (ORIENT_NORTH | ORIENT_WEST) != 0
    }

    /// Axis tabs pack along inside the strip, perpendicular to [`Self::axis`].
    pub fn strip_axis(&self) -> Direction {
        match self.axis() {
            Direction::Column => Direction::Row,
            Direction::Row => Direction::Column,
        }
    }
}

impl Default for NbStyle {
    fn default() -> Self {
        Self(Self::DEFAULT_BITS)
    }
}
