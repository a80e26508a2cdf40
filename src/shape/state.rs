use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bit flags describing how a shape participates in drawing, editing and wiring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ShapeState(u32);

impl ShapeState {
    pub const DEFAULT: Self = Self(0);
    pub const VISIBLE: Self = Self(1 << 0);
    pub const PRINTABLE: Self = Self(1 << 1);
    pub const LOCKED: Self = Self(1 << 2);
    pub const CONNECTOR: Self = Self(1 << 3);
    pub const NONE: Self = Self(1 << 4);
    pub const STANDALONE: Self = Self(1 << 5);
    pub const INPUT: Self = Self(1 << 6);
    pub const OUTPUT: Self = Self(1 << 7);

    /// Flags every freshly created top-level shape starts with.
    pub const STANDALONE_SHAPE: Self = Self(Self::VISIBLE.0 | Self::PRINTABLE.0 | Self::STANDALONE.0);

    /// Flags cleared when a connector point leaves its group.
    pub const CONNECTOR_FLAGS: Self =
        Self(Self::CONNECTOR.0 | Self::NONE.0 | Self::INPUT.0 | Self::OUTPUT.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    pub fn is_visible(self) -> bool {
        self.contains(Self::VISIBLE)
    }

    pub fn is_locked(self) -> bool {
        self.contains(Self::LOCKED)
    }

    pub fn is_connector(self) -> bool {
        self.contains(Self::CONNECTOR)
    }

    pub fn is_standalone(self) -> bool {
        self.contains(Self::STANDALONE)
    }

    /// Connector direction, if this state carries exactly one of None/Input/Output.
    pub fn connector_kind(self) -> Option<ConnectorKind> {
        let kinds = [
            (Self::NONE, ConnectorKind::None),
            (Self::INPUT, ConnectorKind::Input),
            (Self::OUTPUT, ConnectorKind::Output),
        ];
        let mut found = kinds.iter().filter(|(flag, _)| self.contains(*flag));
        match (found.next(), found.next()) {
            (Some((_, kind)), None) => Some(*kind),
            _ => None,
        }
    }
}

impl BitOr for ShapeState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ShapeState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ShapeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ShapeState, &str); 8] = [
            (ShapeState::VISIBLE, "Visible"),
            (ShapeState::PRINTABLE, "Printable"),
            (ShapeState::LOCKED, "Locked"),
            (ShapeState::CONNECTOR, "Connector"),
            (ShapeState::NONE, "None"),
            (ShapeState::STANDALONE, "Standalone"),
            (ShapeState::INPUT, "Input"),
            (ShapeState::OUTPUT, "Output"),
        ];
        let mut list = f.debug_set();
        for (flag, name) in NAMES {
            if self.contains(flag) {
                list.entry(&format_args!("{name}"));
            }
        }
        list.finish()
    }
}

/// Direction sub-classification of a connector point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorKind {
    None,
    Input,
    Output,
}

impl ConnectorKind {
    pub fn flag(self) -> ShapeState {
        match self {
            ConnectorKind::None => ShapeState::NONE,
            ConnectorKind::Input => ShapeState::INPUT,
            ConnectorKind::Output => ShapeState::OUTPUT,
        }
    }
}
