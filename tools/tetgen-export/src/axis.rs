//! Axis remapping between up-axis conventions
//!
//! Editors and solvers disagree on which axis points up. An [`AxisMode`] is a
//! fixed swap/negation of the Y and Z axes applied to every exported position.
//!
//! | Mode             | Name   | Vector      | Rotation (w, x, y, z) |
//! |------------------|--------|-------------|-----------------------|
//! | `Identity`       | `xyz`  | (x, y, z)   | (w, x, y, z)          |
//! | `SwapYz`         | `xzy`  | (x, z, y)   | (w, x, z, y)          |
//! | `SwapYzNegateY`  | `xz-y` | (x, z, -y)  | (w, x, z, -y)         |
//! | `SwapYzNegateX`  | `-xzy` | (-x, z, y)  | (w, -x, z, y)         |

use glam::{DQuat, DVec3};
use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;

/// Axis remapping policy applied to exported geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisMode {
    /// `xyz`: no change
    Identity,
    /// `xzy`: swap Y and Z
    SwapYz,
    /// `xz-y`: swap Y and Z, negate the new Z
    #[default]
    SwapYzNegateY,
    /// `-xzy`: swap Y and Z, negate X
    SwapYzNegateX,
}

impl AxisMode {
    pub const ALL: [AxisMode; 4] = [
        AxisMode::Identity,
        AxisMode::SwapYz,
        AxisMode::SwapYzNegateY,
        AxisMode::SwapYzNegateX,
    ];

    /// Short name as stored in config files (`xyz`, `xzy`, `xz-y`, `-xzy`)
    pub const fn name(self) -> &'static str {
        match self {
            AxisMode::Identity => "xyz",
            AxisMode::SwapYz => "xzy",
            AxisMode::SwapYzNegateY => "xz-y",
            AxisMode::SwapYzNegateX => "-xzy",
        }
    }

    /// Descriptive alias, also accepted by [`FromStr`]
    pub const fn alias(self) -> &'static str {
        match self {
            AxisMode::Identity => "identity",
            AxisMode::SwapYz => "swap-yz",
            AxisMode::SwapYzNegateY => "swap-yz-negate-y",
            AxisMode::SwapYzNegateX => "swap-yz-negate-x",
        }
    }
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisMode {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AxisMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s || mode.alias().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExportError::UnknownAxisMode(s.to_string()))
    }
}

/// Values that can be remapped by an [`AxisMode`]
pub trait AxisSwap: Sized {
    fn swap_axes(self, mode: AxisMode) -> Self;
}

impl AxisSwap for DVec3 {
    fn swap_axes(self, mode: AxisMode) -> Self {
        let DVec3 { x, y, z } = self;
        match mode {
            AxisMode::Identity => self,
            AxisMode::SwapYz => DVec3::new(x, z, y),
            AxisMode::SwapYzNegateY => DVec3::new(x, z, -y),
            AxisMode::SwapYzNegateX => DVec3::new(-x, z, y),
        }
    }
}

/// Rotations keep `w` and remap the vector part like a position.
impl AxisSwap for DQuat {
    fn swap_axes(self, mode: AxisMode) -> Self {
        let [x, y, z, w] = self.to_array();
        let v = DVec3::new(x, y, z).swap_axes(mode);
        DQuat::from_xyzw(v.x, v.y, v.z, w)
    }
}

/// Remap a position or rotation under `mode`
pub fn transform<T: AxisSwap>(value: T, mode: AxisMode) -> T {
    value.swap_axes(mode)
}
