/// Contains the option structs and enums that are exported as part of the
/// public API of this crate.
use crate::error::{Error, Result};

use std::convert::TryFrom;
use std::str::FromStr;

/// Pixels per module used when the caller does not choose a scale.
pub const DEFAULT_SCALE: u32 = 6;

/// Width of the quiet zone in modules used when the caller does not choose one.
pub const DEFAULT_MARGIN: u32 = 4;

//-------------------------------------------------------------------------------------------------

/// What to do with a payload that does not fit even the largest supported version.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum OverflowPolicy {
    Reject,         // fail with Error::PayloadTooLarge
    Clamp           // truncate the payload to the capacity of the largest version
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::Reject
    }
}

impl FromStr for OverflowPolicy {
    type Err = Error;

    /// Accepts "reject" or "clamp", ignoring case.
    fn from_str(decl: &str) -> Result<Self> {
        match decl.to_ascii_lowercase().as_str() {
            "reject" => Ok(OverflowPolicy::Reject),
            "clamp" => Ok(OverflowPolicy::Clamp),
            _ => Err(Error::InvalidOption(format!("unrecognized overflow policy '{}'", decl)))
        }
    }
}

//-------------------------------------------------------------------------------------------------

/// Options for turning a payload into a module matrix.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug)]
pub struct EncodeOptions {
    pub overflow: OverflowPolicy,
}

impl EncodeOptions {
    pub fn with_overflow(overflow: OverflowPolicy) -> Self {
        EncodeOptions { overflow }
    }
}

//-------------------------------------------------------------------------------------------------

/// Options for rasterizing a module matrix.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct RenderOptions {
    pub scale: u32,     // pixels per module, in both directions
    pub margin: u32,    // quiet zone in modules, counted once per side
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { scale: DEFAULT_SCALE, margin: DEFAULT_MARGIN }
    }
}

impl RenderOptions {
    pub const fn new(scale: u32, margin: u32) -> RenderOptions {
        RenderOptions { scale, margin }
    }

    /// A zero scale would produce an empty surface.
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(Error::InvalidScale);
        }
        Ok(())
    }

    /// Side length in pixels of the surface for a symbol of `modules` modules per side.
    /// Fails if the side does not fit into a `u32`.
    pub fn canvas_side(&self, modules: usize) -> Result<u32> {
        let too_large = || Error::CanvasTooLarge { modules, scale: self.scale, margin: self.margin };
        let modules = u32::try_from(modules).map_err(|_| too_large())?;
        self.margin.checked_mul(2)
            .and_then(|quiet| quiet.checked_add(modules))
            .and_then(|span| span.checked_mul(self.scale))
            .ok_or_else(too_large)
    }
}
