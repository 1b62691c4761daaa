use crate::foundation::core::{Color, Point};
use crate::foundation::error::{FluidError, FluidResult};
use serde::{Deserialize, Serialize};

/// Renderer blend modes, numbered as the renderer expects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BlendMode {
    /// 0
    NoBlending,
    /// 1
    Normal,
    /// 2
    Additive,
    /// 3
    Subtractive,
    /// 4
    Multiply,
    /// 5
    Custom,
}

impl BlendMode {
    /// Numeric code understood by the renderer.
    pub fn code(self) -> u8 {
        match self {
            Self::NoBlending => 0,
            Self::Normal => 1,
            Self::Additive => 2,
            Self::Subtractive => 3,
            Self::Multiply => 4,
            Self::Custom => 5,
        }
    }
}

impl TryFrom<u8> for BlendMode {
    type Error = FluidError;

    fn try_from(v: u8) -> FluidResult<Self> {
        Ok(match v {
            0 => Self::NoBlending,
            1 => Self::Normal,
            2 => Self::Additive,
            3 => Self::Subtractive,
            4 => Self::Multiply,
            5 => Self::Custom,
            _ => return Err(FluidError::validation(format!("unknown blend mode {v}"))),
        })
    }
}

impl From<BlendMode> for u8 {
    fn from(b: BlendMode) -> Self {
        b.code()
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// View (compositing) fragment program selected per layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewShader {
    /// Multiplies ink density into the layer color.
    MultFluidView,
    /// Maps velocity channels straight to RGB.
    RgbFluidView,
    /// RGB mapping biased to the blue channel.
    BlueRgbFluidView,
    /// Ink density over a transparent background.
    InkFluidView,
    /// Hue rotated by velocity angle.
    HueFluidView,
    /// Pressure field shaded as depth.
    DepthFluidView,
    /// Curl magnitude rendered as contour bands.
    ContourFluidView,
}

impl ViewShader {
    /// Every shader a layer may use.
    pub const ALL: [ViewShader; 7] = [
        Self::MultFluidView,
        Self::RgbFluidView,
        Self::BlueRgbFluidView,
        Self::InkFluidView,
        Self::HueFluidView,
        Self::DepthFluidView,
        Self::ContourFluidView,
    ];

    /// Shaders that keep a hue-rotation palette readable.
    pub const PALETTE_SAFE: [ViewShader; 3] = [
        Self::MultFluidView,
        Self::RgbFluidView,
        Self::BlueRgbFluidView,
    ];
}

/// Fluid solver coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Time step.
    pub dt: f64,
    /// Pressure coefficient.
    #[serde(rename = "K")]
    pub k: f64,
    /// Viscosity.
    pub nu: f64,
    /// Vorticity confinement.
    pub kappa: f64,
}

/// Complete per-layer parameter set consumed by the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBundle {
    /// GUI-owned visibility.
    pub visible: bool,
    /// Blending of the simulation pass.
    pub blend_mode_pass: BlendMode,
    /// Blending of the view composite.
    pub blend_mode_view: BlendMode,
    /// Simulation zoom, `> 0`.
    pub fluid_zoom: f64,
    /// Noise field zoom, `> 0`.
    pub noise_zoom: f64,
    /// Layer color.
    pub color: Color,
    /// Ink saturation in `[0, 1]`.
    pub saturation: f64,
    /// Solver iteration cap, `> 0`.
    pub max_iterations: u32,
    /// Solver coefficients.
    pub simulation: SimulationParams,
    /// Noise field offset, redrawn whenever the bundle is regenerated.
    pub noise_offset: Point,
    /// View fragment program.
    pub view_shader: ViewShader,
}

impl ParameterBundle {
    /// `(pass, view)` blend codes, the key the validator uses.
    pub fn blend_pair(&self) -> (u8, u8) {
        (self.blend_mode_pass.code(), self.blend_mode_view.code())
    }

    /// Check the field domains a GUI write-back must respect.
    pub fn check_domains(&self) -> FluidResult<()> {
        if !(self.fluid_zoom > 0.0) {
            return Err(FluidError::validation("fluidZoom must be > 0"));
        }
        if !(self.noise_zoom > 0.0) {
            return Err(FluidError::validation("noiseZoom must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.saturation) {
            return Err(FluidError::validation("saturation must be in [0, 1]"));
        }
        if self.max_iterations == 0 {
            return Err(FluidError::validation("maxIterations must be > 0"));
        }
        let s = &self.simulation;
        if ![s.dt, s.k, s.nu, s.kappa].iter().all(|v| v.is_finite()) {
            return Err(FluidError::validation("simulation values must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/bundle.rs"]
mod tests;
