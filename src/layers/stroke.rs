//! Strokes: the seed points that drive localized motion inside a layer.

use crate::config::options::{Options, StrokesRel};
use crate::features::selector::CompositionKind;
use crate::foundation::core::{LayerId, Point};
use crate::seed::source::SeedSource;
use serde::Serialize;
use smallvec::SmallVec;

/// Inline capacity covers the default stroke counts without allocating.
pub type Strokes = SmallVec<[Stroke; 4]>;

/// Mirror applied to unit-square coordinates. Composition is XOR of the two axis flips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MirrorAxis {
    /// No flip (the `same` relation).
    Identity,
    /// `x -> 1 - x`.
    X,
    /// `y -> 1 - y`.
    Y,
    /// Both flips.
    Both,
}

impl MirrorAxis {
    fn bits(self) -> u8 {
        match self {
            Self::Identity => 0,
            Self::X => 1,
            Self::Y => 2,
            Self::Both => 3,
        }
    }

    fn from_bits(b: u8) -> Self {
        match b & 3 {
            0 => Self::Identity,
            1 => Self::X,
            2 => Self::Y,
            _ => Self::Both,
        }
    }

    /// Apply `self` then `other`.
    pub fn then(self, other: MirrorAxis) -> MirrorAxis {
        Self::from_bits(self.bits() ^ other.bits())
    }

    /// Mirror a unit-square point.
    pub fn apply(self, p: Point) -> Point {
        let b = self.bits();
        Point::new(
            if b & 1 != 0 { 1.0 - p.x } else { p.x },
            if b & 2 != 0 { 1.0 - p.y } else { p.y },
        )
    }
}

/// Geometry of a free-moving stroke, in unit-square coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeStroke {
    /// Speed at construction.
    pub speed: f64,
    /// Whether the stroke is pressed.
    pub is_down: bool,
    /// Start position.
    pub pos: Point,
    /// Target position.
    pub target: Point,
}

/// Stroke variants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Stroke {
    /// Free-moving stroke owned by the layer.
    Free(FreeStroke),
    /// Stroke pinned at its origin.
    #[serde(rename_all = "camelCase")]
    Fixed {
        /// Whether the stroke is pressed.
        is_down: bool,
    },
    /// Stroke following the pointer; its geometry lives in the renderer.
    PointerDriven,
    /// Read-only mirror of another layer's stroke.
    #[serde(rename_all = "camelCase")]
    MirrorOf {
        /// Layer owning the source stroke.
        source_layer: LayerId,
        /// Slot of the source stroke in that layer.
        source_stroke: usize,
        /// Flip applied to the source geometry.
        axis: MirrorAxis,
    },
}

impl Stroke {
    /// This stroke seen through `axis`. Free geometry is flipped, mirror references compose
    /// their axes, and the remaining variants carry no geometry.
    pub fn mirrored(&self, axis: MirrorAxis) -> Stroke {
        match *self {
            Stroke::Free(f) => Stroke::Free(FreeStroke {
                pos: axis.apply(f.pos),
                target: axis.apply(f.target),
                ..f
            }),
            Stroke::MirrorOf {
                source_layer,
                source_stroke,
                axis: inner,
            } => Stroke::MirrorOf {
                source_layer,
                source_stroke,
                axis: inner.then(axis),
            },
            other => other,
        }
    }

    /// Horizontal mirror.
    pub fn mirror_x(&self) -> Stroke {
        self.mirrored(MirrorAxis::X)
    }

    /// Vertical mirror.
    pub fn mirror_y(&self) -> Stroke {
        self.mirrored(MirrorAxis::Y)
    }

    /// Mirror on both axes.
    pub fn mirror(&self) -> Stroke {
        self.mirrored(MirrorAxis::Both)
    }
}

/// Build the strokes of the layer at position `ordinal`, returning each stroke with the
/// initial speed of its slot.
///
/// Layer 0 (and every layer under the `random` relation) draws, per stroke: speed, position,
/// target, then `isDown` for the `random` composition. Later layers reference layer 0
/// (`source`) and only draw the axis under `mirrorRand`.
pub(crate) fn create_strokes(
    ordinal: usize,
    count: u32,
    composition: CompositionKind,
    options: &Options,
    source: Option<(LayerId, &[Stroke], &[f64])>,
    seed: &mut SeedSource,
) -> (Strokes, SmallVec<[f64; 4]>) {
    let mut strokes = Strokes::new();
    let mut speeds = SmallVec::new();
    let (min_speed, max_speed) = options.speed_range();

    for j in 0..count as usize {
        let mirror_source = match source {
            Some(src) if ordinal > 0 && options.strokes_rel != StrokesRel::Random => Some(src),
            _ => None,
        };
        let Some((source_layer, source_strokes, source_speeds)) = mirror_source else {
            let speed = seed.uniform(min_speed, max_speed);
            let pos = Point::new(seed.uniform(0.0, 1.0), seed.uniform(0.0, 1.0));
            let target = Point::new(seed.uniform(0.0, 1.0), seed.uniform(0.0, 1.0));
            let stroke = match composition {
                CompositionKind::Random => Stroke::Free(FreeStroke {
                    speed,
                    is_down: seed.bool(),
                    pos,
                    target,
                }),
                CompositionKind::Center => Stroke::Fixed { is_down: true },
                _ => Stroke::PointerDriven,
            };
            strokes.push(stroke);
            speeds.push(speed);
            continue;
        };

        let axis = match options.strokes_rel {
            StrokesRel::Same => MirrorAxis::Identity,
            StrokesRel::MirrorX => MirrorAxis::X,
            StrokesRel::MirrorY => MirrorAxis::Y,
            StrokesRel::MirrorRand => {
                const AXES: [MirrorAxis; 3] = [MirrorAxis::Both, MirrorAxis::X, MirrorAxis::Y];
                *seed.choice(&AXES).unwrap_or(&MirrorAxis::Both)
            }
            StrokesRel::Mirror | StrokesRel::Random => MirrorAxis::Both,
        };
        let source_stroke = j.min(source_strokes.len().saturating_sub(1));
        strokes.push(Stroke::MirrorOf {
            source_layer,
            source_stroke,
            axis,
        });
        speeds.push(source_speeds.get(source_stroke).copied().unwrap_or(min_speed));
    }
    (strokes, speeds)
}

#[cfg(test)]
#[path = "../../tests/unit/layers/stroke.rs"]
mod tests;
