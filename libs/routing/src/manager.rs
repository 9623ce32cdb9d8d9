//! Wire classes and track spacing rules.

use std::collections::HashMap;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::grid::LayerId;
use crate::halfint::HalfInt;

/// The width of a wire class on a given layer, in number of tracks.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct WidthRule {
    /// The wire class.
    pub class: ArcStr,
    /// The routing layer.
    pub layer: LayerId,
    /// The wire width, in number of tracks.
    pub width: i64,
}

/// The minimum separation between two wire classes on a given layer, in tracks.
///
/// Rules are symmetric: `[a, b]` also applies to `[b, a]`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpaceRule {
    /// The pair of wire classes.
    pub classes: [ArcStr; 2],
    /// The routing layer.
    pub layer: LayerId,
    /// The minimum center-to-center separation, in tracks.
    pub space: HalfInt,
}

/// Track width and spacing specifications for a [`TrackManager`].
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TrackSpecs {
    /// Width rules.
    #[serde(default)]
    pub widths: Vec<WidthRule>,
    /// Spacing rules.
    #[serde(default)]
    pub spaces: Vec<SpaceRule>,
}

/// Computes wire widths, separations and placements for classes of wires.
///
/// Classes without a width rule on a layer are one track wide.
#[derive(Debug, Clone, Default)]
pub struct TrackManager {
    widths: HashMap<(LayerId, ArcStr), i64>,
    spaces: HashMap<(LayerId, ArcStr, ArcStr), HalfInt>,
}

fn space_key(layer: LayerId, a: &str, b: &str) -> (LayerId, ArcStr, ArcStr) {
    if a <= b {
        (layer, ArcStr::from(a), ArcStr::from(b))
    } else {
        (layer, ArcStr::from(b), ArcStr::from(a))
    }
}

impl TrackManager {
    /// Creates a track manager from the given specifications.
    pub fn new(specs: &TrackSpecs) -> Result<Self> {
        let mut widths = HashMap::new();
        for rule in specs.widths.iter() {
            if rule.width < 1 {
                return Err(RoutingError::InvalidRule(arcstr::format!(
                    "width of class `{}` on layer {} must be at least 1",
                    rule.class,
                    rule.layer
                )));
            }
            widths.insert((rule.layer, rule.class.clone()), rule.width);
        }
        let mut spaces = HashMap::new();
        for rule in specs.spaces.iter() {
            if rule.space < HalfInt::default() {
                return Err(RoutingError::InvalidRule(arcstr::format!(
                    "space between `{}` and `{}` on layer {} must not be negative",
                    rule.classes[0],
                    rule.classes[1],
                    rule.layer
                )));
            }
            spaces.insert(
                space_key(rule.layer, &rule.classes[0], &rule.classes[1]),
                rule.space,
            );
        }
        Ok(Self { widths, spaces })
    }

    /// The width of wire class `class` on `layer`, in number of tracks.
    pub fn get_width(&self, layer: LayerId, class: &str) -> i64 {
        self.widths
            .get(&(layer, ArcStr::from(class)))
            .copied()
            .unwrap_or(1)
    }

    /// The minimum center-to-center separation between wires of classes `a` and `b`.
    ///
    /// Never less than the sum of the half-widths of the two wires.
    pub fn get_sep(&self, layer: LayerId, (a, b): (&str, &str)) -> HalfInt {
        let space = self
            .spaces
            .get(&space_key(layer, a, b))
            .copied()
            .unwrap_or_default();
        let half_widths = HalfInt::from_dbl(self.get_width(layer, a) + self.get_width(layer, b));
        std::cmp::max(space, half_widths)
    }

    /// The next legal track after `cur` for a wire of class `next`, given that
    /// `cur` carries a wire of class `cur_class`.
    ///
    /// `up` gives the direction and number of steps.
    pub fn get_next_track(
        &self,
        layer: LayerId,
        cur: HalfInt,
        cur_class: &str,
        next: &str,
        up: i64,
    ) -> HalfInt {
        cur + self.get_sep(layer, (cur_class, next)) * up
    }

    /// Packs wires of the given classes as tightly as possible starting at `lower`.
    pub fn place_wires(&self, layer: LayerId, classes: &[&str], lower: HalfInt) -> Vec<HalfInt> {
        let mut locs = Vec::with_capacity(classes.len());
        let mut prev: Option<(&str, HalfInt)> = None;
        for class in classes.iter().copied() {
            let loc = match prev {
                None => lower + HalfInt::from_dbl(self.get_width(layer, class) - 1),
                Some((prev_class, prev_loc)) => {
                    self.get_next_track(layer, prev_loc, prev_class, class, 1)
                }
            };
            locs.push(loc);
            prev = Some((class, loc));
        }
        locs
    }

    /// Spreads wires of the given classes evenly across tracks `[lower, upper]`.
    ///
    /// Adjacent wires are at least as far apart as their own separation rule and the
    /// separation rule of `sp_type`. Leftover room is distributed evenly between the gaps
    /// at half-track granularity. Half-tracks that do not divide evenly are split between
    /// both ends of the group, with the smaller share below the first wire, so the end
    /// wires sit on `lower` and `upper` only when the leftover room divides evenly.
    pub fn spread_wires(
        &self,
        layer: LayerId,
        classes: &[&str],
        lower: HalfInt,
        upper: HalfInt,
        sp_type: (&str, &str),
    ) -> Result<Vec<HalfInt>> {
        let n = classes.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        let min_sep = self.get_sep(layer, sp_type).dbl();
        let gaps: Vec<i64> = classes
            .windows(2)
            .map(|pair| std::cmp::max(self.get_sep(layer, (pair[0], pair[1])).dbl(), min_sep))
            .collect();

        let first_min = lower.dbl() + (self.get_width(layer, classes[0]) - 1);
        let last_max = upper.dbl() - (self.get_width(layer, classes[n - 1]) - 1);
        let min_last = first_min + gaps.iter().sum::<i64>();
        if min_last > last_max {
            return Err(RoutingError::NotEnoughTracks {
                layer,
                lower,
                upper,
                num: n,
            });
        }
        let extra = last_max - min_last;

        if n == 1 {
            return Ok(vec![HalfInt::from_dbl(first_min + extra / 2)]);
        }

        let num_gaps = (n - 1) as i64;
        let per_gap = extra / num_gaps;
        let rem = extra % num_gaps;
        let mut pos = first_min + rem / 2;
        let mut locs = Vec::with_capacity(n);
        locs.push(HalfInt::from_dbl(pos));
        for gap in gaps {
            pos += gap + per_gap;
            locs.push(HalfInt::from_dbl(pos));
        }
        tracing::trace!(%layer, ?locs, "spread wires");
        Ok(locs)
    }
}
