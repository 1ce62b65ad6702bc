// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered sequence of 2D curves.

use nalgebra::Point2;

use crate::curve2d::Curve2D;
use crate::math::Bounds2;
use crate::tolerance::Tolerance;

/// An ordered chain of 2D curves, typically one sketch profile.
///
/// The wire does not enforce connectivity between consecutive curves; callers
/// query [`Wire2D::is_closed`] when they need a closed boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wire2D {
    curves: Vec<Curve2D>,
}

impl Wire2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_curves(curves: Vec<Curve2D>) -> Self {
        Self { curves }
    }

    pub fn add_curve(&mut self, curve: Curve2D) {
        self.curves.push(curve);
    }

    pub fn curves(&self) -> &[Curve2D] {
        &self.curves
    }

    pub fn into_curves(self) -> Vec<Curve2D> {
        self.curves
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn start_point(&self) -> Option<Point2<f64>> {
        self.curves.first().map(|c| c.start_point())
    }

    pub fn end_point(&self) -> Option<Point2<f64>> {
        self.curves.last().map(|c| c.end_point())
    }

    /// `true` iff the first curve's start meets the last curve's end.
    pub fn is_closed(&self) -> bool {
        self.is_closed_with(&Tolerance::default())
    }

    pub fn is_closed_with(&self, tolerance: &Tolerance) -> bool {
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => tolerance.points_equal_2d(&start, &end),
            _ => false,
        }
    }

    /// Union of the curve bounds; the zero box for an empty wire.
    pub fn bounds(&self) -> Bounds2 {
        let mut iter = self.curves.iter();
        let Some(first) = iter.next() else {
            return Bounds2::zero();
        };
        iter.fold(first.bounds(), |acc, c| acc.union(&c.bounds()))
    }

    pub fn length(&self) -> f64 {
        self.curves.iter().map(Curve2D::length).sum()
    }
}
