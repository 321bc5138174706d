//! Pairwise classifier views
//!
//! The decision function separating classes `k1 < k2` is spread over two
//! blocks of the trained dual: the support vectors of class `k1`, weighted by
//! coefficient column `k2 - 1`, and the support vectors of class `k2`,
//! weighted by column `k1`. [`ClassifierView`] presents both blocks as one
//! sequence of `(coefficient, support vector)` pairs.
//!
//! Traversal is driven by a [`Cursor`], a two-state machine over the two
//! segments. The position one past the last element of the first segment is
//! always stored as the start of the second segment, so every position has a
//! single representation and empty segments need no special casing.

use super::{Problem, SupportVector};
use crate::core::{Representation, Result, SVMError, SparseVector};
use crate::kernel::{Kernel, PrecomputedKernel};
use crate::solver::TrainedDual;
use std::fmt;
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    First,
    Second,
}

/// Read-only view of one pairwise decision function
#[derive(Clone, Copy)]
pub struct ClassifierView<'a> {
    dual: &'a TrainedDual,
    problem: &'a Problem,
    representation: Representation,
    k1: usize,
    k2: usize,
    k1_offset: usize,
    k2_offset: usize,
}

impl<'a> ClassifierView<'a> {
    /// View the classifier between class indices `k1` and `k2`, in any order
    pub(crate) fn new(
        dual: &'a TrainedDual,
        problem: &'a Problem,
        representation: Representation,
        k1: usize,
        k2: usize,
    ) -> Result<Self> {
        let nr_class = dual.nr_class();
        if k1 == k2 {
            return Err(SVMError::InvalidParameter(format!(
                "a pairwise classifier needs two distinct classes, got class {k1} twice"
            )));
        }
        if k1.max(k2) >= nr_class {
            return Err(SVMError::InvalidParameter(format!(
                "class index {} out of range for a model with {} classes",
                k1.max(k2),
                nr_class
            )));
        }

        let (k1, k2) = if k1 > k2 { (k2, k1) } else { (k1, k2) };

        let mut sum = 0;
        let mut k1_offset = 0;
        let mut k2_offset = 0;
        for k in 0..=k2 {
            if k == k1 {
                k1_offset = sum;
            }
            if k == k2 {
                k2_offset = sum;
            }
            sum += dual.n_sv[k];
        }

        Ok(Self {
            dual,
            problem,
            representation,
            k1,
            k2,
            k1_offset,
            k2_offset,
        })
    }

    /// Class indices `(k1, k2)` with `k1 < k2`
    pub fn class_indices(&self) -> (usize, usize) {
        (self.k1, self.k2)
    }

    /// Labels of the two classes; the first one is on the positive side
    pub fn labels(&self) -> (f64, f64) {
        (self.dual.labels[self.k1], self.dual.labels[self.k2])
    }

    /// Number of `(coefficient, support vector)` pairs
    pub fn len(&self) -> usize {
        self.segment_len(Segment::First) + self.segment_len(Segment::Second)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Threshold of this classifier
    pub fn rho(&self) -> f64 {
        self.dual.rho[self.dual.pair_index(self.k1, self.k2)]
    }

    /// Sum of all coefficients
    pub fn coefficient_sum(&self) -> f64 {
        self.iter().map(|(coef, _)| coef).sum()
    }

    /// Decision value `sum(coef_i K(sv_i, x)) - rho`, evaluated in input space
    pub fn decision_value<K: Kernel>(&self, kernel: &K, x: &SparseVector) -> f64 {
        self.iter()
            .map(|(coef, sv)| coef * kernel.compute(sv.input(), x))
            .sum::<f64>()
            - self.rho()
    }

    pub fn begin(&self) -> Cursor<'a> {
        Cursor::at(*self, Segment::First, 0)
    }

    pub fn end(&self) -> Cursor<'a> {
        Cursor::at(*self, Segment::Second, self.segment_len(Segment::Second))
    }

    pub fn iter(&self) -> Iter<'a> {
        Iter {
            front: self.begin(),
            back: self.end(),
        }
    }

    fn segment_len(&self, segment: Segment) -> usize {
        match segment {
            Segment::First => self.dual.n_sv[self.k1],
            Segment::Second => self.dual.n_sv[self.k2],
        }
    }

    fn segment_start(&self, segment: Segment) -> usize {
        match segment {
            Segment::First => self.k1_offset,
            Segment::Second => self.k2_offset,
        }
    }

    fn coef_column(&self, segment: Segment) -> usize {
        match segment {
            Segment::First => self.k2 - 1,
            Segment::Second => self.k1,
        }
    }

    fn support_vector(&self, slot: usize) -> SupportVector<'a> {
        let dual: &'a TrainedDual = self.dual;
        let stored = &dual.support_vectors[slot];
        match self.representation {
            Representation::Raw => SupportVector::Raw(stored),
            Representation::Precomputed => {
                let problem: &'a Problem = self.problem;
                // Gram rows are written by Problem::gram_rows with serials 1..=len
                let input = &problem.samples()[PrecomputedKernel::serial(stored) - 1].features;
                SupportVector::Precomputed {
                    kernel_row: stored,
                    input,
                }
            }
        }
    }
}

impl fmt::Debug for ClassifierView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierView")
            .field("labels", &self.labels())
            .field("k1", &self.k1)
            .field("k2", &self.k2)
            .field("k1_offset", &self.k1_offset)
            .field("k2_offset", &self.k2_offset)
            .field("representation", &self.representation)
            .finish()
    }
}

impl<'a> IntoIterator for ClassifierView<'a> {
    type Item = (f64, SupportVector<'a>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<'a> IntoIterator for &ClassifierView<'a> {
    type Item = (f64, SupportVector<'a>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Bidirectional position in a [`ClassifierView`]
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    view: ClassifierView<'a>,
    segment: Segment,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn at(view: ClassifierView<'a>, segment: Segment, offset: usize) -> Self {
        let mut cursor = Self {
            view,
            segment,
            offset,
        };
        cursor.normalize();
        cursor
    }

    fn normalize(&mut self) {
        let first_len = self.view.segment_len(Segment::First);
        if self.segment == Segment::First && self.offset >= first_len {
            self.segment = Segment::Second;
            self.offset -= first_len;
        }
    }

    /// Number of elements before the cursor
    pub fn position(&self) -> usize {
        match self.segment {
            Segment::First => self.offset,
            Segment::Second => self.view.segment_len(Segment::First) + self.offset,
        }
    }

    pub fn is_begin(&self) -> bool {
        self.position() == 0
    }

    pub fn is_end(&self) -> bool {
        self.segment == Segment::Second && self.offset == self.view.segment_len(Segment::Second)
    }

    /// Advance by one element; returns `false` (without moving) at the end
    pub fn move_next(&mut self) -> bool {
        if self.is_end() {
            return false;
        }
        self.offset += 1;
        self.normalize();
        true
    }

    /// Step back by one element; returns `false` (without moving) at the
    /// beginning
    pub fn move_prev(&mut self) -> bool {
        if self.is_begin() {
            return false;
        }
        match self.segment {
            Segment::Second if self.offset == 0 => {
                // Not at the beginning, so the first segment is non-empty
                self.segment = Segment::First;
                self.offset = self.view.segment_len(Segment::First) - 1;
            }
            _ => self.offset -= 1,
        }
        true
    }

    /// Coefficient column and slot under the cursor
    pub fn coef_position(&self) -> (usize, usize) {
        (self.view.coef_column(self.segment), self.sv_position())
    }

    /// Support-vector slot under the cursor
    pub fn sv_position(&self) -> usize {
        self.view.segment_start(self.segment) + self.offset
    }

    pub fn coefficient(&self) -> Option<f64> {
        if self.is_end() {
            return None;
        }
        let (column, slot) = self.coef_position();
        Some(self.view.dual.sv_coef[column][slot])
    }

    pub fn support_vector(&self) -> Option<SupportVector<'a>> {
        if self.is_end() {
            return None;
        }
        Some(self.view.support_vector(self.sv_position()))
    }

    /// The element under the cursor, `None` at the end
    pub fn get(&self) -> Option<(f64, SupportVector<'a>)> {
        Some((self.coefficient()?, self.support_vector()?))
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.coef_position() == other.coef_position() && self.sv_position() == other.sv_position()
    }
}

impl Eq for Cursor<'_> {}

/// Iterator over a [`ClassifierView`], from both ends
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    front: Cursor<'a>,
    back: Cursor<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (f64, SupportVector<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.front.get()?;
        self.front.move_next();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.position() - self.front.position();
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back.move_prev();
        self.back.get()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
