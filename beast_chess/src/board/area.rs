use serde::{Deserialize, Serialize};

use crate::Square;

/// A rectangle on the board represented by a min + max coordinate pair.
///
/// The two coordinates form an _inclusive_ 2D range, i.e. a square with
/// `x == x_max` is contained in the area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub x_min: i8,
    pub y_min: i8,
    pub x_max: i8,
    pub y_max: i8,
}

impl Area {
    pub fn contains(&self, sq: Square) -> bool {
        sq.x >= self.x_min && sq.y >= self.y_min && sq.x <= self.x_max && sq.y <= self.y_max
    }

    pub fn singleton(sq: Square) -> Self {
        Self {
            x_min: sq.x,
            y_min: sq.y,
            x_max: sq.x,
            y_max: sq.y,
        }
    }

    /// The smallest area covering all the squares, or `None` if there are none.
    pub fn from_squares(mut iter: impl Iterator<Item = Square>) -> Option<Self> {
        let mut area = Self::singleton(iter.next()?);
        for sq in iter {
            area.update(sq);
        }
        Some(area)
    }

    /// Expands the area to cover `sq`.
    pub fn update(&mut self, sq: Square) {
        self.x_min = self.x_min.min(sq.x);
        self.x_max = self.x_max.max(sq.x);
        self.y_min = self.y_min.min(sq.y);
        self.y_max = self.y_max.max(sq.y);
    }

    /// Shrinks the area by `by` squares on every side.
    ///
    /// Returns `None` once nothing is left.
    pub fn inset(&self, by: i8) -> Option<Self> {
        let area = Self {
            x_min: self.x_min.checked_add(by)?,
            y_min: self.y_min.checked_add(by)?,
            x_max: self.x_max.checked_sub(by)?,
            y_max: self.y_max.checked_sub(by)?,
        };
        (area.x_min <= area.x_max && area.y_min <= area.y_max).then_some(area)
    }

    /// Every square on the border of the area.
    ///
    /// The top and bottom rows come first, as pairs from left to right,
    /// followed by the left and right columns as pairs from top to bottom.
    pub fn perimeter(&self) -> Vec<Square> {
        let mut squares = Vec::new();
        for x in self.x_min..=self.x_max {
            squares.push(Square::new(x, self.y_min));
            if self.y_max != self.y_min {
                squares.push(Square::new(x, self.y_max));
            }
        }
        for y in (self.y_min + 1)..self.y_max {
            squares.push(Square::new(self.x_min, y));
            if self.x_max != self.x_min {
                squares.push(Square::new(self.x_max, y));
            }
        }
        squares
    }

    /// The corners in the order north-west, south-west, north-east, south-east.
    ///
    /// Degenerate areas yield each distinct corner once.
    pub fn corners(&self) -> Vec<Square> {
        let mut squares = Vec::with_capacity(4);
        for sq in [
            Square::new(self.x_min, self.y_min),
            Square::new(self.x_min, self.y_max),
            Square::new(self.x_max, self.y_min),
            Square::new(self.x_max, self.y_max),
        ] {
            if !squares.contains(&sq) {
                squares.push(sq);
            }
        }
        squares
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(x_min: i8, y_min: i8, x_max: i8, y_max: i8) -> Area {
        Area {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[test]
    fn perimeter_of_8x8_has_28_squares() {
        let perimeter = area(0, 0, 7, 7).perimeter();
        assert_eq!(perimeter.len(), 28);
        assert_eq!(&perimeter[..4], &[
            Square::new(0, 0),
            Square::new(0, 7),
            Square::new(1, 0),
            Square::new(1, 7)
        ]);
        assert_eq!(perimeter[16], Square::new(0, 1));
        assert_eq!(perimeter[17], Square::new(7, 1));
    }

    #[test]
    fn degenerate_areas() {
        assert_eq!(area(2, 3, 2, 3).perimeter(), vec![Square::new(2, 3)]);
        assert_eq!(area(2, 3, 2, 3).corners(), vec![Square::new(2, 3)]);
        assert_eq!(area(0, 0, 3, 0).perimeter().len(), 4);
        assert_eq!(area(0, 0, 3, 0).corners().len(), 2);
    }

    #[test]
    fn inset_until_empty() {
        let full = area(0, 0, 7, 7);
        assert_eq!(full.inset(3), Some(area(3, 3, 4, 4)));
        assert_eq!(full.inset(4), None);
    }

    #[test]
    fn bounding_area_of_squares() {
        let squares = [Square::new(3, 1), Square::new(0, 5), Square::new(2, 2)];
        assert_eq!(
            Area::from_squares(squares.into_iter()),
            Some(area(0, 1, 3, 5))
        );
        assert_eq!(Area::from_squares(std::iter::empty()), None);
    }
}
