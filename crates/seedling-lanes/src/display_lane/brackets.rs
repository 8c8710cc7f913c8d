// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Corner brackets marking the tiles an engine is working on.

use seedling_core::display::{DisplaySurface, Rgba};

/// Walks `length` pixels from `start`, backwards when `length` is negative.
fn span(start: i64, length: i64) -> impl Iterator<Item = i64> {
    let step = length.signum();
    (0..length.abs()).map(move |i| start + i * step)
}

fn put(surface: &mut dyn DisplaySurface, x: i64, y: i64, color: Rgba) {
    if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
        surface.put_pixel(x, y, color);
    }
}

/// Draws a horizontal run of `length` pixels starting at `(x, y)`.
pub(crate) fn draw_hline(surface: &mut dyn DisplaySurface, x: i64, y: i64, length: i64, color: Rgba) {
    for i in span(x, length) {
        put(surface, i, y, color);
    }
}

/// Draws a vertical run of `length` pixels starting at `(x, y)`.
pub(crate) fn draw_vline(surface: &mut dyn DisplaySurface, x: i64, y: i64, length: i64, color: Rgba) {
    for i in span(y, length) {
        put(surface, x, i, color);
    }
}

/// Draws the four corners of the `width` x `height` rectangle at `(x, y)`,
/// each arm `extent` pixels long or shorter on small tiles.
pub(crate) fn draw_bracket(
    surface: &mut dyn DisplaySurface,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    extent: i64,
    color: Rgba,
) {
    if width <= 0 || height <= 0 {
        return;
    }
    let w = extent.min(width);
    let h = extent.min(height);
    let right = x + width - 1;
    let bottom = y + height - 1;

    draw_hline(surface, x, y, w, color);
    draw_vline(surface, x, y, h, color);

    draw_hline(surface, right, y, -w, color);
    draw_vline(surface, right, y, h, color);

    draw_hline(surface, x, bottom, w, color);
    draw_vline(surface, x, bottom, -h, color);

    draw_hline(surface, right, bottom, -w, color);
    draw_vline(surface, right, bottom, -h, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_core::display::Rect;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Pixels(HashSet<(usize, usize)>);

    impl DisplaySurface for Pixels {
        fn width(&self) -> usize {
            16
        }
        fn height(&self) -> usize {
            16
        }
        fn put_pixel(&mut self, x: usize, y: usize, _color: Rgba) {
            self.0.insert((x, y));
        }
        fn refresh_region(&mut self, _region: Rect) {}
        fn refresh(&mut self) {}
    }

    #[test]
    fn span_walks_both_directions() {
        assert_eq!(span(3, 3).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(span(3, -3).collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(span(3, 0).count(), 0);
    }

    #[test]
    fn bracket_marks_only_the_corners() {
        let mut pixels = Pixels::default();
        draw_bracket(&mut pixels, 0, 0, 4, 4, 2, Rgba::WHITE);

        let expected: HashSet<_> = [
            (0, 0), (1, 0), (0, 1),
            (3, 0), (2, 0), (3, 1),
            (0, 3), (1, 3), (0, 2),
            (3, 3), (2, 3), (3, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(pixels.0, expected);
    }

    #[test]
    fn bracket_arms_are_clamped_to_the_tile() {
        let mut pixels = Pixels::default();
        draw_bracket(&mut pixels, 4, 4, 2, 1, 5, Rgba::WHITE);

        let expected: HashSet<_> = [(4, 4), (5, 4)].into_iter().collect();
        assert_eq!(pixels.0, expected);
    }
}
