// crates/showcut-core/src/geometry.rs
//
// Strip and slice geometry for the showcase widget.
//
// The widget renders five 150 px columns separated by 4 px gutters inside a
// 766 px strip. Every source is resized to the full strip width first, then
// cut into columns at fixed offsets:
//
//   slice 0 → x =   0     slice 3 → x = 462
//   slice 1 → x = 154     slice 4 → x = 616
//   slice 2 → x = 308
//
// A slice that would run past the right edge of the frame is skipped, and so
// is every slice after it. There is no clamping.

use thiserror::Error;

/// Width of the resized strip every source is scaled to.
pub const STRIP_WIDTH: u32 = 766;
/// Width of one output GIF.
pub const SLICE_WIDTH: u32 = 150;
/// Gutter between adjacent slices.
pub const GAP_WIDTH: u32 = 4;
/// Number of output GIFs per run.
pub const SLICE_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("slice count must be at least 1")]
    NoSlices,
    #[error("slice width must be greater than 0")]
    ZeroSliceWidth,
    #[error("last slice would end past 4294967295 px")]
    LayoutOverflow,
}

/// Horizontal offset of every slice, in index order.
///
/// `offset[i] = i × (slice_width + gap)`. Stops at the first offset that does
/// not fit in a `u32`, so the result can be shorter than `slice_count`.
///
/// ```
/// use showcut_core::geometry::offsets;
/// assert_eq!(offsets(5, 150, 4), vec![0, 154, 308, 462, 616]);
/// ```
pub fn offsets(slice_count: usize, slice_width: u32, gap: u32) -> Vec<u32> {
    let step  = u64::from(slice_width) + u64::from(gap);
    let count = u64::try_from(slice_count).unwrap_or(u64::MAX);
    (0..count)
        .map_while(|i| i.checked_mul(step).and_then(|x| u32::try_from(x).ok()))
        .collect()
}

/// Validated slice layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceGeometry {
    pub slice_count: usize,
    pub slice_width: u32,
    pub gap:         u32,
}

impl SliceGeometry {
    pub fn new(slice_count: usize, slice_width: u32, gap: u32) -> Result<Self, GeometryError> {
        if slice_count == 0 {
            return Err(GeometryError::NoSlices);
        }
        if slice_width == 0 {
            return Err(GeometryError::ZeroSliceWidth);
        }
        // Right edge of the last slice: (count - 1) × (width + gap) + width.
        let step = u64::from(slice_width) + u64::from(gap);
        let end = u64::try_from(slice_count - 1)
            .ok()
            .and_then(|n| n.checked_mul(step))
            .and_then(|x| x.checked_add(u64::from(slice_width)));
        if !end.is_some_and(|e| e <= u64::from(u32::MAX)) {
            return Err(GeometryError::LayoutOverflow);
        }
        Ok(Self { slice_count, slice_width, gap })
    }

    /// The fixed layout of the showcase widget.
    pub fn showcase() -> Self {
        Self { slice_count: SLICE_COUNT, slice_width: SLICE_WIDTH, gap: GAP_WIDTH }
    }

    pub fn offsets(&self) -> Vec<u32> {
        offsets(self.slice_count, self.slice_width, self.gap)
    }

    /// `(slice_index, x_offset)` of every slice that fits inside a frame of
    /// `frame_width`, stopping at the first one that does not.
    pub fn valid_slices(&self, frame_width: u32) -> Vec<(usize, u32)> {
        self.offsets()
            .into_iter()
            .enumerate()
            .take_while(|&(_, x)| x.checked_add(self.slice_width).is_some_and(|end| end <= frame_width))
            .collect()
    }
}

impl Default for SliceGeometry {
    fn default() -> Self {
        Self::showcase()
    }
}

/// Height of the resized strip, preserving the source aspect ratio.
///
/// Returns `None` when either source dimension is zero or the result rounds
/// down to zero; the run must fail instead of encoding empty frames.
///
/// ```
/// use showcut_core::geometry::target_height;
/// assert_eq!(target_height(1532, 1000), Some(500));
/// assert_eq!(target_height(1920, 1080), Some(431));
/// assert_eq!(target_height(0, 1080), None);
/// ```
pub fn target_height(src_width: u32, src_height: u32) -> Option<u32> {
    if src_width == 0 || src_height == 0 {
        return None;
    }
    let h = (STRIP_WIDTH as f64 * src_height as f64 / src_width as f64).round() as u32;
    (h > 0).then_some(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn showcase_layout_fits_strip_exactly() {
        let g = SliceGeometry::showcase();
        assert_eq!(g.offsets(), vec![0, 154, 308, 462, 616]);
        assert_eq!(g.valid_slices(STRIP_WIDTH).len(), SLICE_COUNT);
        // Last slice ends exactly on the strip edge.
        assert_eq!(616 + SLICE_WIDTH, STRIP_WIDTH);
    }

    #[test]
    fn narrow_frame_drops_trailing_slices() {
        let g = SliceGeometry::showcase();
        assert_eq!(g.valid_slices(765), vec![(0, 0), (1, 154), (2, 308), (3, 462)]);
        assert_eq!(g.valid_slices(300), vec![(0, 0)]);
        assert!(g.valid_slices(149).is_empty());
    }

    #[test]
    fn invalid_geometry_rejected() {
        assert_eq!(SliceGeometry::new(0, 150, 4), Err(GeometryError::NoSlices));
        assert_eq!(SliceGeometry::new(5, 0, 4), Err(GeometryError::ZeroSliceWidth));
    }

    #[test]
    fn layouts_past_u32_are_rejected() {
        assert_eq!(SliceGeometry::new(3, u32::MAX / 2, 4), Err(GeometryError::LayoutOverflow));
        assert_eq!(SliceGeometry::new(2, u32::MAX - 10, 0), Err(GeometryError::LayoutOverflow));
        assert!(SliceGeometry::new(1, u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn huge_hand_built_layouts_do_not_overflow() {
        let g = SliceGeometry { slice_count: 3, slice_width: u32::MAX / 2, gap: 4 };
        assert_eq!(g.offsets(), vec![0, u32::MAX / 2 + 4]);
        assert!(g.valid_slices(1000).is_empty());

        let g = SliceGeometry { slice_count: 2, slice_width: u32::MAX - 10, gap: 0 };
        assert_eq!(g.valid_slices(u32::MAX), vec![(0, 0)]);
    }

    #[test]
    fn tall_source_gets_tall_strip() {
        assert_eq!(target_height(1080, 1920), Some(1362));
    }

    #[test]
    fn degenerate_aspect_is_rejected() {
        // 766 * 1 / 100_000 rounds to 0.
        assert_eq!(target_height(100_000, 1), None);
    }

    proptest! {
        #[test]
        fn offsets_strictly_increase(count in 1usize..32, width in 1u32..500, gap in 0u32..50) {
            let offs = offsets(count, width, gap);
            prop_assert_eq!(offs.len(), count);
            prop_assert_eq!(offs[0], 0);
            for pair in offs.windows(2) {
                prop_assert!(pair[1] > pair[0]);
                prop_assert_eq!(pair[1] - pair[0], width + gap);
            }
        }

        #[test]
        fn validity_is_a_prefix(count in 1usize..16, width in 1u32..300, gap in 0u32..20, frame_w in 0u32..4000) {
            let g = SliceGeometry::new(count, width, gap).unwrap();
            let valid = g.valid_slices(frame_w);
            let offs = g.offsets();
            // Valid slices are exactly the leading slices that fit.
            for (i, x) in &valid {
                prop_assert_eq!(offs[*i], *x);
                prop_assert!(x + width <= frame_w);
            }
            for (i, _) in valid.iter().enumerate() {
                prop_assert_eq!(valid[i].0, i);
            }
            if valid.len() < count {
                prop_assert!(offs[valid.len()] + width > frame_w);
            }
        }

        #[test]
        fn extreme_sizes_never_panic(
            count   in 1usize..8,
            width   in (u32::MAX - 1000)..=u32::MAX,
            gap     in any::<u32>(),
            frame_w in any::<u32>(),
        ) {
            let g = SliceGeometry { slice_count: count, slice_width: width, gap };
            let offs = g.offsets();
            prop_assert!(offs.len() <= count);
            for (_, x) in g.valid_slices(frame_w) {
                prop_assert!(u64::from(x) + u64::from(width) <= u64::from(frame_w));
            }
            if count > 1 {
                prop_assert_eq!(SliceGeometry::new(count, width, gap), Err(GeometryError::LayoutOverflow));
            }
        }
    }
}
