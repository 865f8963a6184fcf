//! Linear gap filling between keyframed boxes.
//!
//! Workers usually draw boxes on a handful of keyframes. [`fill`] produces a
//! box for every frame between the first and last input box.
//!
//! Gap policy around `lost` boxes: when either end of a gap is `lost`, the
//! gap is filled by carrying the left box forward as `lost`, so no visible
//! box is ever synthesized across an absence. Visible gaps are blended
//! linearly and come out `lost = false`, `occluded = false`.

use crate::bbox::FrameBox;

/// Fill every missing frame between consecutive boxes.
///
/// `boxes` must be ordered by frame. Input boxes are returned unchanged and
/// in place; only the frames strictly between two consecutive boxes are
/// synthesized. Consecutive boxes on equal or adjacent frames produce
/// nothing in between.
pub fn fill(boxes: &[FrameBox]) -> Vec<FrameBox> {
    let Some(last) = boxes.last() else {
        return Vec::new();
    };

    let mut filled = Vec::with_capacity(expected_len(boxes));
    for pair in boxes.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        filled.push(a);
        fill_gap(&a, &b, &mut filled);
    }
    filled.push(*last);
    filled
}

/// Synthesize the boxes strictly between `a` and `b`.
fn fill_gap(a: &FrameBox, b: &FrameBox, out: &mut Vec<FrameBox>) {
    if b.frame <= a.frame + 1 {
        return;
    }

    if a.lost || b.lost {
        out.extend(
            (a.frame + 1..b.frame).map(|f| a.at_frame(f).with_lost(true).with_occluded(false)),
        );
        return;
    }

    let span = f64::from(b.frame - a.frame);
    out.extend((a.frame + 1..b.frame).map(|f| {
        let t = f64::from(f - a.frame) / span;
        FrameBox::new(
            f,
            lerp(a.xtl, b.xtl, t),
            lerp(a.ytl, b.ytl, t),
            lerp(a.xbr, b.xbr, t),
            lerp(a.ybr, b.ybr, t),
        )
    }));
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

fn expected_len(boxes: &[FrameBox]) -> usize {
    match (boxes.first(), boxes.last()) {
        (Some(first), Some(last)) if last.frame >= first.frame => {
            (last.frame - first.frame) as usize + 1
        }
        _ => boxes.len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(boxes: &[FrameBox]) -> Vec<i32> {
        boxes.iter().map(|b| b.frame).collect()
    }

    #[test]
    fn midpoint_is_linear_blend() {
        let boxes = [
            FrameBox::new(0, 0.0, 0.0, 10.0, 10.0),
            FrameBox::new(10, 10.0, 10.0, 20.0, 20.0),
        ];
        let filled = fill(&boxes);

        assert_eq!(frames(&filled), (0..=10).collect::<Vec<_>>());
        let mid = filled[5];
        assert_eq!(mid.coords(), (5.0, 5.0, 15.0, 15.0));
        assert!(!mid.lost);
        assert!(!mid.occluded);
    }

    #[test]
    fn endpoints_pass_through_unchanged() {
        let a = FrameBox::new(2, 1.0, 1.0, 3.0, 3.0).with_occluded(true);
        let b = FrameBox::new(6, 5.0, 5.0, 9.0, 9.0);
        let filled = fill(&[a, b]);
        assert_eq!(filled.first(), Some(&a));
        assert_eq!(filled.last(), Some(&b));
        // Synthesized boxes never inherit occlusion.
        assert!(filled[1..4].iter().all(|x| !x.occluded));
    }

    #[test]
    fn fully_filled_input_is_identity() {
        let boxes: Vec<FrameBox> = (0..6)
            .map(|f| FrameBox::new(f, f as f64, 0.0, f as f64 + 1.0, 1.0).with_occluded(f % 2 == 0))
            .collect();
        assert_eq!(fill(&boxes), boxes);
    }

    #[test]
    fn single_box_is_returned_unchanged() {
        let only = FrameBox::new(7, 1.0, 2.0, 3.0, 4.0).with_lost(true);
        assert_eq!(fill(&[only]), vec![only]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(fill(&[]).is_empty());
    }

    #[test]
    fn lost_left_endpoint_carries_forward_as_lost() {
        let a = FrameBox::new(0, 0.0, 0.0, 10.0, 10.0).with_lost(true);
        let b = FrameBox::new(4, 40.0, 40.0, 50.0, 50.0);
        let filled = fill(&[a, b]);

        assert_eq!(frames(&filled), vec![0, 1, 2, 3, 4]);
        for synthesized in &filled[1..4] {
            assert!(synthesized.lost);
            assert_eq!(synthesized.coords(), a.coords());
        }
        assert!(!filled[4].lost);
    }

    #[test]
    fn lost_right_endpoint_does_not_bridge() {
        let a = FrameBox::new(0, 0.0, 0.0, 10.0, 10.0);
        let b = FrameBox::new(3, 30.0, 30.0, 40.0, 40.0).with_lost(true);
        let filled = fill(&[a, b]);

        assert!(filled[1..3].iter().all(|x| x.lost && x.coords() == a.coords()));
    }

    #[test]
    fn multiple_gaps_are_filled_independently() {
        let boxes = [
            FrameBox::new(0, 0.0, 0.0, 0.0, 0.0),
            FrameBox::new(2, 2.0, 2.0, 2.0, 2.0),
            FrameBox::new(6, 6.0, 6.0, 6.0, 6.0).with_lost(true),
            FrameBox::new(8, 8.0, 8.0, 8.0, 8.0),
        ];
        let filled = fill(&boxes);

        assert_eq!(frames(&filled), (0..=8).collect::<Vec<_>>());
        assert_eq!(filled[1].xtl, 1.0);
        assert!(!filled[1].lost);
        assert_eq!(filled[4].xtl, 2.0);
        assert!(filled[4].lost);
        assert_eq!(filled[7].xtl, 6.0);
        assert!(filled[7].lost);
        assert!(!filled[8].lost);
    }

    #[test]
    fn duplicate_frames_pass_through_without_synthesis() {
        let boxes = [
            FrameBox::new(3, 0.0, 0.0, 1.0, 1.0),
            FrameBox::new(3, 5.0, 5.0, 6.0, 6.0),
            FrameBox::new(5, 5.0, 5.0, 6.0, 6.0),
        ];
        let filled = fill(&boxes);
        assert_eq!(frames(&filled), vec![3, 3, 4, 5]);
    }
}
