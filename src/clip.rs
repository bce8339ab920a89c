// Line vs. axis-aligned rectangle clipping (Liang–Barsky).
// The overlay uses it the other way round: it keeps what lies OUTSIDE the
// front window and throws away the inside interval.

use crate::settings::CLIP_PIECE_EPS;
use crate::types::{ClipResult, Segment, WindowRect};

/// `|p|` below this counts as parallel to the boundary.
const PARALLEL_EPS: f64 = 1e-9;

/// Parametric interval `[t_enter, t_exit]` of `seg` inside the rectangle
/// `(xmin, ymin)-(xmax, ymax)`.
///
/// Each boundary contributes `p` (direction component, sign flipped for the
/// min edges) and `q` (signed distance of the start point from that edge).
/// `p < 0` means the segment enters through that edge and can only raise
/// `t_enter`; `p > 0` means it exits and can only lower `t_exit`.
pub fn liang_barsky(seg: &Segment, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> ClipResult {
    let d = seg.b - seg.a;
    let p = [-d.x, d.x, -d.y, d.y];
    let q = [seg.a.x - xmin, xmax - seg.a.x, seg.a.y - ymin, ymax - seg.a.y];

    let (mut u1, mut u2) = (0.0_f64, 1.0_f64);
    for (pi, qi) in p.into_iter().zip(q) {
        if pi.abs() < PARALLEL_EPS {
            if qi < 0.0 {
                return ClipResult::OUTSIDE;
            }
            continue;
        }
        let t = qi / pi;
        if pi < 0.0 {
            if t > u2 {
                return ClipResult::OUTSIDE;
            }
            if t > u1 {
                u1 = t;
            }
        } else {
            if t < u1 {
                return ClipResult::OUTSIDE;
            }
            if t < u2 {
                u2 = t;
            }
        }
    }

    ClipResult { t_enter: u1, t_exit: u2, intersects: true }
}

pub fn clip_to_rect(seg: &Segment, rect: &WindowRect) -> ClipResult {
    liang_barsky(
        seg,
        rect.left as f64,
        rect.top as f64,
        rect.right as f64,
        rect.bottom as f64,
    )
}

/// The drawable pieces of `seg` once the part inside `rect` is removed:
/// zero (fully inside), one (crosses one edge, or fully outside) or two
/// (passes through).
pub fn outside_pieces(seg: &Segment, rect: &WindowRect) -> Vec<Segment> {
    let clip = clip_to_rect(seg, rect);
    if !clip.intersects {
        return vec![*seg];
    }

    let mut pieces = Vec::with_capacity(2);
    if clip.t_enter > CLIP_PIECE_EPS {
        pieces.push(seg.sub(0.0, clip.t_enter));
    }
    if clip.t_exit < 1.0 - CLIP_PIECE_EPS {
        pieces.push(seg.sub(clip.t_exit, 1.0));
    }
    pieces
}
