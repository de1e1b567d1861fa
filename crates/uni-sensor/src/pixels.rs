//! Per-tick sensor update.

use uni_agent::{Pixel, TickView};
use uni_core::{AgentId, wrap_angle};

/// Bin of a relative bearing.
///
/// Bin `pixel_count / 2` starts at the heading and bins count
/// counter-clockwise; the Euclidean remainder keeps the result in
/// `[0, pixel_count)` for any finite bearing.
#[inline]
pub fn bin_index(relative: f64, radians_per_pixel: f64, pixel_count: usize) -> usize {
    let pc = pixel_count as i64;
    ((relative / radians_per_pixel).floor() as i64 + pc / 2).rem_euclid(pc) as usize
}

/// Recompute `agent`'s reading from committed state.
///
/// `pixels` is the agent's own row (`pixel_count` bins); every bin is reset
/// first.  Candidates come from the agent's home cell only: the grid
/// registers every agent in the 3×3 block around its own home, and sectors
/// are at least one range wide, so that single cell holds everyone within
/// range.
pub fn update_pixels(agent: AgentId, view: &TickView<'_>, pixels: &mut [Pixel]) {
    let p = view.params;
    pixels.fill(Pixel::empty(p.range));

    let me = view.current[agent.index()];
    let half_fov = p.fov / 2.0;
    let radians_per_pixel = p.radians_per_pixel();
    let pixel_count = pixels.len();

    for &other in view.grid.query(me.home) {
        if other == agent {
            continue;
        }
        let them = view.current[other.index()].pose;

        let dx = p.torus.delta(me.pose.x, them.x);
        if dx.abs() > p.range {
            continue;
        }
        let dy = p.torus.delta(me.pose.y, them.y);
        if dy.abs() > p.range {
            continue;
        }
        let distance = dx.hypot(dy);
        if distance > p.range {
            continue;
        }

        // The edges of the field of view are outside it.
        let relative = wrap_angle(dy.atan2(dx) - me.pose.a);
        if relative.abs() >= half_fov {
            continue;
        }

        let bin = &mut pixels[bin_index(relative, radians_per_pixel, pixel_count)];
        if bin.is_empty() || distance < bin.range {
            *bin = Pixel { range: distance, robot: other };
        }
    }
}
