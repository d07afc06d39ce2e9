use std::f32::consts::{PI, TAU};

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

const GROUP_RING_PER_GROUP: f32 = 70.0;
const GROUP_RING_MIN: f32 = 180.0;
const GROUP_RING_MAX: f32 = 1_800.0;
const GROUP_RING_GAP: f32 = 40.0;
const MEMBER_RING_PER_MEMBER: f32 = 14.0;
const MEMBER_RING_MIN: f32 = 36.0;
const MEMBER_RING_MAX: f32 = 320.0;
const JITTER: f32 = 3.0;

fn member_ring_radius(member_count: usize) -> f32 {
    if member_count <= 1 {
        return 0.0;
    }
    (member_count as f32 * MEMBER_RING_PER_MEMBER).clamp(MEMBER_RING_MIN, MEMBER_RING_MAX)
}

fn group_ring_radius(group_count: usize, widest_member_ring: f32) -> f32 {
    if group_count <= 1 {
        return 0.0;
    }

    let spacing = (group_count as f32 * GROUP_RING_PER_GROUP).clamp(GROUP_RING_MIN, GROUP_RING_MAX);
    // Chord between neighbouring group points must fit two member rings.
    let chord_factor = 2.0 * (PI / group_count as f32).sin();
    let needed = (widest_member_ring * 2.0 + GROUP_RING_GAP) / chord_factor.max(0.0001);
    spacing.max(needed).min(GROUP_RING_MAX)
}

/// Ring-of-rings placement: groups spread around a large circle, members of
/// each group around a small circle on their group point.
///
/// `groups[i]` is the group index of node `i`; group indices must be dense
/// in `0..group_count`.
pub(crate) fn seed_positions(ids: &[&str], groups: &[usize], group_count: usize) -> Vec<Vec2> {
    let mut members = vec![Vec::new(); group_count];
    for (index, &group) in groups.iter().enumerate() {
        if let Some(bucket) = members.get_mut(group) {
            bucket.push(index);
        }
    }

    let widest = members
        .iter()
        .map(|bucket| member_ring_radius(bucket.len()))
        .fold(0.0_f32, f32::max);
    let outer_radius = group_ring_radius(group_count, widest);

    let mut positions = vec![Vec2::ZERO; groups.len()];
    for (group, bucket) in members.iter().enumerate() {
        let group_angle = TAU * group as f32 / group_count.max(1) as f32;
        let group_center = vec2(group_angle.cos(), group_angle.sin()) * outer_radius;
        let inner_radius = member_ring_radius(bucket.len());

        for (slot, &index) in bucket.iter().enumerate() {
            let angle = group_angle + TAU * slot as f32 / bucket.len() as f32;
            let (jx, jy) = ids.get(index).map_or((0.0, 0.0), |id| stable_pair(id));
            positions[index] =
                group_center + vec2(angle.cos(), angle.sin()) * inner_radius + vec2(jx, jy) * JITTER;
        }
    }

    positions
}
