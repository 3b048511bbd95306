//! Player-versus-node collision
//!
//! Only the corners of the target's box are tested, each pulled inward by a
//! margin, against the obstacle box. Overlaps smaller than the margin do not
//! count.

use super::geometry::Rect;

/// True when any inset corner of `target` lies inside `obstacle`
pub fn corner_hit(target: &Rect, margin: f32, obstacle: &Rect) -> bool {
    target
        .inset_corners(margin)
        .iter()
        .any(|&corner| obstacle.contains(corner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn player() -> Rect {
        Rect::centered(Vec2::new(200.0, 200.0), Vec2::new(100.0, 80.0))
    }

    #[test]
    fn test_touching_corner_hits() {
        // Inset bottom-right corner is (220, 210)
        let node = Rect::new(220.0, 210.0, 50.0, 50.0);
        assert!(corner_hit(&player(), 30.0, &node));
    }

    #[test]
    fn test_one_unit_away_misses() {
        let node = Rect::new(221.0, 210.0, 50.0, 50.0);
        assert!(!corner_hit(&player(), 30.0, &node));
        let node = Rect::new(220.0, 211.0, 50.0, 50.0);
        assert!(!corner_hit(&player(), 30.0, &node));
    }

    #[test]
    fn test_top_left_corner_touching_from_outside() {
        // Node ends exactly at the inset top-left corner: right/bottom edges are exclusive
        let node = Rect::new(130.0, 160.0, 50.0, 30.0);
        assert!(!corner_hit(&player(), 30.0, &node));
        let node = Rect::new(131.0, 161.0, 50.0, 30.0);
        assert!(corner_hit(&player(), 30.0, &node));
    }

    #[test]
    fn test_margin_forgives_box_overlap() {
        // Overlaps the raw box by 10px but not the inset corners
        let node = Rect::new(240.0, 230.0, 50.0, 50.0);
        assert!(corner_hit(&player(), 0.0, &node));
        assert!(!corner_hit(&player(), 30.0, &node));
    }

    #[test]
    fn test_obstacle_inside_target_is_missed() {
        // Corner test only: a node fully inside the inset box touches no corner
        let node = Rect::new(195.0, 195.0, 10.0, 10.0);
        assert!(!corner_hit(&player(), 30.0, &node));
    }
}
