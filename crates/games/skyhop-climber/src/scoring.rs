/// Session score for a camera position.
///
/// Score is `abs(floor(camera_y))`; the camera starts at 0 and only moves up
/// (negative), so the score grows with the climb.
pub fn score_from_camera(camera_y: f32) -> u64 {
    if !camera_y.is_finite() {
        return 0;
    }
    camera_y.floor().abs() as u64
}

/// Fraction of the climb to `target_height` completed, in [0, 1].
pub fn progress(camera_y: f32, target_height: f32) -> f32 {
    if target_height >= 0.0 || !camera_y.is_finite() {
        return 0.0;
    }
    (camera_y / target_height).clamp(0.0, 1.0)
}
